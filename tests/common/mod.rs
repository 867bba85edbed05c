#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App};
use uuid::Uuid;

use todo_api::auth::JwtKeys;
use todo_api::models::Todo;
use todo_api::routes::{self, health};
use todo_api::store::{MemoryStore, TodoStore, UserStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Builds the same `App` as `main`, backed by the given stores.
pub fn build_app(
    todos: Arc<dyn TodoStore>,
    users: Arc<dyn UserStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(todos))
        .app_data(web::Data::from(users))
        .app_data(web::Data::new(JwtKeys::from_secret(TEST_SECRET)))
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .service(health::health)
        .configure(routes::config)
}

/// Builds the app on a single `MemoryStore` serving both collections.
pub fn memory_app(
    store: &Arc<MemoryStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    build_app(store.clone(), store.clone())
}

/// The two todos every todo test starts from.
pub fn seed_todos() -> Vec<Todo> {
    vec![
        Todo {
            id: Uuid::new_v4(),
            text: "First test todo".to_string(),
            completed: false,
            completed_at: None,
        },
        Todo {
            id: Uuid::new_v4(),
            text: "Second test todo".to_string(),
            completed: false,
            completed_at: None,
        },
    ]
}

/// A fresh store holding `seed_todos()`.
pub fn seeded_store() -> (Arc<MemoryStore>, Vec<Todo>) {
    let store = Arc::new(MemoryStore::new());
    let seed = seed_todos();
    store
        .seed_todos(seed.clone())
        .expect("Failed to seed memory store");
    (store, seed)
}
