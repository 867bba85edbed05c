use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use todo_api::auth::JwtKeys;
use todo_api::config::Config;
use todo_api::routes::{self, health};
use todo_api::store::{PgStore, TodoStore, UserStore};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(startup_error)?;
    let store = PgStore::new(pool);
    store.migrate().await.map_err(startup_error)?;

    let todo_store: Arc<dyn TodoStore> = Arc::new(store.clone());
    let user_store: Arc<dyn UserStore> = Arc::new(store);
    let keys = web::Data::new(JwtKeys::from_secret(&config.jwt_secret));

    log::info!("Listening on {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(todo_store.clone()))
            .app_data(web::Data::from(user_store.clone()))
            .app_data(keys.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_headers(vec![todo_api::auth::AUTH_HEADER])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
