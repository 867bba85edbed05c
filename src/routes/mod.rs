pub mod health;
pub mod todos;
pub mod users;

use actix_web::web;

use crate::error::AppError;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Unparsable bodies get a bare 400, same as a rejected document.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .service(
        web::scope("/todos")
            .service(todos::get_todos)
            .service(todos::create_todo)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    )
    .service(
        web::scope("/users")
            .service(users::signup)
            .service(users::login)
            .service(users::me),
    );
}
