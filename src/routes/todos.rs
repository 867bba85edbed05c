use crate::{
    error::AppError,
    models::{parse_id, NewTodo, TodoEnvelope, TodoInput, TodoList, TodoPatch},
    store::TodoStore,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;

/// Turns a path segment into an id, answering 404 for anything malformed
/// before the store is touched.
fn todo_id(raw: &str) -> Result<Uuid, AppError> {
    parse_id(raw).ok_or_else(|| AppError::NotFound(format!("Malformed todo id {:?}", raw)))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Todo {} not found", id))
}

/// Reads a PATCH body. An empty body is the empty patch; the content type is
/// not checked.
fn patch_body(body: &[u8]) -> Result<TodoPatch, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TodoPatch::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("Invalid todo patch: {}", err)))
}

/// Creates a new todo.
///
/// ## Request Body:
/// `{"text": "..."}`. Other keys are ignored.
///
/// ## Responses:
/// - `200 OK`: the created todo.
/// - `400 Bad Request`: `text` missing or empty, or the store failed.
#[post("")]
pub async fn create_todo(
    store: web::Data<dyn TodoStore>,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let new_todo = NewTodo::try_from(todo_data.into_inner())?;
    let todo = store.insert(new_todo).await?;
    log::debug!("created todo {}", todo.id);
    Ok(HttpResponse::Ok().json(todo))
}

/// Lists every todo.
///
/// ## Responses:
/// - `200 OK`: `{"todos": [...]}`.
/// - `400 Bad Request`: the store failed.
#[get("")]
pub async fn get_todos(store: web::Data<dyn TodoStore>) -> Result<impl Responder, AppError> {
    let todos = store.list().await?;
    Ok(HttpResponse::Ok().json(TodoList { todos }))
}

/// Retrieves a todo by id.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}`.
/// - `404 Not Found`: malformed id, or no such todo.
/// - `400 Bad Request`: the store failed.
#[get("/{id}")]
pub async fn get_todo(
    store: web::Data<dyn TodoStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = todo_id(&path)?;
    match store.find_by_id(id).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(TodoEnvelope { todo })),
        None => Err(not_found(id)),
    }
}

/// Deletes a todo and returns it.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}` holding the removed todo.
/// - `404 Not Found`: malformed id, or no such todo.
/// - `400 Bad Request`: the store failed.
#[delete("/{id}")]
pub async fn delete_todo(
    store: web::Data<dyn TodoStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = todo_id(&path)?;
    match store.find_and_remove(id).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(TodoEnvelope { todo })),
        None => Err(not_found(id)),
    }
}

/// Updates a todo's `text` and completion state.
///
/// `completed: true` stamps `completedAt` with the current time. Any other
/// body, including one without `completed`, marks the todo not completed and
/// clears `completedAt`.
///
/// ## Request Body:
/// Any subset of `{"text": "...", "completed": true}`, or no body at all.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}` as it is after the update.
/// - `404 Not Found`: malformed id, or no such todo.
/// - `400 Bad Request`: malformed JSON, empty `text`, or the store failed.
#[patch("/{id}")]
pub async fn update_todo(
    store: web::Data<dyn TodoStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let id = todo_id(&path)?;
    let update = patch_body(&body)?.into_update(Utc::now())?;
    match store.find_and_update(id, update).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(TodoEnvelope { todo })),
        None => Err(not_found(id)),
    }
}
