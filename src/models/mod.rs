pub mod id;
pub mod todo;
pub mod user;

pub use id::{is_valid_id, parse_id};
pub use todo::{NewTodo, Todo, TodoEnvelope, TodoInput, TodoList, TodoPatch, TodoUpdate};
pub use user::{AuthToken, NewUser, User, UserInput, AUTH_ACCESS};
