//! Document store access.
//!
//! Handlers never talk to a database directly. They get a `TodoStore` and a
//! `UserStore` injected as `web::Data<dyn ...>` when the `App` is built, which lets
//! tests swap `PgStore` for `MemoryStore`.

pub mod memory;
pub mod postgres;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{AuthToken, NewTodo, NewUser, Todo, TodoUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations on the todo collection.
pub trait TodoStore: Send + Sync {
    /// Inserts a todo; the store assigns its id.
    fn insert(&self, todo: NewTodo) -> BoxFuture<'_, StoreResult<Todo>>;

    /// Returns every todo in the collection.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Todo>>>;

    fn find_by_id(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>>;

    /// Removes the todo and returns it as it was before removal.
    fn find_and_remove(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>>;

    /// Applies `update` and returns the todo as it is after the update.
    fn find_and_update(
        &self,
        id: Uuid,
        update: TodoUpdate,
    ) -> BoxFuture<'_, StoreResult<Option<Todo>>>;
}

/// Operations on the user collection.
pub trait UserStore: Send + Sync {
    /// Inserts a user; fails with `StoreError::Duplicate` if the email is taken.
    fn create(&self, user: NewUser) -> BoxFuture<'_, StoreResult<User>>;

    fn find_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, StoreResult<Option<User>>>;

    /// Appends `token` to the stored token list of `user_id` in one atomic write,
    /// leaving tokens added concurrently in place.
    fn push_token(&self, user_id: Uuid, token: AuthToken) -> BoxFuture<'_, StoreResult<()>>;

    /// Finds the user with `id` whose token list holds `token` with tag `access`.
    fn find_by_token<'a>(
        &'a self,
        id: Uuid,
        token: &'a str,
        access: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>>;
}
