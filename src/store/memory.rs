use std::sync::{Mutex, MutexGuard};

use futures::future::{self, BoxFuture, FutureExt};
use uuid::Uuid;

use super::{StoreResult, TodoStore, UserStore};
use crate::error::StoreError;
use crate::models::{AuthToken, NewTodo, NewUser, Todo, TodoUpdate, User};

/// In-process store for tests and database-less local runs.
///
/// Documents keep insertion order. Guards are never held across an await.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: Mutex<Vec<Todo>>,
    users: Mutex<Vec<User>>,
}

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole todo collection, keeping the given ids.
    pub fn seed_todos(&self, todos: Vec<Todo>) -> StoreResult<()> {
        *lock(&self.todos)? = todos;
        Ok(())
    }

    pub fn todo_count(&self) -> StoreResult<usize> {
        Ok(lock(&self.todos)?.len())
    }

    fn insert_todo(&self, new_todo: NewTodo) -> StoreResult<Todo> {
        let todo = new_todo.into_todo(Uuid::new_v4());
        lock(&self.todos)?.push(todo.clone());
        Ok(todo)
    }

    fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(lock(&self.todos)?.iter().find(|todo| todo.id == id).cloned())
    }

    fn remove_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let mut todos = lock(&self.todos)?;
        Ok(todos
            .iter()
            .position(|todo| todo.id == id)
            .map(|index| todos.remove(index)))
    }

    fn update_todo(&self, id: Uuid, update: &TodoUpdate) -> StoreResult<Option<Todo>> {
        let mut todos = lock(&self.todos)?;
        Ok(todos.iter_mut().find(|todo| todo.id == id).map(|todo| {
            update.apply(todo);
            todo.clone()
        }))
    }

    fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = lock(&self.users)?;
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::Duplicate(format!(
                "email {} already registered",
                new_user.email
            )));
        }
        let user = new_user.into_user(Uuid::new_v4());
        users.push(user.clone());
        Ok(user)
    }

    fn find_user<P>(&self, predicate: P) -> StoreResult<Option<User>>
    where
        P: Fn(&User) -> bool,
    {
        Ok(lock(&self.users)?.iter().find(|user| predicate(user)).cloned())
    }

    fn append_token(&self, user_id: Uuid, token: AuthToken) -> StoreResult<()> {
        let mut users = lock(&self.users)?;
        match users.iter_mut().find(|user| user.id == user_id) {
            Some(user) => {
                user.tokens.push(token);
                Ok(())
            }
            None => Err(StoreError::Backend(format!("user {} does not exist", user_id))),
        }
    }
}

impl TodoStore for MemoryStore {
    fn insert(&self, todo: NewTodo) -> BoxFuture<'_, StoreResult<Todo>> {
        future::ready(self.insert_todo(todo)).boxed()
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Todo>>> {
        future::ready(lock(&self.todos).map(|todos| todos.clone())).boxed()
    }

    fn find_by_id(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        future::ready(self.find_todo(id)).boxed()
    }

    fn find_and_remove(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        future::ready(self.remove_todo(id)).boxed()
    }

    fn find_and_update(
        &self,
        id: Uuid,
        update: TodoUpdate,
    ) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        future::ready(self.update_todo(id, &update)).boxed()
    }
}

impl UserStore for MemoryStore {
    fn create(&self, user: NewUser) -> BoxFuture<'_, StoreResult<User>> {
        future::ready(self.create_user(user)).boxed()
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, StoreResult<Option<User>>> {
        future::ready(self.find_user(|user| user.email == email)).boxed()
    }

    fn push_token(&self, user_id: Uuid, token: AuthToken) -> BoxFuture<'_, StoreResult<()>> {
        future::ready(self.append_token(user_id, token)).boxed()
    }

    fn find_by_token<'a>(
        &'a self,
        id: Uuid,
        token: &'a str,
        access: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        future::ready(self.find_user(|user| user.id == id && user.has_token(token, access))).boxed()
    }
}
