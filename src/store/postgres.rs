use futures::future::BoxFuture;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{StoreResult, TodoStore, UserStore};
use crate::error::StoreError;
use crate::models::{AuthToken, NewTodo, NewUser, Todo, TodoUpdate, User};

const TODO_COLUMNS: &str = "id, text, completed, completed_at";
const USER_COLUMNS: &str = "id, email, password, tokens";

/// PostgreSQL-backed store. Each todo and each user is one row; a user's token
/// list is a JSONB array of `{access, token}` objects.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password: String,
    tokens: Json<Vec<AuthToken>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password: row.password,
            tokens: row.tokens.0,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the migrations under `migrations/`.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {}", e)))
    }
}

impl TodoStore for PgStore {
    fn insert(&self, todo: NewTodo) -> BoxFuture<'_, StoreResult<Todo>> {
        Box::pin(async move {
            let todo = todo.into_todo(Uuid::new_v4());
            let sql = format!(
                "INSERT INTO todos ({TODO_COLUMNS}) VALUES ($1, $2, $3, $4) RETURNING {TODO_COLUMNS}"
            );
            let stored = sqlx::query_as::<_, Todo>(&sql)
                .bind(todo.id)
                .bind(&todo.text)
                .bind(todo.completed)
                .bind(todo.completed_at)
                .fetch_one(&self.pool)
                .await?;
            Ok(stored)
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Todo>>> {
        Box::pin(async move {
            let sql = format!("SELECT {TODO_COLUMNS} FROM todos");
            let todos = sqlx::query_as::<_, Todo>(&sql)
                .fetch_all(&self.pool)
                .await?;
            Ok(todos)
        })
    }

    fn find_by_id(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        Box::pin(async move {
            let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1");
            let todo = sqlx::query_as::<_, Todo>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(todo)
        })
    }

    fn find_and_remove(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        Box::pin(async move {
            let sql = format!("DELETE FROM todos WHERE id = $1 RETURNING {TODO_COLUMNS}");
            let todo = sqlx::query_as::<_, Todo>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(todo)
        })
    }

    fn find_and_update(
        &self,
        id: Uuid,
        update: TodoUpdate,
    ) -> BoxFuture<'_, StoreResult<Option<Todo>>> {
        Box::pin(async move {
            let sql = format!(
                "UPDATE todos \
                 SET text = COALESCE($2, text), completed = $3, completed_at = $4 \
                 WHERE id = $1 \
                 RETURNING {TODO_COLUMNS}"
            );
            let todo = sqlx::query_as::<_, Todo>(&sql)
                .bind(id)
                .bind(update.text)
                .bind(update.completed)
                .bind(update.completed_at)
                .fetch_optional(&self.pool)
                .await?;
            Ok(todo)
        })
    }
}

impl UserStore for PgStore {
    fn create(&self, user: NewUser) -> BoxFuture<'_, StoreResult<User>> {
        Box::pin(async move {
            let user = user.into_user(Uuid::new_v4());
            let sql = format!(
                "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
            );
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(user.id)
                .bind(&user.email)
                .bind(&user.password)
                .bind(Json(&user.tokens))
                .fetch_one(&self.pool)
                .await?;
            Ok(row.into())
        })
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, StoreResult<Option<User>>> {
        Box::pin(async move {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.map(User::from))
        })
    }

    fn push_token(&self, user_id: Uuid, token: AuthToken) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            // jsonb `||` of two arrays concatenates them.
            let result = sqlx::query("UPDATE users SET tokens = tokens || $1 WHERE id = $2")
                .bind(Json(vec![token]))
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::Backend(format!("user {} does not exist", user_id)));
            }
            Ok(())
        })
    }

    fn find_by_token<'a>(
        &'a self,
        id: Uuid,
        token: &'a str,
        access: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        Box::pin(async move {
            // JSONB containment: the array holds an element equal to this one.
            let needle = vec![AuthToken {
                access: access.to_string(),
                token: token.to_string(),
            }];
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND tokens @> $2");
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(id)
                .bind(Json(needle))
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.map(User::from))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AUTH_ACCESS;
    use std::env;

    async fn connect() -> PgStore {
        dotenv::dotenv().ok();
        let pool = PgPool::connect(&env::var("DATABASE_URL").expect("DATABASE_URL not set"))
            .await
            .expect("Failed to connect to test DB");
        let store = PgStore::new(pool);
        store.migrate().await.expect("Failed to migrate test DB");
        store
    }

    // Needs a running PostgreSQL; run with `--ignored`.
    #[ignore]
    #[actix_rt::test]
    async fn test_todo_round_trip_against_postgres() {
        let store = connect().await;

        let todo = TodoStore::insert(
            &store,
            NewTodo {
                text: "pg todo".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!todo.completed);

        let update = TodoUpdate {
            text: None,
            completed: true,
            completed_at: Some(chrono::Utc::now()),
        };
        let updated = store.find_and_update(todo.id, update).await.unwrap().unwrap();
        assert!(updated.completed);
        assert!(updated.completed_at.is_some());
        assert_eq!(updated.text, "pg todo");

        let removed = store.find_and_remove(todo.id).await.unwrap();
        assert_eq!(removed.map(|t| t.id), Some(todo.id));
        assert!(TodoStore::find_by_id(&store, todo.id).await.unwrap().is_none());
    }

    #[ignore]
    #[actix_rt::test]
    async fn test_user_tokens_against_postgres() {
        let store = connect().await;
        let email = format!("pg-{}@example.com", Uuid::new_v4());

        let user = store
            .create(NewUser {
                email: email.clone(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let duplicate = store
            .create(NewUser {
                email: email.clone(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(matches!(duplicate, Err(StoreError::Duplicate(_))));

        for token in ["pg-token", "pg-token-2"] {
            store
                .push_token(
                    user.id,
                    AuthToken {
                        access: AUTH_ACCESS.to_string(),
                        token: token.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        let stored = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(stored.tokens.len(), 2);

        let found = store
            .find_by_token(user.id, "pg-token", AUTH_ACCESS)
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.email), Some(email));
        assert!(store
            .find_by_token(user.id, "other", AUTH_ACCESS)
            .await
            .unwrap()
            .is_none());

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(store.pool())
            .await;
    }
}
