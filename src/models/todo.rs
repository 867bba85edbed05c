use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::StoreError;

/// A todo document as stored and returned by the API.
///
/// `completed_at` is set exactly when `completed` is `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Identifier assigned by the store on insert.
    pub id: Uuid,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Whether the todo is done.
    pub completed: bool,
    /// When the todo was completed, as milliseconds since the epoch on the wire.
    #[serde(
        rename = "completedAt",
        default,
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /todos`. Keys other than `text` are ignored.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(required, length(min = 1))]
    pub text: Option<String>,
}

/// A validated todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
}

impl NewTodo {
    /// Builds the document the store will insert: `completed` starts out `false`.
    pub fn into_todo(self, id: Uuid) -> Todo {
        Todo {
            id,
            text: self.text,
            completed: false,
            completed_at: None,
        }
    }
}

impl TryFrom<TodoInput> for NewTodo {
    type Error = StoreError;

    fn try_from(input: TodoInput) -> Result<Self, Self::Error> {
        let input = TodoInput {
            text: input.text.map(|text| text.trim().to_string()),
        };
        input.validate()?;
        match input.text {
            Some(text) => Ok(NewTodo { text }),
            None => Err(StoreError::Validation("text is required".into())),
        }
    }
}

/// Request body for `PATCH /todos/{id}`. Only `text` and `completed` are read.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoPatch {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    /// `Some(true)` only for a JSON `true`; any other present value reads as `Some(false)`.
    #[serde(default, deserialize_with = "completed_flag")]
    pub completed: Option<bool>,
}

/// Accepts any JSON value for `completed`. Strings, numbers and `null` are not
/// an error, they just do not mark the todo done.
fn completed_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(value == serde_json::Value::Bool(true)))
}

/// The field-level update derived from a `TodoPatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    /// Replacement text, if the patch carried one.
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoPatch {
    /// Derives the update to apply at time `now`.
    ///
    /// Only an explicit `completed: true` marks the todo done. Anything else,
    /// including a patch that leaves `completed` out, resets `completed` and
    /// `completed_at`.
    pub fn into_update(self, now: DateTime<Utc>) -> Result<TodoUpdate, StoreError> {
        let patch = TodoPatch {
            text: self.text.map(|text| text.trim().to_string()),
            completed: self.completed,
        };
        patch.validate()?;

        let (completed, completed_at) = match patch.completed {
            Some(true) => (true, Some(now)),
            _ => (false, None),
        };

        Ok(TodoUpdate {
            text: patch.text,
            completed,
            completed_at,
        })
    }
}

impl TodoUpdate {
    /// Applies the update in place.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        todo.completed = self.completed;
        todo.completed_at = self.completed_at;
    }
}

/// Response body wrapping a single todo: `{"todo": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

/// Response body for the list route: `{"todos": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_todo_defaults_to_not_completed() {
        let new_todo = NewTodo::try_from(TodoInput {
            text: Some("Walk the dog".to_string()),
        })
        .unwrap();
        let id = Uuid::new_v4();
        let todo = new_todo.into_todo(id);

        assert_eq!(todo.id, id);
        assert_eq!(todo.text, "Walk the dog");
        assert!(!todo.completed);
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn test_todo_input_validation() {
        let missing = NewTodo::try_from(TodoInput { text: None });
        assert!(matches!(missing, Err(StoreError::Validation(_))));

        let empty = NewTodo::try_from(TodoInput {
            text: Some("".to_string()),
        });
        assert!(matches!(empty, Err(StoreError::Validation(_))));

        let blank = NewTodo::try_from(TodoInput {
            text: Some("   ".to_string()),
        });
        assert!(matches!(blank, Err(StoreError::Validation(_))));

        let padded = NewTodo::try_from(TodoInput {
            text: Some("  Buy milk \n".to_string()),
        })
        .unwrap();
        assert_eq!(padded.text, "Buy milk");
    }

    #[test]
    fn test_patch_completed_true_sets_timestamp() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let update = TodoPatch {
            text: None,
            completed: Some(true),
        }
        .into_update(now)
        .unwrap();

        assert_eq!(
            update,
            TodoUpdate {
                text: None,
                completed: true,
                completed_at: Some(now),
            }
        );
    }

    #[test]
    fn test_patch_without_completed_true_resets_completion() {
        let now = Utc::now();
        for completed in [Some(false), None] {
            let update = TodoPatch {
                text: Some("Renamed".to_string()),
                completed,
            }
            .into_update(now)
            .unwrap();

            assert_eq!(update.text.as_deref(), Some("Renamed"));
            assert!(!update.completed);
            assert!(update.completed_at.is_none());
        }
    }

    #[test]
    fn test_patch_rejects_blank_text() {
        let result = TodoPatch {
            text: Some("  ".to_string()),
            completed: Some(true),
        }
        .into_update(Utc::now());
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_update_apply_keeps_text_when_absent() {
        let mut todo = NewTodo {
            text: "Original".to_string(),
        }
        .into_todo(Uuid::new_v4());
        let now = Utc::now();

        TodoUpdate {
            text: None,
            completed: true,
            completed_at: Some(now),
        }
        .apply(&mut todo);

        assert_eq!(todo.text, "Original");
        assert!(todo.completed);
        assert_eq!(todo.completed_at, Some(now));
    }

    #[test]
    fn test_todo_json_shape() {
        let id = Uuid::new_v4();
        let todo = Todo {
            id,
            text: "Ship it".to_string(),
            completed: true,
            completed_at: Some(Utc.timestamp_millis_opt(1_500_000_000_123).unwrap()),
        };
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": id.to_string(),
                "text": "Ship it",
                "completed": true,
                "completedAt": 1_500_000_000_123_i64,
            })
        );

        let pending = Todo {
            completed: false,
            completed_at: None,
            ..todo
        };
        let json = serde_json::to_value(&pending).unwrap();
        assert!(json["completedAt"].is_null());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let patch: TodoPatch = serde_json::from_value(serde_json::json!({
            "text": "Kept",
            "completed": true,
            "completedAt": 42,
            "id": "forged"
        }))
        .unwrap();
        assert_eq!(patch.text.as_deref(), Some("Kept"));
        assert_eq!(patch.completed, Some(true));
    }

    #[test]
    fn test_patch_completed_only_true_counts() {
        for value in [
            serde_json::json!("true"),
            serde_json::json!(1),
            serde_json::json!("yes"),
            serde_json::Value::Null,
            serde_json::json!(false),
        ] {
            let patch: TodoPatch =
                serde_json::from_value(serde_json::json!({ "completed": value })).unwrap();
            assert_eq!(patch.completed, Some(false), "completed = {}", value);

            let update = patch.into_update(Utc::now()).unwrap();
            assert!(!update.completed);
            assert!(update.completed_at.is_none());
        }

        let absent: TodoPatch = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.completed, None);
    }
}
