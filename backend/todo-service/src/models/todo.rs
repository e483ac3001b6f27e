use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored todo record. `id` is 0 until the repository assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl Todo {
    /// New, not yet persisted record
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Record with a caller-chosen id, for seeding storage
    pub fn with_id(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            ..Self::new(title, description)
        }
    }
}

/// Body of `POST /records`. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: String,
}

/// Body of `PUT /records/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

/// Fields to change on a stored todo. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TodoPatch {
    /// Replace both fields
    pub fn full(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
    }
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_json_shape() {
        let todo = Todo::with_id(1, "Buy milk", "2 liters");
        assert_eq!(
            serde_json::to_value(&todo).unwrap(),
            serde_json::json!({ "id": 1, "title": "Buy milk", "description": "2 liters" })
        );
    }

    #[test]
    fn test_create_request_ignores_client_id() {
        let req: CreateTodoRequest =
            serde_json::from_str(r#"{"id": 99, "title": "Buy milk"}"#).unwrap();
        assert_eq!(req.title, "Buy milk");
        assert_eq!(req.description, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_validation() {
        let empty = CreateTodoRequest {
            title: String::new(),
            description: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateTodoRequest {
            title: "x".repeat(256),
            description: String::new(),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_partial_update() {
        let stored = Todo::with_id(3, "Old", "Keep me");
        let update = UpdateTodoRequest {
            title: Some("New".into()),
            description: None,
        };
        assert!(update.validate().is_ok());

        let mut merged = stored;
        TodoPatch::from(update).apply_to(&mut merged);
        assert_eq!(merged, Todo::with_id(3, "New", "Keep me"));
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let update = UpdateTodoRequest {
            title: Some(String::new()),
            description: None,
        };
        assert!(update.validate().is_err());
    }
}
