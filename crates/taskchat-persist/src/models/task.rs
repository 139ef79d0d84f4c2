use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A to-do item owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(user_id: Uuid, new: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            description: new.description,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update; absent fields are left untouched.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// One page of a user's tasks, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
}
