use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ChatMessage, MessageRole, NewTask, Task, TaskPage, TaskPatch};

/// Durable ordered log of chat turns per user.
///
/// Ordering is strictly by `created_at`. `clear` racing a concurrent `append`
/// is not linearizable: an append landing after the delete leaves one stray
/// message. Accepted for a single-user interactive chat.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one turn and return it with its generated id and timestamp.
    async fn append(
        &self,
        user_id: Uuid,
        role: MessageRole,
        content: String,
        metadata: Option<Value>,
    ) -> Result<ChatMessage>;

    /// The most recent `limit` turns, returned oldest-first.
    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>>;

    /// Delete every turn for the user; returns the number removed.
    async fn clear(&self, user_id: Uuid) -> Result<u64>;
}

/// Task CRUD collaborator.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task; fails with `PersistError::Validation` on an empty title.
    async fn create(&self, user_id: Uuid, new: NewTask) -> Result<Task>;

    /// One page of the user's tasks, newest first. `page` is 1-based.
    async fn list(&self, user_id: Uuid, page: i64, page_size: i64) -> Result<TaskPage>;

    /// Partial update; fails with `PersistError::TaskNotFound` when the task
    /// does not exist or belongs to another user.
    async fn update(&self, user_id: Uuid, task_id: Uuid, patch: TaskPatch) -> Result<Task>;

    /// Delete; same not-found semantics as `update`.
    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<()>;
}
