use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{PersistError, Result};
use crate::models::{ChatMessage, MessageRole, NewTask, Task, TaskPage, TaskPatch};
use crate::store::{MessageStore, TaskStore};

/// In-memory store with the same semantics as `MongoStore`. Used by tests and
/// local development; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<ChatMessage>>,
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(
        &self,
        user_id: Uuid,
        role: MessageRole,
        content: String,
        metadata: Option<Value>,
    ) -> Result<ChatMessage> {
        let message = ChatMessage::new(user_id, role, content, metadata);
        let mut messages = self.messages.lock().expect("message store poisoned");
        messages.push(message.clone());
        Ok(message)
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        let messages = self.messages.lock().expect("message store poisoned");
        let mut owned: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps
        owned.sort_by_key(|m| m.created_at);

        let limit = limit.max(0) as usize;
        let skip = owned.len().saturating_sub(limit);
        Ok(owned.split_off(skip))
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let mut messages = self.messages.lock().expect("message store poisoned");
        let before = messages.len();
        messages.retain(|m| m.user_id != user_id);
        Ok((before - messages.len()) as u64)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, user_id: Uuid, new: NewTask) -> Result<Task> {
        if new.title.trim().is_empty() {
            return Err(PersistError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let task = Task::new(user_id, new);
        let mut tasks = self.tasks.lock().expect("task store poisoned");
        tasks.push(task.clone());
        Ok(task)
    }

    async fn list(&self, user_id: Uuid, page: i64, page_size: i64) -> Result<TaskPage> {
        let tasks = self.tasks.lock().expect("task store poisoned");
        let mut owned: Vec<Task> = tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at)); // newest first

        let total = owned.len() as u64;
        let skip = ((page - 1).max(0) * page_size).max(0) as usize;
        let items = owned
            .into_iter()
            .skip(skip)
            .take(page_size.max(0) as usize)
            .collect();

        Ok(TaskPage {
            items,
            total,
            page,
            page_size,
        })
    }

    async fn update(&self, user_id: Uuid, task_id: Uuid, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.tasks.lock().expect("task store poisoned");
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .ok_or(PersistError::TaskNotFound(task_id))?;

        task.apply_patch(patch);
        Ok(task.clone())
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        let mut tasks = self.tasks.lock().expect("task store poisoned");
        let before = tasks.len();
        tasks.retain(|t| !(t.id == task_id && t.user_id == user_id));

        if tasks.len() == before {
            return Err(PersistError::TaskNotFound(task_id));
        }
        Ok(())
    }
}
