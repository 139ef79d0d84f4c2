use async_trait::async_trait;
use mongodb::Client;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{PersistError, Result};
use crate::models::{ChatMessage, MessageRole, NewTask, Task, TaskPage, TaskPatch};
use crate::mongo::repositories::{MessageRepository, TaskRepository};
use crate::store::{MessageStore, TaskStore};

/// MongoDB-backed store for chat messages and tasks.
pub struct MongoStore {
    messages: MessageRepository,
    tasks: TaskRepository,
}

impl MongoStore {
    /// Connect and bootstrap the secondary indexes.
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let store = Self {
            messages: MessageRepository::new(&client, database),
            tasks: TaskRepository::new(&client, database),
        };
        store.messages.ensure_indexes().await?;
        store.tasks.ensure_indexes().await?;

        Ok(store)
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn append(
        &self,
        user_id: Uuid,
        role: MessageRole,
        content: String,
        metadata: Option<Value>,
    ) -> Result<ChatMessage> {
        let message = ChatMessage::new(user_id, role, content, metadata);
        self.messages.insert(message.clone()).await?;
        Ok(message)
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        self.messages.recent(user_id, limit).await
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let removed = self.messages.clear(user_id).await?;
        tracing::debug!(%user_id, removed, "cleared chat history");
        Ok(removed)
    }
}

#[async_trait]
impl TaskStore for MongoStore {
    async fn create(&self, user_id: Uuid, new: NewTask) -> Result<Task> {
        if new.title.trim().is_empty() {
            return Err(PersistError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let task = Task::new(user_id, new);
        self.tasks.insert(task.clone()).await?;
        Ok(task)
    }

    async fn list(&self, user_id: Uuid, page: i64, page_size: i64) -> Result<TaskPage> {
        self.tasks.page(user_id, page, page_size).await
    }

    async fn update(&self, user_id: Uuid, task_id: Uuid, patch: TaskPatch) -> Result<Task> {
        self.tasks.update(user_id, task_id, patch).await
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        self.tasks.delete(user_id, task_id).await
    }
}
