use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, MessageRole, Task};

/// MongoDB document for a chat turn. UUIDs are stored as native BSON UUIDs
/// and timestamps as BSON datetimes so the `created_at` index sorts correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    #[serde(rename = "_id")]
    pub id: bson::Uuid,
    pub user_id: bson::Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_metadata: Option<Bson>,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(rename = "_id")]
    pub id: bson::Uuid,
    pub user_id: bson::Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

// Conversions between domain models and MongoDB documents

impl TryFrom<ChatMessage> for MessageDocument {
    type Error = bson::ser::Error;

    fn try_from(msg: ChatMessage) -> Result<Self, Self::Error> {
        let message_metadata = msg
            .message_metadata
            .as_ref()
            .map(bson::to_bson)
            .transpose()?;

        Ok(Self {
            id: bson::Uuid::from_uuid_1(msg.id),
            user_id: bson::Uuid::from_uuid_1(msg.user_id),
            role: msg.role,
            content: msg.content,
            message_metadata,
            created_at: bson::DateTime::from_chrono(msg.created_at),
        })
    }
}

impl From<MessageDocument> for ChatMessage {
    fn from(doc: MessageDocument) -> Self {
        Self {
            id: doc.id.to_uuid_1(),
            user_id: doc.user_id.to_uuid_1(),
            role: doc.role,
            content: doc.content,
            message_metadata: doc.message_metadata.map(Bson::into_relaxed_extjson),
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl From<Task> for TaskDocument {
    fn from(task: Task) -> Self {
        Self {
            id: bson::Uuid::from_uuid_1(task.id),
            user_id: bson::Uuid::from_uuid_1(task.user_id),
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
            created_at: bson::DateTime::from_chrono(task.created_at),
            updated_at: bson::DateTime::from_chrono(task.updated_at),
        }
    }
}

impl From<TaskDocument> for Task {
    fn from(doc: TaskDocument) -> Self {
        Self {
            id: doc.id.to_uuid_1(),
            user_id: doc.user_id.to_uuid_1(),
            title: doc.title,
            description: doc.description,
            is_completed: doc.is_completed,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn message_round_trips_through_document() {
        let message = ChatMessage::new(
            Uuid::new_v4(),
            MessageRole::Assistant,
            "Created the task.".to_string(),
            Some(json!({"function_call": "create_task"})),
        );

        let doc = MessageDocument::try_from(message.clone()).unwrap();
        let back = ChatMessage::from(doc);

        assert_eq!(back.id, message.id);
        assert_eq!(back.user_id, message.user_id);
        assert_eq!(back.role, message.role);
        assert_eq!(back.content, message.content);
        assert_eq!(
            back.message_metadata,
            Some(json!({"function_call": "create_task"}))
        );
    }

    #[test]
    fn message_without_metadata_stays_bare() {
        let message = ChatMessage::new(
            Uuid::new_v4(),
            MessageRole::User,
            "Show me my tasks".to_string(),
            None,
        );

        let doc = MessageDocument::try_from(message).unwrap();
        assert!(doc.message_metadata.is_none());
    }

    #[test]
    fn task_round_trips_through_document() {
        let task = Task::new(
            Uuid::new_v4(),
            crate::models::NewTask {
                title: "Buy groceries".to_string(),
                description: None,
            },
        );

        let back = Task::from(TaskDocument::from(task.clone()));
        assert_eq!(back.id, task.id);
        assert_eq!(back.title, task.title);
        assert!(!back.is_completed);
    }
}
