use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored conversation turn. Immutable once written; only append and
/// clear-history mutate the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Construct a new turn with a fresh id and server-side timestamp.
    pub fn new(
        user_id: Uuid,
        role: MessageRole,
        content: String,
        message_metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            content,
            message_metadata,
            created_at: Utc::now(),
        }
    }
}

/// Author of a turn. Constraining the role at construction keeps free-form
/// role strings out of the store entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}
