use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// Chat message, provider-agnostic but serializing to the OpenAI-compatible
/// wire shape Groq expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// System instruction
    System { content: String },

    /// User message
    #[serde(rename = "user")]
    Human { content: String },

    /// Assistant message; `content` is null when the turn is a tool call
    #[serde(rename = "assistant")]
    AI {
        content: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },

    /// Tool result fed back to the model
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::AI {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Assistant turn carrying tool calls and no text
    pub fn ai_with_tools(tool_calls: Vec<ToolCall>) -> Self {
        Self::AI {
            content: None,
            tool_calls: Some(tool_calls),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Role as the wire string
    pub fn role(&self) -> &str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "user",
            Self::AI { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }
}
