pub mod types;
pub mod traits;
pub mod groq;

pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use groq::GroqClient;
pub use types::{FunctionCall, FunctionDefinition, Message, Tool, ToolCall, ToolChoice};
