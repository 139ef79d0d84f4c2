pub mod catalog;
pub mod dispatch;
pub mod history;
pub mod service;

pub use catalog::{task_function_catalog, TaskFunction};
pub use dispatch::{Dispatcher, FunctionResult, TaskView};
pub use history::{build_context, SYSTEM_PROMPT};
pub use service::{ChatReply, ChatService, ChatSettings};
