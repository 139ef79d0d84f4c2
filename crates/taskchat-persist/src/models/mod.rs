mod message;
mod task;

pub use message::{ChatMessage, MessageRole};
pub use task::{NewTask, Task, TaskPage, TaskPatch};
