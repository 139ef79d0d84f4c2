pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod store;

pub use error::PersistError;
pub use memory::MemoryStore;
pub use models::{ChatMessage, MessageRole, NewTask, Task, TaskPage, TaskPatch};
pub use mongo::MongoStore;
pub use store::{MessageStore, TaskStore};
