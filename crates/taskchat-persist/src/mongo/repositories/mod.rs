mod message;
mod task;

pub use message::MessageRepository;
pub use task::TaskRepository;
