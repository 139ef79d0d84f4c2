use std::sync::Arc;

use taskchat_core::ChatService;
use taskchat_persist::TaskStore;

use crate::config::Config;

/// Shared application state passed to all handlers.
///
/// Resources are wrapped in Arc for sharing across async tasks; the chat
/// service is stateless and built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<ChatService>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(config: Config, chat: ChatService, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            tasks,
        }
    }
}
