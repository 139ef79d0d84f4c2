use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskchat_api::{build_router, config::Config, state::AppState};
use taskchat_core::{ChatService, ChatSettings};
use taskchat_llm::{ChatClient, GroqClient};
use taskchat_persist::MongoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting taskchat API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!("Connecting to MongoDB");
    let store = Arc::new(MongoStore::connect(&config.mongodb_uri, &config.mongodb.database).await?);
    tracing::info!("MongoDB connected");

    let llm: Option<Arc<dyn ChatClient>> = match config.groq_api_key.as_deref() {
        Some(key) => Some(Arc::new(GroqClient::new(key)?)),
        None => {
            tracing::warn!("GROQ_API_KEY is not set; chat runs in unavailable mode");
            None
        }
    };

    let settings = ChatSettings {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
        context_turns: config.llm.context_turns,
    };
    let chat = ChatService::new(llm, store.clone(), store.clone(), settings);

    let state = Arc::new(AppState::new(config.clone(), chat, store));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
