pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::middleware::logging;
use crate::routes::{chat, health, tasks};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat
        .route("/chat", post(chat::send_message))
        .route("/chat/history", get(chat::get_chat_history))
        .route("/chat/history", delete(chat::clear_chat_history))
        // Tasks
        .route("/tasks", post(tasks::create_task))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/:task_id", patch(tasks::update_task))
        .route("/tasks/:task_id", delete(tasks::delete_task));

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", docs::ApiDoc::openapi()))
        .merge(api_routes)
        .layer(from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
