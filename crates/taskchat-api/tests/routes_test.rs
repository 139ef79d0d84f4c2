use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use taskchat_api::config::{
    Config, CorsConfig, LlmConfig, LoggingConfig, MongoDbConfig, ServerConfig,
};
use taskchat_api::state::AppState;
use taskchat_api::{auth::USER_ID_HEADER, build_router};
use taskchat_core::{ChatService, ChatSettings};
use taskchat_persist::MemoryStore;

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        cors: CorsConfig {
            enabled: false,
            origins: Vec::new(),
        },
        mongodb: MongoDbConfig {
            database: "taskchat_test".to_string(),
        },
        llm: LlmConfig {
            model: "test-model".to_string(),
            temperature: 0.0,
            max_tokens: 128,
            context_turns: 10,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
        mongodb_uri: String::new(),
        groq_api_key: None,
    }
}

/// Router over in-memory stores with no LLM client configured.
fn app() -> axum::Router {
    let store = Arc::new(MemoryStore::new());
    let settings = ChatSettings {
        model: "test-model".to_string(),
        temperature: 0.0,
        max_tokens: 128,
        context_turns: 10,
    };
    let chat = ChatService::new(None, store.clone(), store.clone(), settings);
    build_router(Arc::new(AppState::new(test_config(), chat, store)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn chat_request(user_id: Uuid, caller: Option<Uuid>, message: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/chat?user_id={user_id}"))
        .header("content-type", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(USER_ID_HEADER, caller.to_string());
    }
    builder
        .body(Body::from(
            json!({ "message": message }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn chat_requires_the_identity_header() {
    let user = Uuid::new_v4();

    let response = app().oneshot(chat_request(user, None, "hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn chat_rejects_access_to_another_users_conversation() {
    let owner = Uuid::new_v4();
    let caller = Uuid::new_v4();

    let response = app()
        .oneshot(chat_request(owner, Some(caller), "hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["message"], "Cannot access other users' chat");
    assert_eq!(
        body["details"]["requested_user_id"],
        owner.to_string()
    );
}

#[tokio::test]
async fn chat_without_llm_key_returns_the_fixed_unavailability_reply() {
    let user = Uuid::new_v4();

    let response = app()
        .oneshot(chat_request(user, Some(user), "Create a task to buy groceries"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["response"],
        "Chat service is not configured. Please set GROQ_API_KEY."
    );
    assert!(body["task_result"].is_null());
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn chat_validates_message_length() {
    let user = Uuid::new_v4();
    let app = app();

    let response = app
        .clone()
        .oneshot(chat_request(user, Some(user), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_long = "a".repeat(2001);
    let response = app
        .oneshot(chat_request(user, Some(user), &too_long))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_validates_the_limit_range() {
    let user = Uuid::new_v4();
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/chat/history?user_id={user}&limit=0"))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/chat/history?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn clear_history_reports_the_deleted_count() {
    let user = Uuid::new_v4();

    let response = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/chat/history?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Chat history cleared successfully");
    assert_eq!(body["deleted_count"], 0);
}

#[tokio::test]
async fn task_crud_round_trip() {
    let user = Uuid::new_v4();
    let app = app();

    // Create
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/tasks?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"title": "Buy groceries", "description": "milk"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "Buy groceries");
    assert_eq!(created["is_completed"], false);
    let task_id = created["id"].as_str().unwrap().to_string();

    // List
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/tasks?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["id"], task_id);

    // Complete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/tasks/{task_id}?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .header("content-type", "application/json")
                .body(Body::from(json!({"is_completed": true}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["is_completed"], true);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/tasks/{task_id}?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/tasks/{task_id}?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .header("content-type", "application/json")
                .body(Body::from(json!({"is_completed": false}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_create_rejects_an_overlong_title() {
    let user = Uuid::new_v4();

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/tasks?user_id={user}"))
                .header(USER_ID_HEADER, user.to_string())
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"title": "t".repeat(201)}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["storage"], "connected");
}
