use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use taskchat_core::FunctionResult;
use taskchat_persist::ChatMessage;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

const MAX_MESSAGE_CHARS: usize = 2000;
const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatMessageRequest {
    /// User message (1-2000 characters)
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub message_metadata: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponseBody {
    pub response: String,
    #[schema(value_type = Option<Object>)]
    pub task_result: Option<FunctionResult>,
    pub messages: Vec<ChatMessageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessageResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Send a chat message and get the assistant's reply
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatMessageRequest,
    params(
        ("user_id" = Uuid, Query, description = "User whose conversation this is")
    ),
    responses(
        (status = 200, description = "Assistant reply with updated history", body = ChatResponseBody),
        (status = 400, description = "Invalid message"),
        (status = 403, description = "Caller does not own this conversation")
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatQuery>,
    user: CurrentUser,
    Json(request): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatResponseBody>> {
    user.authorize(query.user_id, "Cannot access other users' chat")?;

    let length = request.message.chars().count();
    if length == 0 || length > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(
            "message must be between 1 and 2000 characters".to_string(),
        ));
    }

    let reply = state
        .chat
        .process_message(query.user_id, &request.message)
        .await?;

    Ok(Json(ChatResponseBody {
        response: reply.response,
        task_result: reply.task_result,
        messages: reply.messages.into_iter().map(message_to_response).collect(),
    }))
}

/// Get chat history for a user
#[utoipa::path(
    get,
    path = "/chat/history",
    params(
        ("user_id" = Uuid, Query, description = "User whose history to fetch"),
        ("limit" = Option<i64>, Query, description = "Maximum messages to return (1-200, default 50)")
    ),
    responses(
        (status = 200, description = "Chat history, oldest first", body = ChatHistoryResponse),
        (status = 403, description = "Caller does not own this conversation")
    ),
    tag = "chat"
)]
pub async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
    user: CurrentUser,
) -> ApiResult<Json<ChatHistoryResponse>> {
    user.authorize(query.user_id, "Cannot access other users' chat history")?;

    if !(1..=MAX_HISTORY_LIMIT).contains(&query.limit) {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 200".to_string(),
        ));
    }

    let messages = state.chat.history(query.user_id, query.limit).await?;
    let responses: Vec<ChatMessageResponse> =
        messages.into_iter().map(message_to_response).collect();

    Ok(Json(ChatHistoryResponse {
        total: responses.len(),
        messages: responses,
    }))
}

/// Clear all chat history for a user
#[utoipa::path(
    delete,
    path = "/chat/history",
    params(
        ("user_id" = Uuid, Query, description = "User whose history to clear")
    ),
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 403, description = "Caller does not own this conversation")
    ),
    tag = "chat"
)]
pub async fn clear_chat_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatQuery>,
    user: CurrentUser,
) -> ApiResult<Json<ClearHistoryResponse>> {
    user.authorize(query.user_id, "Cannot delete other users' chat history")?;

    let deleted_count = state.chat.clear_history(query.user_id).await?;

    Ok(Json(ClearHistoryResponse {
        message: "Chat history cleared successfully".to_string(),
        deleted_count,
    }))
}

fn message_to_response(message: ChatMessage) -> ChatMessageResponse {
    ChatMessageResponse {
        id: message.id,
        user_id: message.user_id,
        role: message.role.as_str().to_string(),
        content: message.content,
        message_metadata: message.message_metadata,
        created_at: message.created_at,
    }
}
