use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use taskchat_persist::{NewTask, Task, TaskPatch};

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub user_id: Uuid,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Task title (1-200 characters)
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub items: Vec<TaskResponse>,
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    params(
        ("user_id" = Uuid, Query, description = "Owner of the new task")
    ),
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid title"),
        (status = 403, description = "Caller is not the owner")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskQuery>,
    user: CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    user.authorize(query.user_id, "Cannot create tasks for other users")?;

    let length = request.title.chars().count();
    if length == 0 || length > MAX_TITLE_CHARS {
        return Err(ApiError::BadRequest(
            "title must be between 1 and 200 characters".to_string(),
        ));
    }

    let task = state
        .tasks
        .create(
            query.user_id,
            NewTask {
                title: request.title,
                description: request.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task_to_response(task))))
}

/// List tasks for a user, newest first
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("user_id" = Uuid, Query, description = "Owner of the tasks"),
        ("page" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("page_size" = Option<i64>, Query, description = "Page size (1-100, default 20)")
    ),
    responses(
        (status = 200, description = "One page of tasks", body = TaskListResponse),
        (status = 403, description = "Caller is not the owner")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTasksQuery>,
    user: CurrentUser,
) -> ApiResult<Json<TaskListResponse>> {
    user.authorize(query.user_id, "Cannot access other users' tasks")?;

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);

    let tasks = state.tasks.list(query.user_id, page, page_size).await?;

    Ok(Json(TaskListResponse {
        items: tasks.items.into_iter().map(task_to_response).collect(),
        total: tasks.total,
        page: tasks.page,
        page_size: tasks.page_size,
    }))
}

/// Update a task
#[utoipa::path(
    patch,
    path = "/tasks/{task_id}",
    request_body = UpdateTaskRequest,
    params(
        ("task_id" = Uuid, Path, description = "Task to update"),
        ("user_id" = Uuid, Query, description = "Owner of the task")
    ),
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<Uuid>,
    Query(query): Query<TaskQuery>,
    user: CurrentUser,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    user.authorize(query.user_id, "Cannot modify other users' tasks")?;

    if let Some(title) = &request.title {
        let length = title.chars().count();
        if length == 0 || length > MAX_TITLE_CHARS {
            return Err(ApiError::BadRequest(
                "title must be between 1 and 200 characters".to_string(),
            ));
        }
    }

    let task = state
        .tasks
        .update(
            query.user_id,
            task_id,
            TaskPatch {
                title: request.title,
                description: request.description,
                is_completed: request.is_completed,
            },
        )
        .await?;

    Ok(Json(task_to_response(task)))
}

/// Delete a task permanently
#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    params(
        ("task_id" = Uuid, Path, description = "Task to delete"),
        ("user_id" = Uuid, Query, description = "Owner of the task")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<Uuid>,
    Query(query): Query<TaskQuery>,
    user: CurrentUser,
) -> ApiResult<StatusCode> {
    user.authorize(query.user_id, "Cannot modify other users' tasks")?;

    state.tasks.delete(query.user_id, task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn task_to_response(task: Task) -> TaskResponse {
    TaskResponse {
        id: task.id,
        user_id: task.user_id,
        title: task.title,
        description: task.description,
        is_completed: task.is_completed,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}
