use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::chat::send_message,
        routes::chat::get_chat_history,
        routes::chat::clear_chat_history,
        routes::tasks::create_task,
        routes::tasks::list_tasks,
        routes::tasks::update_task,
        routes::tasks::delete_task,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::chat::ChatMessageRequest,
        routes::chat::ChatMessageResponse,
        routes::chat::ChatResponseBody,
        routes::chat::ChatHistoryResponse,
        routes::chat::ClearHistoryResponse,
        routes::tasks::CreateTaskRequest,
        routes::tasks::UpdateTaskRequest,
        routes::tasks::TaskResponse,
        routes::tasks::TaskListResponse,
    )),
    tags(
        (name = "chat", description = "Conversational task management"),
        (name = "tasks", description = "Direct task CRUD"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
