use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use taskchat_persist::{NewTask, PersistError, Task, TaskPatch, TaskStore};

use crate::catalog::TaskFunction;

/// JSON-safe task projection embedded in function results and API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
        }
    }
}

/// Outcome of one function dispatch: a success flag plus either a task
/// projection, a task listing, a confirmation message, or an error string.
/// Embedded verbatim in the tool-result turn and the API response.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FunctionResult {
    fn task(task: TaskView) -> Self {
        Self {
            success: true,
            task: Some(task),
            tasks: None,
            total: None,
            message: None,
            error: None,
        }
    }

    fn listing(tasks: Vec<TaskView>) -> Self {
        Self {
            success: true,
            task: None,
            total: Some(tasks.len()),
            tasks: Some(tasks),
            message: None,
            error: None,
        }
    }

    fn deleted() -> Self {
        Self {
            success: true,
            task: None,
            tasks: None,
            total: None,
            message: Some("Task deleted successfully".to_string()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            task: None,
            tasks: None,
            total: None,
            message: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error("Invalid arguments: {0}")]
    Arguments(#[from] serde_json::Error),

    #[error("Invalid task id: {0}")]
    TaskId(#[from] uuid::Error),

    #[error(transparent)]
    Store(#[from] PersistError),
}

#[derive(Debug, Deserialize)]
struct CreateTaskArgs {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListTasksArgs {
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default = "default_list_limit")]
    limit: i64,
}

fn default_list_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
struct UpdateTaskArgs {
    task_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DeleteTaskArgs {
    task_id: String,
}

/// Executes model-issued function calls against the task store.
///
/// This is the single boundary where collaborator failures become data:
/// `dispatch` never returns an error, it returns `{success: false, error}` so
/// the conversation can continue and the model can explain the failure.
pub struct Dispatcher {
    tasks: Arc<dyn TaskStore>,
}

impl Dispatcher {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn dispatch(&self, name: &str, arguments: Value, user_id: Uuid) -> FunctionResult {
        let Some(function) = TaskFunction::from_name(name) else {
            return FunctionResult::error(format!("Unknown function: {name}"));
        };

        let outcome = match function {
            TaskFunction::CreateTask => self.create_task(arguments, user_id).await,
            TaskFunction::ListTasks => self.list_tasks(arguments, user_id).await,
            TaskFunction::UpdateTask => self.update_task(arguments, user_id).await,
            TaskFunction::DeleteTask => self.delete_task(arguments, user_id).await,
        };

        outcome.unwrap_or_else(|e| {
            tracing::error!(function = name, error = %e, "error executing function");
            FunctionResult::error(e.to_string())
        })
    }

    async fn create_task(
        &self,
        arguments: Value,
        user_id: Uuid,
    ) -> Result<FunctionResult, DispatchError> {
        let args: CreateTaskArgs = serde_json::from_value(arguments)?;
        let task = self
            .tasks
            .create(
                user_id,
                NewTask {
                    title: args.title,
                    description: args.description,
                },
            )
            .await?;

        Ok(FunctionResult::task(task.into()))
    }

    async fn list_tasks(
        &self,
        arguments: Value,
        user_id: Uuid,
    ) -> Result<FunctionResult, DispatchError> {
        let args: ListTasksArgs = serde_json::from_value(arguments)?;

        let page = self.tasks.list(user_id, 1, args.limit).await?;
        let mut tasks = page.items;

        // Completion filter runs over the fetched page, not in the query.
        // Known limitation: a filtered listing can return fewer than `limit`
        // items even when more matches exist beyond the first page.
        if let Some(completed) = args.completed {
            tasks.retain(|t| t.is_completed == completed);
        }

        Ok(FunctionResult::listing(
            tasks.into_iter().map(Into::into).collect(),
        ))
    }

    async fn update_task(
        &self,
        arguments: Value,
        user_id: Uuid,
    ) -> Result<FunctionResult, DispatchError> {
        let args: UpdateTaskArgs = serde_json::from_value(arguments)?;
        let task_id = Uuid::parse_str(&args.task_id)?;

        let task = self
            .tasks
            .update(
                user_id,
                task_id,
                TaskPatch {
                    title: args.title,
                    description: args.description,
                    is_completed: args.is_completed,
                },
            )
            .await?;

        Ok(FunctionResult::task(task.into()))
    }

    async fn delete_task(
        &self,
        arguments: Value,
        user_id: Uuid,
    ) -> Result<FunctionResult, DispatchError> {
        let args: DeleteTaskArgs = serde_json::from_value(arguments)?;
        let task_id = Uuid::parse_str(&args.task_id)?;

        self.tasks.delete(user_id, task_id).await?;
        Ok(FunctionResult::deleted())
    }
}
