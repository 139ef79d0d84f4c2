use serde_json::json;
use taskchat_llm::Tool;

/// The four task operations the model may invoke.
///
/// Dispatch goes through this enum rather than open-ended string matching, so
/// an unrecognized name always lands in the explicit unknown branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFunction {
    CreateTask,
    ListTasks,
    UpdateTask,
    DeleteTask,
}

impl TaskFunction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ListTasks => "list_tasks",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create_task" => Some(Self::CreateTask),
            "list_tasks" => Some(Self::ListTasks),
            "update_task" => Some(Self::UpdateTask),
            "delete_task" => Some(Self::DeleteTask),
            _ => None,
        }
    }
}

/// Function descriptors offered to the model on every first-pass completion.
/// Static configuration, rebuilt per request and never mutated.
pub fn task_function_catalog() -> Vec<Tool> {
    vec![
        Tool::new(
            "create_task",
            "Create a new task for the user",
            json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The title of the task"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional description of the task"
                    }
                },
                "required": ["title"]
            }),
        ),
        Tool::new(
            "list_tasks",
            "List all tasks for the user, optionally filtered by completion status",
            json!({
                "type": "object",
                "properties": {
                    "completed": {
                        "type": "boolean",
                        "description": "Filter by completion status (true for completed, false for pending, omit for all)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of tasks to return (default 20)"
                    }
                }
            }),
        ),
        Tool::new(
            "update_task",
            "Update an existing task (title, description, or completion status)",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "The UUID of the task to update"
                    },
                    "title": {
                        "type": "string",
                        "description": "New title for the task"
                    },
                    "description": {
                        "type": "string",
                        "description": "New description for the task"
                    },
                    "is_completed": {
                        "type": "boolean",
                        "description": "New completion status"
                    }
                },
                "required": ["task_id"]
            }),
        ),
        Tool::new(
            "delete_task",
            "Delete a task permanently",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "The UUID of the task to delete"
                    }
                },
                "required": ["task_id"]
            }),
        ),
    ]
}
