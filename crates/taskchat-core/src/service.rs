use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use uuid::Uuid;

use taskchat_llm::{ChatClient, ChatOptions, ChatRequest, Message, ToolChoice};
use taskchat_persist::{ChatMessage, MessageRole, MessageStore, PersistError, TaskStore};

use crate::catalog::task_function_catalog;
use crate::dispatch::{Dispatcher, FunctionResult};
use crate::history::build_context;

/// Turns returned with each chat reply.
const REPLY_HISTORY: i64 = 50;

const UNCONFIGURED_REPLY: &str =
    "Chat service is not configured. Please set GROQ_API_KEY.";

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Stored turns assembled into the model context, current one included.
    pub context_turns: i64,
}

/// Result of one chat exchange returned to the API layer.
#[derive(Debug)]
pub struct ChatReply {
    pub response: String,
    pub task_result: Option<FunctionResult>,
    pub messages: Vec<ChatMessage>,
}

struct DispatchedCall {
    function: String,
    result: FunctionResult,
}

/// Conversation orchestrator.
///
/// One `process_message` call runs the full cycle: persist the user turn,
/// assemble the context window, invoke the model with the function catalog,
/// dispatch at most one function call, ask the model to confirm, persist the
/// assistant turn. The two model invocations are the only awaited external
/// calls; persistence failures propagate, model and dispatch failures fold
/// into an apologetic assistant message.
pub struct ChatService {
    llm: Option<Arc<dyn ChatClient>>,
    messages: Arc<dyn MessageStore>,
    dispatcher: Dispatcher,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        llm: Option<Arc<dyn ChatClient>>,
        messages: Arc<dyn MessageStore>,
        tasks: Arc<dyn TaskStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            llm,
            messages,
            dispatcher: Dispatcher::new(tasks),
            settings,
        }
    }

    pub async fn process_message(
        &self,
        user_id: Uuid,
        message: &str,
    ) -> Result<ChatReply, PersistError> {
        // No client, no processing: nothing is persisted on this path.
        let Some(llm) = &self.llm else {
            return Ok(ChatReply {
                response: UNCONFIGURED_REPLY.to_string(),
                task_result: None,
                messages: Vec::new(),
            });
        };

        self.messages
            .append(user_id, MessageRole::User, message.to_string(), None)
            .await?;

        let history = self
            .messages
            .recent(user_id, self.settings.context_turns)
            .await?;
        let context = build_context(&history, message);

        let (response, dispatched) = match self.run_exchange(llm.as_ref(), context, user_id).await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "chat exchange failed");
                (format!("I encountered an error: {e}"), None)
            }
        };

        let metadata = dispatched
            .as_ref()
            .map(|call| json!({ "function_call": call.function }));
        self.messages
            .append(user_id, MessageRole::Assistant, response.clone(), metadata)
            .await?;

        let messages = self.messages.recent(user_id, REPLY_HISTORY).await?;
        Ok(ChatReply {
            response,
            task_result: dispatched.map(|call| call.result),
            messages,
        })
    }

    /// The model round trips: first call with the function catalog, then,
    /// when a function was requested, the dispatch and a second call (without
    /// tools) for a confirmation grounded in the result. A first-call failure
    /// returns before anything is dispatched.
    async fn run_exchange(
        &self,
        llm: &dyn ChatClient,
        mut context: Vec<Message>,
        user_id: Uuid,
    ) -> anyhow::Result<(String, Option<DispatchedCall>)> {
        let first = llm
            .chat(
                ChatRequest::new(self.settings.model.as_str(), context.clone()).with_options(
                    self.chat_options()
                        .tools(task_function_catalog())
                        .tool_choice(ToolChoice::auto()),
                ),
            )
            .await?;

        // Single-action policy: only the first tool call of a turn is honored.
        let Some(tool_call) = first.tool_calls.unwrap_or_default().into_iter().next() else {
            return Ok((first.content.unwrap_or_default(), None));
        };

        let function = tool_call.function.name.clone();
        let arguments = tool_call
            .arguments_value()
            .context("model produced undecodable function arguments")?;

        let result = self.dispatcher.dispatch(&function, arguments, user_id).await;
        tracing::info!(%user_id, function = %function, success = result.success, "dispatched task function");

        let call_id = tool_call.id.clone();
        context.push(Message::ai_with_tools(vec![tool_call]));
        context.push(Message::tool_result(call_id, serde_json::to_string(&result)?));

        let second = llm
            .chat(
                ChatRequest::new(self.settings.model.as_str(), context)
                    .with_options(self.chat_options()),
            )
            .await?;

        Ok((
            second.content.unwrap_or_default(),
            Some(DispatchedCall { function, result }),
        ))
    }

    fn chat_options(&self) -> ChatOptions {
        ChatOptions::new()
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
    }

    /// Chat history, oldest-first, at most `limit` turns.
    pub async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, PersistError> {
        self.messages.recent(user_id, limit).await
    }

    /// Remove the user's entire history; returns the number of turns removed.
    pub async fn clear_history(&self, user_id: Uuid) -> Result<u64, PersistError> {
        self.messages.clear(user_id).await
    }
}
