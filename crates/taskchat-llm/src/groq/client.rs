// Groq client (HTTP direct, no SDK). Groq exposes the OpenAI-compatible
// chat-completions API, so the payload shapes below follow that format.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{Message, ToolCall};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

pub struct GroqClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GroqClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GROQ_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (self-hosted gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the chat-completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
        });

        let obj = request
            .as_object_mut()
            .expect("chat request payload is an object");

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(tools) = &options.tools {
            obj.insert("tools".to_string(), serde_json::to_value(tools)?);
        }
        if let Some(tool_choice) = &options.tool_choice {
            obj.insert("tool_choice".to_string(), serde_json::to_value(tool_choice)?);
        }

        Ok(request)
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload =
            self.build_chat_request(&request.model, &request.messages, &request.options)?;

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error ({}): {}", status, error_text);
        }

        let raw: GroqChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw.choices.into_iter().next();
        Ok(ChatResponse {
            content: choice.as_ref().and_then(|c| c.message.content.clone()),
            tool_calls: choice.as_ref().and_then(|c| c.message.tool_calls.clone()),
            usage: raw.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason),
        })
    }
}

// ============================================================================
// GROQ RESPONSE TYPES (chat completions)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct GroqChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolChoice;

    #[test]
    fn chat_payload_includes_optional_fields() {
        let client = GroqClient::new("test-key").unwrap();
        let options = ChatOptions::new()
            .temperature(0.7)
            .max_tokens(512)
            .tool_choice(ToolChoice::auto());

        let payload = client
            .build_chat_request("llama-3.3-70b-versatile", &[Message::human("hi")], &options)
            .unwrap();

        assert_eq!(payload["model"], "llama-3.3-70b-versatile");
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["max_tokens"], 512);
        assert_eq!(payload["tool_choice"], "auto");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert!(payload.get("tools").is_none());
    }

    #[test]
    fn assistant_tool_turn_serializes_null_content() {
        let call = ToolCall {
            id: "call_1".to_string(),
            tool_type: "function".to_string(),
            function: crate::types::FunctionCall {
                name: "create_task".to_string(),
                arguments: r#"{"title":"Buy milk"}"#.to_string(),
            },
        };
        let value = serde_json::to_value(Message::ai_with_tools(vec![call])).unwrap();

        assert_eq!(value["role"], "assistant");
        assert!(value["content"].is_null());
        assert_eq!(value["tool_calls"][0]["function"]["name"], "create_task");
    }
}
