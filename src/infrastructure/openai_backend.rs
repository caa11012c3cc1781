// OpenAI-compatible chat backend
use crate::application::chat_backend::{ChatBackend, ChatBackendError};
use crate::domain::chat::{ChatRequest, ChatResponse, ChatRole, ToolCall, ToolKind};
use crate::infrastructure::config::LlmSettings;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const EMPTY_REPLY: &str = "I've prepared the requested actions.";

#[derive(Debug, Clone)]
pub struct OpenAiChatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl OpenAiChatBackend {
    pub fn new(settings: &LlmSettings, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client for assistant backend")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn tool_specs() -> Vec<Value> {
    ToolKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "type": "function",
                "function": {
                    "name": kind.name(),
                    "description": kind.description(),
                    "parameters": { "type": "object", "additionalProperties": true }
                }
            })
        })
        .collect()
}

fn into_chat_response(parsed: CompletionResponse, auto_navigate: bool) -> Result<ChatResponse, ChatBackendError> {
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatBackendError::Decode("response had no choices".to_string()))?;

    let calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .filter_map(|call| {
            let Some(kind) = ToolKind::from_name(&call.function.name) else {
                tracing::warn!(tool = %call.function.name, "ignoring unknown tool requested by assistant");
                return None;
            };
            let parameters = if call.function.arguments.trim().is_empty() {
                json!({})
            } else {
                serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    tracing::warn!(tool = kind.name(), error = %e, "tool arguments were not valid JSON");
                    json!({})
                })
            };
            Some(ToolCall::new(call.id, kind, parameters, auto_navigate))
        })
        .collect();

    let text = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string());

    Ok(ChatResponse::new(text, calls))
}

#[async_trait]
impl ChatBackend for OpenAiChatBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, system_prompt: &str, request: &ChatRequest) -> Result<ChatResponse, ChatBackendError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: ChatRole::System,
            content: system_prompt,
        });
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        let body = CompletionRequest {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages,
            tools: tool_specs(),
        };

        tracing::debug!(model = body.model, messages = body.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatBackendError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatBackendError::Upstream { status, body });
        }

        let parsed = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| ChatBackendError::Decode(e.to_string()))?;

        into_chat_response(parsed, request.auto_navigate)
    }
}
