// Chat backend trait - Where assistant replies come from
use crate::domain::chat::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatBackendError {
    #[error("request to assistant backend failed: {0}")]
    Transport(String),

    #[error("assistant backend returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("could not decode assistant response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Produce a reply to the conversation in `request`.
    /// `system_prompt` carries a briefing on the current fleet state.
    async fn complete(&self, system_prompt: &str, request: &ChatRequest) -> Result<ChatResponse, ChatBackendError>;
}
