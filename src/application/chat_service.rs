// Chat service - Briefs the backend on fleet state and shields callers from its failures
use crate::application::chat_backend::ChatBackend;
use crate::application::curation_service::build_alerts;
use crate::application::data_context::DataContext;
use crate::application::fleet_service::summarize_fleet;
use crate::domain::chat::{ChatRequest, ChatResponse, ToolKind};
use crate::domain::robot::RobotStatus;
use chrono::Utc;
use std::sync::Arc;

pub const APOLOGY: &str =
    "Sorry, I couldn't reach the assistant service just now. Please try again in a moment.";

#[derive(Clone)]
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
    context: Arc<DataContext>,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>, context: Arc<DataContext>) -> Self {
        Self { backend, context }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Always produces a response; backend errors become an apology with `error: true`.
    pub async fn respond(&self, request: ChatRequest) -> ChatResponse {
        let prompt = self.system_prompt(&request);

        match self.backend.complete(&prompt, &request).await {
            Ok(response) => {
                tracing::debug!(
                    backend = self.backend.name(),
                    tool_calls = response.tool_calls.len(),
                    needs_permission = response.needs_permission,
                    "chat reply ready"
                );
                response
            }
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "chat backend failed");
                ChatResponse::failure(APOLOGY.to_string())
            }
        }
    }

    fn system_prompt(&self, request: &ChatRequest) -> String {
        let summary = summarize_fleet(self.context.robots());
        let alerts = build_alerts(self.context.operations(), Utc::now());

        let mut prompt = format!(
            "You are the fleet operations assistant for a robot delivery dashboard.\n\
             Fleet: {} robots, {} active, {} charging, {} in error, {} in maintenance. \
             Average battery {:.1}%, average uptime {:.1}%.\n",
            summary.total,
            summary.count(RobotStatus::Active),
            summary.count(RobotStatus::Charging),
            summary.count(RobotStatus::Error),
            summary.count(RobotStatus::Maintenance),
            summary.avg_battery,
            summary.avg_uptime,
        );

        prompt.push_str(&format!(
            "Data snapshot generated {} from seed {}.\n",
            self.context.generated_at().format("%Y-%m-%d %H:%M UTC"),
            self.context.seed()
        ));

        prompt.push_str("Open alerts:\n");
        for alert in &alerts {
            prompt.push_str(&format!("- [{:?}] {}\n", alert.severity, alert.title));
        }

        prompt.push_str("Available tools:\n");
        for kind in ToolKind::ALL {
            prompt.push_str(&format!("- {}: {}\n", kind.name(), kind.description()));
        }

        if let Some(context) = &request.context {
            prompt.push_str(&format!("The user is currently viewing: {}\n", context));
        }
        if request.is_minimized {
            prompt.push_str("The chat window is minimized; keep replies to two sentences.\n");
        }
        if request.deep_research {
            prompt.push_str("Give a thorough answer and name the data you relied on.\n");
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat_backend::ChatBackendError;
    use crate::application::data_context::test_support;
    use crate::application::keyword_chat::KeywordChatBackend;
    use crate::domain::chat::{ChatMessage, ChatRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn complete(&self, _: &str, _: &ChatRequest) -> Result<ChatResponse, ChatBackendError> {
            Err(ChatBackendError::Upstream {
                status: 502,
                body: "bad gateway".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn complete(&self, prompt: &str, _: &ChatRequest) -> Result<ChatResponse, ChatBackendError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(ChatResponse::new("noted".to_string(), Vec::new()))
        }
    }

    fn request() -> ChatRequest {
        serde_json::from_value(serde_json::json!({
            "messages": [{"role": "user", "content": "status?"}],
            "isMinimized": true,
            "context": {"page": "fleet"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_apology() {
        let service = ChatService::new(Arc::new(FailingBackend), test_support::context());
        let response = service.respond(request()).await;

        assert_eq!(response.error, Some(true));
        assert_eq!(response.response, APOLOGY);
        assert!(response.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_fleet_briefing() {
        let backend = Arc::new(RecordingBackend::default());
        let service = ChatService::new(backend.clone(), test_support::context());
        let response = service.respond(request()).await;
        assert_eq!(response.response, "noted");

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Fleet: 101 robots"));
        assert!(prompts[0].contains("restart_robot"));
        assert!(prompts[0].contains("minimized"));
        assert!(prompts[0].contains("\"page\":\"fleet\""));
    }

    #[tokio::test]
    async fn test_keyword_backend_through_service() {
        let context = test_support::context();
        let service = ChatService::new(Arc::new(KeywordChatBackend::new(context.clone())), context);
        let response = service
            .respond(ChatRequest {
                messages: vec![ChatMessage {
                    role: ChatRole::User,
                    content: "generate a report".to_string(),
                }],
                model: None,
                context: None,
                auto_navigate: false,
                deep_research: false,
                is_minimized: false,
            })
            .await;

        assert_eq!(service.backend_name(), "keyword");
        assert!(response.error.is_none());
        assert_eq!(response.tool_calls[0].name, ToolKind::GenerateReport);
    }
}
