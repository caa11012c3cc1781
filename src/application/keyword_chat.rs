// Keyword chat backend - Deterministic replies when no LLM is configured
use crate::application::chat_backend::{ChatBackend, ChatBackendError};
use crate::application::curation_service::{build_alerts, curate_kpis};
use crate::application::data_context::DataContext;
use crate::application::fleet_service::{facility_rollups, summarize_fleet};
use crate::domain::chat::{ChatRequest, ChatResponse, ToolCall, ToolKind};
use crate::domain::robot::{Robot, RobotStatus};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

const HELP_TEXT: &str = "I can help with the fleet. Try asking about battery levels, active alerts, \
KPIs, facilities, a specific robot by its 6-character id, or say \"open analytics\" to jump to a page.";

const RESTART_WORDS: [&str; 2] = ["restart", "reboot"];
const MAINTENANCE_WORDS: [&str; 3] = ["maintenance", "service", "schedule"];
const BATTERY_WORDS: [&str; 3] = ["battery", "charge", "charging"];
const ISSUE_WORDS: [&str; 5] = ["error", "alert", "issue", "problem", "fault"];
const KPI_WORDS: [&str; 5] = ["kpi", "performance", "orders", "uptime", "nps"];
const FACILITY_WORDS: [&str; 4] = ["facility", "facilities", "site", "location"];
const LIST_WORDS: [&str; 4] = ["show", "list", "filter", "which"];
const NAVIGATE_WORDS: [&str; 4] = ["go to", "navigate", "open", "take me"];
const PAGES: [&str; 6] = ["fleet", "analytics", "training", "presentation", "settings", "dashboard"];

pub struct KeywordChatBackend {
    context: Arc<DataContext>,
}

impl KeywordChatBackend {
    pub fn new(context: Arc<DataContext>) -> Self {
        Self { context }
    }

    fn route(&self, request: &ChatRequest) -> ChatResponse {
        let Some(message) = request.last_user_message() else {
            return ChatResponse::new(HELP_TEXT.to_string(), Vec::new());
        };
        let text = message.to_lowercase();
        let mut replies: Vec<String> = Vec::new();
        let mut calls = ToolCalls::new(request.auto_navigate);

        if let Some(robot) = self.mentioned_robot(message) {
            replies.push(describe_robot(robot));
            let params = json!({ "robotId": robot.id });
            if has_any(&text, &RESTART_WORDS) {
                replies.push(format!("Restarting {} needs your confirmation.", robot.name));
                calls.push(ToolKind::RestartRobot, params);
            } else if has_any(&text, &MAINTENANCE_WORDS) {
                replies.push(format!("I can book the next maintenance window for {}.", robot.name));
                calls.push(
                    ToolKind::ScheduleMaintenance,
                    json!({ "robotId": robot.id, "window": "next_available" }),
                );
            } else {
                calls.push(ToolKind::ShowRobotDetails, params);
            }
        } else if has_any(&text, &RESTART_WORDS) {
            replies.push(self.restart_prompt());
        }

        if has_any(&text, &BATTERY_WORDS) {
            replies.push(self.battery_reply());
            if has_any(&text, &LIST_WORDS) {
                calls.push(ToolKind::FilterRobots, json!({ "status": "charging" }));
            }
        }

        if has_any(&text, &ISSUE_WORDS) {
            replies.push(self.issue_reply());
            if has_any(&text, &LIST_WORDS) {
                calls.push(ToolKind::FilterRobots, json!({ "status": "error" }));
            }
        }

        if has_any(&text, &KPI_WORDS) {
            replies.push(self.kpi_reply());
        }

        if has_any(&text, &FACILITY_WORDS) {
            replies.push(self.facility_reply());
        }

        if text.contains("report") {
            replies.push("I'll put together an operations report for the last 30 days.".to_string());
            calls.push(ToolKind::GenerateReport, json!({ "range": "last_30_days", "format": "pdf" }));
        }

        if let Some(page) = navigation_target(&text) {
            replies.push(format!("Opening the {} page.", page));
            calls.push(ToolKind::NavigateToPage, json!({ "page": page }));
        }

        if replies.is_empty() {
            replies.push(HELP_TEXT.to_string());
        }

        if request.deep_research {
            replies.push(format!(
                "Sources checked: fleet registry ({} robots) and operations history ({} shift samples).",
                self.context.robots().len(),
                self.context.operations().len()
            ));
        }

        ChatResponse::new(replies.join("\n\n"), calls.into_inner())
    }

    fn mentioned_robot(&self, message: &str) -> Option<&Robot> {
        message
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| token.len() == 6)
            .find_map(|token| self.context.find_robot(token))
    }

    fn restart_prompt(&self) -> String {
        let failing: Vec<&str> = self
            .context
            .robots()
            .iter()
            .filter(|r| r.status == RobotStatus::Error)
            .map(|r| r.id.as_str())
            .collect();

        if failing.is_empty() {
            "Which robot should I restart? No robots are reporting errors right now.".to_string()
        } else {
            format!(
                "Which robot should I restart? These robots are reporting errors: {}.",
                failing.join(", ")
            )
        }
    }

    fn battery_reply(&self) -> String {
        let robots = self.context.robots();
        let summary = summarize_fleet(robots);
        let low = robots.iter().filter(|r| r.battery < 20).count();
        format!(
            "Average fleet battery is {:.1}%. {} robots are charging and {} are below 20%.",
            summary.avg_battery,
            summary.count(RobotStatus::Charging),
            low
        )
    }

    fn issue_reply(&self) -> String {
        let summary = summarize_fleet(self.context.robots());
        let alerts = build_alerts(self.context.operations(), Utc::now());
        let titles: Vec<String> = alerts.iter().take(3).map(|a| format!("- {}", a.title)).collect();
        format!(
            "{} robots are in an error state and {} are in maintenance. Latest alerts:\n{}",
            summary.count(RobotStatus::Error),
            summary.count(RobotStatus::Maintenance),
            titles.join("\n")
        )
    }

    fn kpi_reply(&self) -> String {
        let kpis = curate_kpis(self.context.operations(), Utc::now());
        let lines: Vec<String> = kpis
            .iter()
            .map(|k| format!("- {}: {} ({})", k.label, k.value, k.delta))
            .collect();
        format!("Here are the last 14 days:\n{}", lines.join("\n"))
    }

    fn facility_reply(&self) -> String {
        let lines: Vec<String> = facility_rollups(self.context.robots())
            .iter()
            .map(|f| {
                format!(
                    "- {} ({}): {} robots, {} active, {} in error",
                    f.facility, f.city, f.robot_count, f.active_count, f.error_count
                )
            })
            .collect();
        format!("Facility overview:\n{}", lines.join("\n"))
    }
}

#[async_trait]
impl ChatBackend for KeywordChatBackend {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn complete(&self, _system_prompt: &str, request: &ChatRequest) -> Result<ChatResponse, ChatBackendError> {
        Ok(self.route(request))
    }
}

struct ToolCalls {
    auto_navigate: bool,
    calls: Vec<ToolCall>,
}

impl ToolCalls {
    fn new(auto_navigate: bool) -> Self {
        Self {
            auto_navigate,
            calls: Vec::new(),
        }
    }

    fn push(&mut self, kind: ToolKind, parameters: Value) {
        let id = format!("call_{}", self.calls.len() + 1);
        self.calls.push(ToolCall::new(id, kind, parameters, self.auto_navigate));
    }

    fn into_inner(self) -> Vec<ToolCall> {
        self.calls
    }
}

fn has_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn navigation_target(text: &str) -> Option<&'static str> {
    if !has_any(text, &NAVIGATE_WORDS) {
        return None;
    }
    PAGES.into_iter().find(|page| text.contains(page))
}

fn describe_robot(robot: &Robot) -> String {
    let mut line = format!(
        "{} ({}, {}) at {} is {} with {}% battery and {:.1}% uptime.",
        robot.name,
        robot.model.label(),
        robot.vertical.label(),
        robot.facility.name,
        robot.status.as_str(),
        robot.battery,
        robot.uptime
    );
    if let Some(task) = &robot.current_task {
        line.push_str(&format!(" Current task: {} to {} ({}% done).", task.kind, task.destination, task.progress));
    }
    if let Some(fault) = robot.errors.first() {
        line.push_str(&format!(" Fault {}: {}.", fault.code, fault.message));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::data_context::test_support;
    use crate::domain::chat::{ChatMessage, ChatRole, ToolStatus};

    fn request(message: &str, auto_navigate: bool) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage {
                role: ChatRole::User,
                content: message.to_string(),
            }],
            model: None,
            context: None,
            auto_navigate,
            deep_research: false,
            is_minimized: false,
        }
    }

    fn backend() -> KeywordChatBackend {
        KeywordChatBackend::new(test_support::context())
    }

    #[test]
    fn test_help_when_nothing_matches() {
        let response = backend().route(&request("hello there", false));
        assert_eq!(response.response, HELP_TEXT);
        assert!(response.tool_calls.is_empty());
        assert!(!response.needs_permission);
    }

    #[test]
    fn test_empty_conversation_gets_help() {
        let mut empty = request("", false);
        empty.messages.clear();
        assert_eq!(backend().route(&empty).response, HELP_TEXT);
    }

    #[test]
    fn test_robot_lookup_shows_details() {
        let backend = backend();
        let id = backend.context.robots()[5].id.clone();
        let response = backend.route(&request(&format!("how is {} doing?", id.to_lowercase()), true));

        assert!(response.response.contains(&id));
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, ToolKind::ShowRobotDetails);
        assert_eq!(response.tool_calls[0].status, ToolStatus::Executed);
    }

    #[test]
    fn test_restart_requires_permission() {
        let backend = backend();
        let id = backend.context.robots()[0].id.clone();
        let response = backend.route(&request(&format!("please restart {}", id), true));

        assert!(response.needs_permission);
        assert_eq!(response.tool_calls[0].name, ToolKind::RestartRobot);
        assert_eq!(response.tool_calls[0].parameters["robotId"], json!(id));
    }

    #[test]
    fn test_navigation_pending_without_auto_navigate() {
        let response = backend().route(&request("Open analytics", false));
        assert_eq!(response.tool_calls[0].name, ToolKind::NavigateToPage);
        assert_eq!(response.tool_calls[0].parameters["page"], json!("analytics"));
        assert_eq!(response.tool_calls[0].status, ToolStatus::Pending);
        assert!(response.needs_permission);
    }

    #[test]
    fn test_battery_question_is_deterministic() {
        let backend = backend();
        let first = backend.route(&request("What's the battery situation?", false));
        let second = backend.route(&request("What's the battery situation?", false));
        assert_eq!(first, second);
        assert!(first.response.contains("Average fleet battery"));
    }

    #[test]
    fn test_list_errors_adds_filter() {
        let response = backend().route(&request("show me robots with errors", true));
        assert!(response.response.contains("error state"));
        let filter = response
            .tool_calls
            .iter()
            .find(|c| c.name == ToolKind::FilterRobots)
            .unwrap();
        assert_eq!(filter.parameters["status"], json!("error"));
    }

    #[test]
    fn test_deep_research_lists_sources() {
        let mut req = request("kpi update", false);
        req.deep_research = true;
        let response = backend().route(&req);
        assert!(response.response.contains("Sources checked"));
        assert!(response.response.contains("Orders served"));
    }
}
