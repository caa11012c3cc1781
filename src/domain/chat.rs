// Chat assistant domain model
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub auto_navigate: bool,
    #[serde(default)]
    pub deep_research: bool,
    #[serde(default)]
    pub is_minimized: bool,
}

impl ChatRequest {
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Every action the assistant can ask the dashboard to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    NavigateToPage,
    ShowRobotDetails,
    FilterRobots,
    RestartRobot,
    ScheduleMaintenance,
    GenerateReport,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::NavigateToPage,
        ToolKind::ShowRobotDetails,
        ToolKind::FilterRobots,
        ToolKind::RestartRobot,
        ToolKind::ScheduleMaintenance,
        ToolKind::GenerateReport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::NavigateToPage => "navigate_to_page",
            ToolKind::ShowRobotDetails => "show_robot_details",
            ToolKind::FilterRobots => "filter_robots",
            ToolKind::RestartRobot => "restart_robot",
            ToolKind::ScheduleMaintenance => "schedule_maintenance",
            ToolKind::GenerateReport => "generate_report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::NavigateToPage => "Open a dashboard page such as fleet, analytics or training",
            ToolKind::ShowRobotDetails => "Open the detail view for one robot by id",
            ToolKind::FilterRobots => "Filter the fleet table by status, facility or model",
            ToolKind::RestartRobot => "Restart a robot remotely",
            ToolKind::ScheduleMaintenance => "Book a maintenance window for a robot",
            ToolKind::GenerateReport => "Build an operations report for a time range",
        }
    }

    /// Actions that change robot state always wait for the operator.
    pub fn requires_permission(self) -> bool {
        match self {
            ToolKind::RestartRobot | ToolKind::ScheduleMaintenance => true,
            ToolKind::NavigateToPage
            | ToolKind::ShowRobotDetails
            | ToolKind::FilterRobots
            | ToolKind::GenerateReport => false,
        }
    }

    pub fn is_navigation(self) -> bool {
        match self {
            ToolKind::NavigateToPage | ToolKind::ShowRobotDetails | ToolKind::FilterRobots => true,
            ToolKind::RestartRobot | ToolKind::ScheduleMaintenance | ToolKind::GenerateReport => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Executed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCall {
    pub id: String,
    pub name: ToolKind,
    pub parameters: Value,
    pub status: ToolStatus,
}

impl ToolCall {
    pub fn new(id: String, kind: ToolKind, parameters: Value, auto_navigate: bool) -> Self {
        let status = if kind.requires_permission() {
            ToolStatus::Pending
        } else if kind.is_navigation() && !auto_navigate {
            ToolStatus::Pending
        } else {
            ToolStatus::Executed
        };

        Self {
            id,
            name: kind,
            parameters,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub needs_permission: bool,
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl ChatResponse {
    pub fn new(response: String, tool_calls: Vec<ToolCall>) -> Self {
        let needs_permission = tool_calls.iter().any(|c| c.status == ToolStatus::Pending);
        Self {
            response,
            needs_permission,
            tool_calls,
            error: None,
        }
    }

    pub fn failure(response: String) -> Self {
        Self {
            response,
            needs_permission: false,
            tool_calls: Vec::new(),
            error: Some(true),
        }
    }
}
