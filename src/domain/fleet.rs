// Fleet rollup domain models
use super::robot::RobotStatus;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: RobotStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub avg_battery: f64,
    pub avg_uptime: f64,
    pub needs_attention: usize,
    pub total_trips: u64,
}

impl FleetSummary {
    pub fn count(&self, status: RobotStatus) -> usize {
        self.by_status
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRollup {
    pub facility_id: String,
    pub facility: String,
    pub city: String,
    pub region: String,
    pub robot_count: usize,
    pub active_count: usize,
    pub error_count: usize,
    pub avg_battery: f64,
    pub avg_uptime: f64,
    pub model_mix: BTreeMap<String, usize>,
}
