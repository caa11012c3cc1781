// Operations data domain models
use super::robot::{RobotModel, Vertical};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Shift {
    Breakfast,
    Lunch,
    Dinner,
    #[serde(rename = "Late Night")]
    LateNight,
}

pub const SHIFTS: [Shift; 4] = [Shift::Breakfast, Shift::Lunch, Shift::Dinner, Shift::LateNight];

impl Shift {
    pub fn label(self) -> &'static str {
        match self {
            Shift::Breakfast => "Breakfast",
            Shift::Lunch => "Lunch",
            Shift::Dinner => "Dinner",
            Shift::LateNight => "Late Night",
        }
    }
}

/// One shift-level operational sample for a facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsDataPoint {
    pub id: String,
    pub facility: String,
    pub city: String,
    pub region: String,
    pub vertical: Vertical,
    pub robot_model: RobotModel,
    pub shift: Shift,
    pub orders_served: u32,
    pub avg_turnaround_mins: f64,
    pub uptime_pct: f64,
    pub nps_score: f64,
    pub incident_count: u32,
    pub energy_kwh: f64,
    pub staffing_delta: f64,
    pub timestamp: DateTime<Utc>,
}
