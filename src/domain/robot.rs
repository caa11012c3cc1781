// Robot domain model
use super::facility::Facility;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotModel {
    #[serde(rename = "Servi Plus")]
    ServiPlus,
    #[serde(rename = "Carti 100")]
    Carti100,
    #[serde(rename = "Carti 600")]
    Carti600,
}

pub const MODELS: [RobotModel; 3] = [RobotModel::ServiPlus, RobotModel::Carti100, RobotModel::Carti600];

impl RobotModel {
    pub fn label(self) -> &'static str {
        match self {
            RobotModel::ServiPlus => "Servi Plus",
            RobotModel::Carti100 => "Carti 100",
            RobotModel::Carti600 => "Carti 600",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            RobotModel::ServiPlus => "Servi",
            RobotModel::Carti100 => "Carti100",
            RobotModel::Carti600 => "Carti600",
        }
    }

    /// Two-letter code used in serial numbers.
    pub fn code(self) -> &'static str {
        match self {
            RobotModel::ServiPlus => "SP",
            RobotModel::Carti100 => "C1",
            RobotModel::Carti600 => "C6",
        }
    }

    /// Service verticals this model is sold into.
    pub fn verticals(self) -> &'static [Vertical] {
        match self {
            RobotModel::ServiPlus => &[Vertical::Restaurant, Vertical::Healthcare],
            RobotModel::Carti100 => &[Vertical::StaffAid, Vertical::Warehousing, Vertical::Healthcare],
            RobotModel::Carti600 => &[Vertical::Warehousing, Vertical::StaffAid],
        }
    }

    pub fn specs(self) -> RobotSpecs {
        match self {
            RobotModel::ServiPlus => RobotSpecs {
                payload_kg: 40.0,
                max_speed_mps: 1.2,
                runtime_hours: 12.0,
                dimensions_cm: "50 x 54 x 130",
                weight_kg: 42.0,
            },
            RobotModel::Carti100 => RobotSpecs {
                payload_kg: 100.0,
                max_speed_mps: 1.0,
                runtime_hours: 10.0,
                dimensions_cm: "55 x 68 x 115",
                weight_kg: 55.0,
            },
            RobotModel::Carti600 => RobotSpecs {
                payload_kg: 600.0,
                max_speed_mps: 1.5,
                runtime_hours: 8.0,
                dimensions_cm: "85 x 120 x 105",
                weight_kg: 160.0,
            },
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        MODELS
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(value) || m.short_name().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vertical {
    Restaurant,
    Healthcare,
    #[serde(rename = "Staff Aid")]
    StaffAid,
    Warehousing,
}

impl Vertical {
    pub fn label(self) -> &'static str {
        match self {
            Vertical::Restaurant => "Restaurant",
            Vertical::Healthcare => "Healthcare",
            Vertical::StaffAid => "Staff Aid",
            Vertical::Warehousing => "Warehousing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Active,
    Idle,
    Charging,
    Maintenance,
    Offline,
    Error,
}

impl RobotStatus {
    /// Selection weights out of 100, in draw order.
    pub const WEIGHTED: [(RobotStatus, u32); 6] = [
        (RobotStatus::Active, 40),
        (RobotStatus::Idle, 30),
        (RobotStatus::Charging, 15),
        (RobotStatus::Maintenance, 8),
        (RobotStatus::Offline, 5),
        (RobotStatus::Error, 2),
    ];

    pub fn total_weight() -> u32 {
        Self::WEIGHTED.iter().map(|(_, w)| w).sum()
    }

    /// Maps a draw in `0..total_weight()` onto the cumulative weight table.
    pub fn from_weighted_draw(draw: u32) -> Self {
        let mut cumulative = 0;
        for (status, weight) in Self::WEIGHTED {
            cumulative += weight;
            if draw < cumulative {
                return status;
            }
        }
        RobotStatus::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RobotStatus::Active => "active",
            RobotStatus::Idle => "idle",
            RobotStatus::Charging => "charging",
            RobotStatus::Maintenance => "maintenance",
            RobotStatus::Offline => "offline",
            RobotStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::WEIGHTED
            .into_iter()
            .map(|(s, _)| s)
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSpecs {
    pub payload_kg: f64,
    pub max_speed_mps: f64,
    pub runtime_hours: f64,
    pub dimensions_cm: &'static str,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotMetrics {
    pub avg_trip_time_secs: f64,
    pub success_rate: f64,
    pub distance_km: f64,
    pub orders_served: u32,
    pub avg_speed_mps: f64,
    pub obstacles_avoided: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTask {
    pub kind: String,
    pub destination: String,
    pub progress: u8,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotFault {
    pub code: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    pub id: String,
    pub name: String,
    pub model: RobotModel,
    pub vertical: Vertical,
    pub status: RobotStatus,
    pub facility: Facility,
    pub battery: u8,
    pub uptime: f64,
    pub total_trips: u32,
    pub last_seen: DateTime<Utc>,
    pub firmware_version: String,
    pub serial_number: String,
    pub zone: Option<String>,
    pub current_task: Option<CurrentTask>,
    pub errors: Vec<RobotFault>,
    pub specs: RobotSpecs,
    pub metrics: RobotMetrics,
}

impl Robot {
    pub fn needs_attention(&self) -> bool {
        matches!(self.status, RobotStatus::Error | RobotStatus::Maintenance) || self.battery < 20
    }
}

/// Operator actions that the dashboard can simulate on a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotAction {
    Restart,
    Recalibrate,
    ClearErrors,
    ReturnToDock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_100() {
        assert_eq!(RobotStatus::total_weight(), 100);
    }

    #[test]
    fn test_weighted_draw_boundaries() {
        assert_eq!(RobotStatus::from_weighted_draw(0), RobotStatus::Active);
        assert_eq!(RobotStatus::from_weighted_draw(39), RobotStatus::Active);
        assert_eq!(RobotStatus::from_weighted_draw(40), RobotStatus::Idle);
        assert_eq!(RobotStatus::from_weighted_draw(42), RobotStatus::Idle);
        assert_eq!(RobotStatus::from_weighted_draw(70), RobotStatus::Charging);
        assert_eq!(RobotStatus::from_weighted_draw(85), RobotStatus::Maintenance);
        assert_eq!(RobotStatus::from_weighted_draw(93), RobotStatus::Offline);
        assert_eq!(RobotStatus::from_weighted_draw(98), RobotStatus::Error);
        assert_eq!(RobotStatus::from_weighted_draw(99), RobotStatus::Error);
    }

    #[test]
    fn test_parse_model_and_status() {
        assert_eq!(RobotModel::parse("servi plus"), Some(RobotModel::ServiPlus));
        assert_eq!(RobotModel::parse("Carti600"), Some(RobotModel::Carti600));
        assert_eq!(RobotModel::parse("Rover"), None);
        assert_eq!(RobotStatus::parse("CHARGING"), Some(RobotStatus::Charging));
        assert_eq!(RobotStatus::parse("sleeping"), None);
    }

    #[test]
    fn test_model_serializes_with_display_name() {
        let json = serde_json::to_string(&RobotModel::Carti100).unwrap();
        assert_eq!(json, "\"Carti 100\"");
        let json = serde_json::to_string(&Vertical::StaffAid).unwrap();
        assert_eq!(json, "\"Staff Aid\"");
    }
}
