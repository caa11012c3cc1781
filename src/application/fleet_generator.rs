// Fleet generator - Deterministic robot entities from an index
use crate::application::seeded::{ROBOT_DOMAIN, SeededDraws, round_to};
use crate::domain::facility::FACILITIES;
use crate::domain::robot::{
    CurrentTask, MODELS, Robot, RobotFault, RobotMetrics, RobotStatus, Vertical,
};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Number of distinct 6-character base-36 tokens.
pub const ID_SPACE: u64 = 36u64.pow(6);

// Coprime with 36, so `index -> index * M + O (mod 36^6)` is a bijection.
const ID_MULTIPLIER: u64 = 1_000_003;
const ID_OFFSET: u64 = 733_421_905;
const ID_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const ZONES: [&str; 8] = [
    "Dining Room A",
    "Dining Room B",
    "Patio",
    "Kitchen Pass",
    "Ward 3 East",
    "Loading Dock",
    "Aisle 12",
    "Staff Corridor",
];

const DESTINATIONS: [&str; 8] = [
    "Table 14",
    "Table 7",
    "Nurse Station 2",
    "Room 318",
    "Dock Door 4",
    "Packing Bay",
    "Dish Return",
    "Supply Closet",
];

/// Fault strings attached to robots in the error state, keyed by index.
pub const FAULT_CATALOG: [(&str, &str); 8] = [
    ("E-101", "LiDAR sensor obstruction detected"),
    ("E-204", "Drive motor overcurrent on left wheel"),
    ("E-219", "Localization confidence below threshold"),
    ("E-305", "Tray weight sensor out of calibration"),
    ("E-412", "Battery cell temperature above limit"),
    ("E-508", "Lost connection to facility Wi-Fi"),
    ("E-611", "Emergency stop engaged"),
    ("E-720", "Bumper contact stuck closed"),
];

#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("fleet size must be at least 1")]
    EmptyFleet,

    #[error("fleet size {requested} exceeds the {available} available robot ids")]
    IdSpaceExhausted { requested: usize, available: u64 },

    #[error("operations lookback must cover at least one week")]
    EmptyLookback,
}

#[derive(Debug, Clone)]
pub struct FleetGenerator {
    seed: u64,
    anchor: DateTime<Utc>,
}

impl FleetGenerator {
    /// `anchor` is the instant that relative timestamps such as `last_seen` hang off.
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self { seed, anchor }
    }

    pub fn build_fleet(&self, size: usize) -> Result<Vec<Robot>, GeneratorError> {
        if size == 0 {
            return Err(GeneratorError::EmptyFleet);
        }
        if size as u64 > ID_SPACE {
            return Err(GeneratorError::IdSpaceExhausted {
                requested: size,
                available: ID_SPACE,
            });
        }

        Ok((0..size).map(|index| self.generate_robot(index)).collect())
    }

    pub fn generate_robot(&self, index: usize) -> Robot {
        let mut draws = SeededDraws::new(self.seed, ROBOT_DOMAIN, index as u64);

        let model = MODELS[index % MODELS.len()];
        let verticals = model.verticals();
        let vertical = verticals[(index / MODELS.len()) % verticals.len()];
        let facility = FACILITIES[index % FACILITIES.len()];
        let id = robot_id(index);

        let status = RobotStatus::from_weighted_draw(draws.below(RobotStatus::total_weight()));

        let battery_pct = match status {
            RobotStatus::Charging => draws.int_in(60, 100),
            RobotStatus::Offline => draws.int_in(5, 40),
            _ => draws.int_in(20, 100),
        };
        let battery = battery_pct as u8;

        let uptime = round_to(draws.float_in(88.0, 99.9), 1);
        let total_trips = draws.int_in(120, 9_800);

        let last_seen_minutes = match status {
            RobotStatus::Offline => draws.int_in(60, 72 * 60),
            _ => draws.int_in(0, 5),
        };
        let last_seen = self.anchor - Duration::minutes(i64::from(last_seen_minutes));

        let firmware_version = format!(
            "v{}.{}.{}",
            draws.int_in(2, 3),
            draws.int_in(0, 9),
            draws.int_in(0, 20)
        );
        let serial_number = format!("BR-{}-{:06}", model.code(), index + 1);

        let zone = draws.chance(0.8).then(|| draws.pick(&ZONES).to_string());

        let current_task = (status == RobotStatus::Active).then(|| CurrentTask {
            kind: task_kind(vertical).to_string(),
            destination: draws.pick(&DESTINATIONS).to_string(),
            progress: draws.int_in(5, 95) as u8,
            started_at: self.anchor - Duration::minutes(i64::from(draws.int_in(1, 25))),
        });

        let errors = if status == RobotStatus::Error {
            let (code, message) = FAULT_CATALOG[index % FAULT_CATALOG.len()];
            vec![RobotFault {
                code: code.to_string(),
                message: message.to_string(),
                occurred_at: self.anchor - Duration::minutes(i64::from(draws.int_in(5, 180))),
            }]
        } else {
            Vec::new()
        };

        let specs = model.specs();
        let metrics = RobotMetrics {
            avg_trip_time_secs: round_to(draws.float_in(45.0, 240.0), 1),
            success_rate: round_to(draws.float_in(92.0, 99.8), 1),
            distance_km: round_to(draws.float_in(150.0, 4_200.0), 1),
            orders_served: total_trips * draws.int_in(1, 3),
            avg_speed_mps: round_to(specs.max_speed_mps * draws.float_in(0.55, 0.85), 2),
            obstacles_avoided: draws.int_in(200, 6_000),
        };

        Robot {
            name: format!("{}-{}", model.short_name(), id),
            id,
            model,
            vertical,
            status,
            facility,
            battery,
            uptime,
            total_trips,
            last_seen,
            firmware_version,
            serial_number,
            zone,
            current_task,
            errors,
            specs,
            metrics,
        }
    }
}

/// Six-character uppercase alphanumeric id, unique for every index below `ID_SPACE`.
pub fn robot_id(index: usize) -> String {
    let mut n = (index as u64 % ID_SPACE)
        .wrapping_mul(ID_MULTIPLIER)
        .wrapping_add(ID_OFFSET)
        % ID_SPACE;

    let mut token = [b'0'; 6];
    for slot in token.iter_mut().rev() {
        *slot = ID_ALPHABET[(n % 36) as usize];
        n /= 36;
    }
    token.iter().map(|&b| char::from(b)).collect()
}

fn task_kind(vertical: Vertical) -> &'static str {
    match vertical {
        Vertical::Restaurant => "Food delivery",
        Vertical::Healthcare => "Medication run",
        Vertical::StaffAid => "Supply restock",
        Vertical::Warehousing => "Pallet transfer",
    }
}
