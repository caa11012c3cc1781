// Operations generator - Back-dated shift samples for the analytics views
use crate::application::fleet_generator::GeneratorError;
use crate::application::seeded::{OPERATIONS_DOMAIN, SeededDraws, round_to};
use crate::domain::facility::FACILITIES;
use crate::domain::operations::{OpsDataPoint, SHIFTS, Shift};
use crate::domain::robot::MODELS;
use chrono::{DateTime, Duration, Utc};

pub const SAMPLES_PER_WEEK: usize = 24;

const MINUTES_PER_WEEK: u32 = 7 * 24 * 60;

#[derive(Debug, Clone)]
pub struct OperationsGenerator {
    seed: u64,
    anchor: DateTime<Utc>,
}

impl OperationsGenerator {
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self { seed, anchor }
    }

    /// Builds `weeks * SAMPLES_PER_WEEK` points, oldest week first.
    pub fn build_operations(&self, weeks: usize) -> Result<Vec<OpsDataPoint>, GeneratorError> {
        if weeks == 0 {
            return Err(GeneratorError::EmptyLookback);
        }

        Ok((0..weeks * SAMPLES_PER_WEEK)
            .map(|index| self.generate_point(index, weeks))
            .collect())
    }

    pub fn generate_point(&self, index: usize, weeks: usize) -> OpsDataPoint {
        let mut draws = SeededDraws::new(self.seed, OPERATIONS_DOMAIN, index as u64);

        let shift = SHIFTS[index % SHIFTS.len()];
        let facility = FACILITIES[(index / SHIFTS.len()) % FACILITIES.len()];
        let week = index / SAMPLES_PER_WEEK;

        let model = *draws.pick(&MODELS);
        let verticals = model.verticals();
        let vertical = verticals[draws.below(verticals.len() as u32) as usize];

        // Later weeks trend slightly upward so the trend chart has a slope.
        let growth = 1.0 + week as f64 * 0.012;
        let orders = shift_base_orders(shift) * growth * draws.float_in(0.8, 1.2);

        let incident_count = match draws.below(100) {
            0..=54 => 0,
            55..=79 => 1,
            80..=91 => 2,
            92..=96 => 3,
            _ => draws.int_in(4, 5),
        };

        let weeks_back = weeks.saturating_sub(week + 1) as i64;
        let offset_minutes = draws.below(MINUTES_PER_WEEK);
        let timestamp =
            self.anchor - Duration::weeks(weeks_back) - Duration::minutes(i64::from(offset_minutes));

        OpsDataPoint {
            id: format!("ops-{:04}", index + 1),
            facility: facility.name.to_string(),
            city: facility.city.to_string(),
            region: facility.region.to_string(),
            vertical,
            robot_model: model,
            shift,
            orders_served: orders.round() as u32,
            avg_turnaround_mins: round_to(draws.float_in(3.5, 9.0), 1),
            uptime_pct: round_to(draws.float_in(93.0, 99.9), 1),
            nps_score: round_to(draws.float_in(38.0, 72.0), 1),
            incident_count,
            energy_kwh: round_to(draws.float_in(18.0, 42.0), 1),
            staffing_delta: round_to(draws.float_in(-2.5, 6.0), 1),
            timestamp,
        }
    }
}

fn shift_base_orders(shift: Shift) -> f64 {
    match shift {
        Shift::Breakfast => 180.0,
        Shift::Lunch => 320.0,
        Shift::Dinner => 360.0,
        Shift::LateNight => 90.0,
    }
}
