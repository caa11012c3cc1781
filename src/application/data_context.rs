// Data context - The generated fleet and operations dataset, built once at startup
use crate::application::fleet_generator::{FleetGenerator, GeneratorError};
use crate::application::operations_generator::OperationsGenerator;
use crate::domain::operations::OpsDataPoint;
use crate::domain::robot::Robot;
use crate::infrastructure::config::DataSettings;
use chrono::{DateTime, Utc};

/// Immutable snapshot shared by every service through an `Arc`.
#[derive(Debug)]
pub struct DataContext {
    seed: u64,
    generated_at: DateTime<Utc>,
    robots: Vec<Robot>,
    operations: Vec<OpsDataPoint>,
}

impl DataContext {
    pub fn initialize(settings: &DataSettings, generated_at: DateTime<Utc>) -> Result<Self, GeneratorError> {
        let robots = FleetGenerator::new(settings.seed, generated_at).build_fleet(settings.fleet_size)?;
        let operations =
            OperationsGenerator::new(settings.seed, generated_at).build_operations(settings.weeks)?;

        tracing::info!(
            seed = settings.seed,
            robots = robots.len(),
            operations = operations.len(),
            generated_at = %generated_at,
            "data context initialized"
        );

        Ok(Self {
            seed: settings.seed,
            generated_at,
            robots,
            operations,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn operations(&self) -> &[OpsDataPoint] {
        &self.operations
    }

    pub fn find_robot(&self, id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    pub fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    pub fn context() -> Arc<DataContext> {
        Arc::new(DataContext::initialize(&DataSettings::default(), anchor()).unwrap())
    }
}
