// Fleet service - Robot lookups, rollups and simulated operator actions
use crate::application::data_context::DataContext;
use crate::application::seeded::round_to;
use crate::domain::facility::FACILITIES;
use crate::domain::fleet::{FacilityRollup, FleetSummary, StatusCount};
use crate::domain::robot::{Robot, RobotAction, RobotModel, RobotStatus};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotFilter {
    pub status: Option<RobotStatus>,
    pub facility: Option<String>,
    pub model: Option<RobotModel>,
}

impl RobotFilter {
    pub fn matches(&self, robot: &Robot) -> bool {
        self.status.is_none_or(|s| robot.status == s)
            && self.model.is_none_or(|m| robot.model == m)
            && self.facility.as_deref().is_none_or(|f| {
                robot.facility.id.eq_ignore_ascii_case(f)
                    || robot.facility.name.eq_ignore_ascii_case(f)
                    || robot.facility.city.eq_ignore_ascii_case(f)
            })
    }
}

#[derive(Clone)]
pub struct FleetService {
    context: Arc<DataContext>,
}

impl FleetService {
    pub fn new(context: Arc<DataContext>) -> Self {
        Self { context }
    }

    pub fn list(&self, filter: &RobotFilter) -> Vec<Robot> {
        filter_robots(self.context.robots(), filter)
    }

    pub fn get(&self, id: &str) -> Option<Robot> {
        self.context.find_robot(id).cloned()
    }

    pub fn summary(&self) -> FleetSummary {
        summarize_fleet(self.context.robots())
    }

    pub fn facilities(&self) -> Vec<FacilityRollup> {
        facility_rollups(self.context.robots())
    }

    /// Returns the robot as it would look after `action`; the shared fleet is not touched.
    pub fn apply_action(&self, id: &str, action: RobotAction) -> Option<Robot> {
        let robot = self.context.find_robot(id)?;
        let updated = simulate_action(robot, action, Utc::now());
        tracing::info!(
            robot = %robot.id,
            action = ?action,
            before = robot.status.as_str(),
            after = updated.status.as_str(),
            "simulated robot action"
        );
        Some(updated)
    }
}

pub fn filter_robots(robots: &[Robot], filter: &RobotFilter) -> Vec<Robot> {
    robots.iter().filter(|r| filter.matches(r)).cloned().collect()
}

pub fn summarize_fleet(robots: &[Robot]) -> FleetSummary {
    let total = robots.len();
    let by_status = RobotStatus::WEIGHTED
        .iter()
        .map(|&(status, _)| StatusCount {
            status,
            count: robots.iter().filter(|r| r.status == status).count(),
        })
        .collect();

    FleetSummary {
        total,
        by_status,
        avg_battery: average(robots.iter().map(|r| f64::from(r.battery))),
        avg_uptime: average(robots.iter().map(|r| r.uptime)),
        needs_attention: robots.iter().filter(|r| r.needs_attention()).count(),
        total_trips: robots.iter().map(|r| u64::from(r.total_trips)).sum(),
    }
}

/// One rollup per facility with robots, in facility table order.
pub fn facility_rollups(robots: &[Robot]) -> Vec<FacilityRollup> {
    FACILITIES
        .iter()
        .filter_map(|facility| {
            let assigned: Vec<&Robot> = robots.iter().filter(|r| r.facility.id == facility.id).collect();
            if assigned.is_empty() {
                return None;
            }

            let mut model_mix = BTreeMap::new();
            for robot in &assigned {
                *model_mix.entry(robot.model.label().to_string()).or_insert(0) += 1;
            }

            Some(FacilityRollup {
                facility_id: facility.id.to_string(),
                facility: facility.name.to_string(),
                city: facility.city.to_string(),
                region: facility.region.to_string(),
                robot_count: assigned.len(),
                active_count: assigned.iter().filter(|r| r.status == RobotStatus::Active).count(),
                error_count: assigned.iter().filter(|r| r.status == RobotStatus::Error).count(),
                avg_battery: average(assigned.iter().map(|r| f64::from(r.battery))),
                avg_uptime: average(assigned.iter().map(|r| r.uptime)),
                model_mix,
            })
        })
        .collect()
}

pub fn simulate_action(robot: &Robot, action: RobotAction, now: DateTime<Utc>) -> Robot {
    let mut updated = robot.clone();
    updated.last_seen = now;

    match action {
        RobotAction::Restart => {
            updated.status = RobotStatus::Idle;
            updated.current_task = None;
            updated.errors.clear();
        }
        RobotAction::Recalibrate => {
            updated.status = RobotStatus::Idle;
            updated.current_task = None;
            updated.errors.clear();
            updated.metrics.success_rate = (updated.metrics.success_rate + 1.5).min(99.9);
        }
        RobotAction::ClearErrors => {
            updated.errors.clear();
            if updated.status == RobotStatus::Error {
                updated.status = RobotStatus::Idle;
            }
        }
        RobotAction::ReturnToDock => {
            updated.status = RobotStatus::Charging;
            updated.current_task = None;
            updated.errors.clear();
        }
    }

    updated
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::data_context::test_support;

    fn robot_with(status: RobotStatus) -> Robot {
        let context = test_support::context();
        context
            .robots()
            .iter()
            .find(|r| r.status == status)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_summary_counts_every_robot() {
        let context = test_support::context();
        let summary = summarize_fleet(context.robots());
        let counted: usize = summary.by_status.iter().map(|c| c.count).sum();
        assert_eq!(summary.total, 101);
        assert_eq!(counted, 101);
        assert!(summary.avg_battery > 0.0 && summary.avg_battery <= 100.0);
    }

    #[test]
    fn test_summary_of_empty_fleet() {
        let summary = summarize_fleet(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_battery, 0.0);
        assert_eq!(summary.count(RobotStatus::Active), 0);
    }

    #[test]
    fn test_facility_rollups_cover_all_facilities() {
        let context = test_support::context();
        let rollups = facility_rollups(context.robots());
        assert_eq!(rollups.len(), FACILITIES.len());
        assert_eq!(rollups.iter().map(|r| r.robot_count).sum::<usize>(), 101);
        for rollup in &rollups {
            let mix: usize = rollup.model_mix.values().sum();
            assert_eq!(mix, rollup.robot_count);
        }
    }

    #[test]
    fn test_filter_by_status_and_facility() {
        let context = test_support::context();
        let filter = RobotFilter {
            status: Some(RobotStatus::Active),
            facility: Some("Austin".to_string()),
            model: None,
        };
        let robots = filter_robots(context.robots(), &filter);
        assert!(robots.iter().all(|r| r.status == RobotStatus::Active && r.facility.city == "Austin"));

        let all = filter_robots(context.robots(), &RobotFilter::default());
        assert_eq!(all.len(), 101);
    }

    #[test]
    fn test_action_returns_copy() {
        let context = test_support::context();
        let service = FleetService::new(context.clone());
        let original = context.robots().iter().find(|r| r.status == RobotStatus::Active).unwrap();

        let updated = service.apply_action(&original.id, RobotAction::ReturnToDock).unwrap();
        assert_eq!(updated.status, RobotStatus::Charging);
        assert!(updated.current_task.is_none());

        let untouched = context.find_robot(&original.id).unwrap();
        assert_eq!(untouched.status, RobotStatus::Active);
        assert!(untouched.current_task.is_some());
    }

    #[test]
    fn test_restart_clears_task_and_errors() {
        let active = robot_with(RobotStatus::Active);
        let restarted = simulate_action(&active, RobotAction::Restart, test_support::anchor());
        assert_eq!(restarted.status, RobotStatus::Idle);
        assert!(restarted.current_task.is_none());
        assert!(restarted.errors.is_empty());
    }

    #[test]
    fn test_clear_errors_keeps_non_error_status() {
        let charging = robot_with(RobotStatus::Charging);
        let cleared = simulate_action(&charging, RobotAction::ClearErrors, test_support::anchor());
        assert_eq!(cleared.status, RobotStatus::Charging);
    }

    #[test]
    fn test_recalibrate_caps_success_rate() {
        let mut robot = robot_with(RobotStatus::Idle);
        robot.metrics.success_rate = 99.5;
        let recalibrated = simulate_action(&robot, RobotAction::Recalibrate, test_support::anchor());
        assert_eq!(recalibrated.metrics.success_rate, 99.9);
    }

    #[test]
    fn test_every_action_on_error_robot_keeps_status_consistent() {
        let faulted = robot_with(RobotStatus::Error);
        assert!(!faulted.errors.is_empty());

        for action in [
            RobotAction::Restart,
            RobotAction::Recalibrate,
            RobotAction::ClearErrors,
            RobotAction::ReturnToDock,
        ] {
            let updated = simulate_action(&faulted, action, test_support::anchor());
            assert_eq!(
                !updated.errors.is_empty(),
                updated.status == RobotStatus::Error,
                "{:?}",
                action
            );
            assert_eq!(
                updated.current_task.is_some(),
                updated.status == RobotStatus::Active,
                "{:?}",
                action
            );
        }
    }

    #[test]
    fn test_unknown_robot_action() {
        let service = FleetService::new(test_support::context());
        assert!(service.apply_action("NOPE00", RobotAction::Restart).is_none());
    }
}
