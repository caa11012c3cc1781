// Live simulator - Unseeded samples that imitate a real-time feed
use crate::application::seeded::round_to;
use crate::domain::facility::FACILITIES;
use crate::domain::live::{ApiMetrics, LiveMetrics, TrainingUpdate};
use crate::domain::operations::{OpsDataPoint, SHIFTS, Shift};
use crate::domain::robot::MODELS;
use chrono::{Timelike, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

const TRAINING_MODELS: [&str; 3] = ["NavNet v4", "ObstacleSeg v2", "ShiftDemand v1"];

pub fn generate_live_data_point() -> OpsDataPoint {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let facility = FACILITIES.choose(&mut rng).copied().unwrap_or(FACILITIES[0]);
    let model = MODELS.choose(&mut rng).copied().unwrap_or(MODELS[0]);
    let vertical = model.verticals().choose(&mut rng).copied().unwrap_or(model.verticals()[0]);

    OpsDataPoint {
        id: format!("live-{}", Uuid::new_v4()),
        facility: facility.name.to_string(),
        city: facility.city.to_string(),
        region: facility.region.to_string(),
        vertical,
        robot_model: model,
        shift: shift_for_hour(now.hour()),
        orders_served: rng.gen_range(40..=420),
        avg_turnaround_mins: round_to(rng.gen_range(3.5..9.0), 1),
        uptime_pct: round_to(rng.gen_range(93.0..99.9), 1),
        nps_score: round_to(rng.gen_range(38.0..72.0), 1),
        incident_count: rng.gen_range(0..=3),
        energy_kwh: round_to(rng.gen_range(18.0..42.0), 1),
        staffing_delta: round_to(rng.gen_range(-2.5..6.0), 1),
        timestamp: now,
    }
}

pub fn shift_for_hour(hour: u32) -> Shift {
    match hour {
        5..=10 => SHIFTS[0],
        11..=15 => SHIFTS[1],
        16..=21 => SHIFTS[2],
        _ => SHIFTS[3],
    }
}

pub fn generate_live_metrics() -> LiveMetrics {
    let mut rng = rand::thread_rng();
    LiveMetrics {
        active_robots: rng.gen_range(32..=48),
        throughput_per_hour: rng.gen_range(850..=1_450),
        avg_latency_ms: round_to(rng.gen_range(38.0..120.0), 1),
        gpu_utilization: round_to(rng.gen_range(55.0..95.0), 1),
        fleet_battery_avg: round_to(rng.gen_range(58.0..84.0), 1),
        orders_in_flight: rng.gen_range(12..=64),
        timestamp: Utc::now(),
    }
}

pub fn generate_training_update() -> TrainingUpdate {
    let mut rng = rand::thread_rng();
    let total_epochs = 40;
    let epoch = rng.gen_range(1..=total_epochs);
    let progress = f64::from(epoch) / f64::from(total_epochs);

    TrainingUpdate {
        model_name: TRAINING_MODELS.choose(&mut rng).copied().unwrap_or(TRAINING_MODELS[0]).to_string(),
        epoch,
        total_epochs,
        loss: round_to(1.8 * (1.0 - progress) + rng.gen_range(0.02..0.15), 4),
        accuracy: round_to((0.62 + 0.34 * progress + rng.gen_range(-0.01..0.01)).min(0.99), 4),
        gpu_utilization: round_to(rng.gen_range(78.0..99.0), 1),
        eta_minutes: (total_epochs - epoch) * rng.gen_range(3..=6),
        timestamp: Utc::now(),
    }
}

pub fn generate_api_metrics() -> ApiMetrics {
    let mut rng = rand::thread_rng();
    let p50 = rng.gen_range(18.0..45.0);
    let p95 = p50 * rng.gen_range(2.0..3.5);
    let p99 = p95 * rng.gen_range(1.2..1.8);

    ApiMetrics {
        requests_per_minute: rng.gen_range(1_200..=4_800),
        p50_latency_ms: round_to(p50, 1),
        p95_latency_ms: round_to(p95, 1),
        p99_latency_ms: round_to(p99, 1),
        error_rate_pct: round_to(rng.gen_range(0.05..1.2), 2),
        active_connections: rng.gen_range(80..=420),
        timestamp: Utc::now(),
    }
}

/// Cancels a running data stream; stopping twice is harmless and dropping stops it too.
#[derive(Debug)]
pub struct StreamHandle {
    abort: AbortHandle,
    stopped: AtomicBool,
}

impl StreamHandle {
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.abort.abort();
            tracing::debug!("live data stream stopped");
        }
    }

    #[cfg(test)]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Calls `callback` with a fresh live point every `interval`, first call after one interval.
///
/// Must be called from within a tokio runtime.
pub fn start_data_stream<F>(mut callback: F, interval: Duration) -> StreamHandle
where
    F: FnMut(OpsDataPoint) + Send + 'static,
{
    let period = interval.max(Duration::from_millis(1));
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick resolves immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            callback(generate_live_data_point());
        }
    });

    tracing::debug!(interval_ms = period.as_millis() as u64, "live data stream started");
    StreamHandle {
        abort: task.abort_handle(),
        stopped: AtomicBool::new(false),
    }
}
