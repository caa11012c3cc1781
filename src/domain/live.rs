// Live telemetry snapshot models
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetrics {
    pub active_robots: u32,
    pub throughput_per_hour: u32,
    pub avg_latency_ms: f64,
    pub gpu_utilization: f64,
    pub fleet_battery_avg: f64,
    pub orders_in_flight: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingUpdate {
    pub model_name: String,
    pub epoch: u32,
    pub total_epochs: u32,
    pub loss: f64,
    pub accuracy: f64,
    pub gpu_utilization: f64,
    pub eta_minutes: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    pub requests_per_minute: u32,
    pub p50_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub error_rate_pct: f64,
    pub active_connections: u32,
    pub timestamp: DateTime<Utc>,
}
