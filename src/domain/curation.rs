// Curation view models - projections over the operations dataset
use super::operations::Shift;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Deltas within this band (in percent) are reported as steady.
pub const MOMENTUM_THRESHOLD_PCT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Up,
    Down,
    Steady,
}

impl Momentum {
    pub fn from_delta(delta_pct: f64) -> Self {
        if delta_pct > MOMENTUM_THRESHOLD_PCT {
            Momentum::Up
        } else if delta_pct < -MOMENTUM_THRESHOLD_PCT {
            Momentum::Down
        } else {
            Momentum::Steady
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub id: String,
    pub label: String,
    pub value: String,
    pub raw_value: f64,
    pub delta: String,
    pub delta_pct: f64,
    pub momentum: Momentum,
    pub helper: String,
}

impl KpiCard {
    pub fn new(id: &str, label: &str, value: String, raw_value: f64, delta_pct: f64, helper: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value,
            raw_value,
            delta: format_delta(delta_pct),
            delta_pct,
            momentum: Momentum::from_delta(delta_pct),
            helper: helper.to_string(),
        }
    }
}

/// Renders a percentage delta as `+4.2% vs prev` / `-0.8% vs prev`.
pub fn format_delta(delta_pct: f64) -> String {
    // Sign follows the displayed value so tiny negatives don't print as -0.0
    let rounded = (delta_pct * 10.0).round() / 10.0;
    let sign = if rounded < 0.0 { "-" } else { "+" };
    format!("{}{:.1}% vs prev", sign, rounded.abs())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub week: String,
    pub week_start: NaiveDate,
    pub orders: u64,
    pub incidents: u64,
    pub avg_uptime: f64,
    pub avg_nps: f64,
    pub avg_turnaround_mins: f64,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub facility: String,
    pub shift: Shift,
    pub demand_score: f64,
    pub utilization: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertInsight {
    pub id: String,
    pub title: String,
    pub detail: String,
    pub severity: Severity,
    pub facility: Option<String>,
    pub owner: String,
    pub recommended_action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeArticle {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub updated: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub period: String,
    pub revenue_usd: f64,
    pub operating_cost_usd: f64,
    pub labor_savings_usd: f64,
    pub cost_per_order_usd: f64,
    pub roi_pct: f64,
    pub payback_months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSurface {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: &'static str,
    pub model_name: &'static str,
    pub objective: &'static str,
    pub dataset: &'static str,
    pub epochs: u32,
    pub target_accuracy: f64,
    pub status: &'static str,
    pub owner: &'static str,
}

/// Everything the dashboard needs in one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationResponsePayload {
    pub generated_at: DateTime<Utc>,
    pub kpis: Vec<KpiCard>,
    pub trend: Vec<TrendPoint>,
    pub heatmap: Vec<HeatmapCell>,
    pub alerts: Vec<AlertInsight>,
    pub knowledge: Vec<KnowledgeArticle>,
    pub financials: FinancialSnapshot,
    pub api_surfaces: Vec<ApiSurface>,
    pub training_plans: Vec<TrainingPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_thresholds() {
        assert_eq!(Momentum::from_delta(1.6), Momentum::Up);
        assert_eq!(Momentum::from_delta(1.5), Momentum::Steady);
        assert_eq!(Momentum::from_delta(0.0), Momentum::Steady);
        assert_eq!(Momentum::from_delta(-1.5), Momentum::Steady);
        assert_eq!(Momentum::from_delta(-1.51), Momentum::Down);
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(0.0), "+0.0% vs prev");
        assert_eq!(format_delta(4.26), "+4.3% vs prev");
        assert_eq!(format_delta(-0.84), "-0.8% vs prev");
    }

    #[test]
    fn test_format_delta_small_negative_has_no_minus_zero() {
        assert_eq!(format_delta(-0.04), "+0.0% vs prev");
        assert_eq!(format_delta(-0.0), "+0.0% vs prev");
        assert_eq!(format_delta(-0.06), "-0.1% vs prev");
    }
}
