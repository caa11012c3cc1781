// Curation service - Aggregates the operations dataset into dashboard view models
use crate::application::catalog;
use crate::application::data_context::DataContext;
use crate::application::seeded::round_to;
use crate::domain::curation::{
    AlertInsight, CurationResponsePayload, HeatmapCell, KpiCard, Severity, TrendPoint,
};
use crate::domain::operations::{OpsDataPoint, Shift};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const KPI_WINDOW_DAYS: i64 = 14;
pub const ALERT_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_TREND_WEEKS: usize = 12;
const MAX_ALERTS: usize = 5;
const ALERT_OWNERS: [&str; 2] = ["Field Operations", "Reliability Engineering"];

#[derive(Clone)]
pub struct CurationService {
    context: Arc<DataContext>,
}

impl CurationService {
    pub fn new(context: Arc<DataContext>) -> Self {
        Self { context }
    }

    pub fn curation(&self) -> CurationResponsePayload {
        compose_curation_response(self.context.operations(), Utc::now())
    }

    pub fn trend(&self, weeks: usize) -> Vec<TrendPoint> {
        build_trend_series(self.context.operations(), weeks)
    }
}

pub fn compose_curation_response(points: &[OpsDataPoint], now: DateTime<Utc>) -> CurationResponsePayload {
    CurationResponsePayload {
        generated_at: now,
        kpis: curate_kpis(points, now),
        trend: build_trend_series(points, DEFAULT_TREND_WEEKS),
        heatmap: build_heatmap(points),
        alerts: build_alerts(points, now),
        knowledge: catalog::knowledge_base(),
        financials: catalog::financial_snapshot(),
        api_surfaces: catalog::api_surfaces(),
        training_plans: catalog::training_plans(),
    }
}

/// Sums and averages for one window of samples.
#[derive(Debug, Default, Clone, Copy)]
struct WindowTotals {
    samples: usize,
    orders: f64,
    incidents: f64,
    uptime_sum: f64,
    nps_sum: f64,
}

impl WindowTotals {
    fn collect<'a>(points: impl Iterator<Item = &'a OpsDataPoint>) -> Self {
        points.fold(Self::default(), |mut acc, p| {
            acc.samples += 1;
            acc.orders += f64::from(p.orders_served);
            acc.incidents += f64::from(p.incident_count);
            acc.uptime_sum += p.uptime_pct;
            acc.nps_sum += p.nps_score;
            acc
        })
    }

    fn avg_uptime(&self) -> f64 {
        ratio(self.uptime_sum, self.samples as f64)
    }

    fn avg_nps(&self) -> f64 {
        ratio(self.nps_sum, self.samples as f64)
    }

    fn incidents_per_thousand(&self) -> f64 {
        ratio(self.incidents * 1000.0, self.orders)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

/// Percentage change from `prior` to `recent`; zero when there is no prior value.
pub fn percent_change(recent: f64, prior: f64) -> f64 {
    if prior == 0.0 || !prior.is_finite() {
        0.0
    } else {
        (recent - prior) / prior * 100.0
    }
}

fn in_window(point: &OpsDataPoint, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    point.timestamp > start && point.timestamp <= end
}

pub fn curate_kpis(points: &[OpsDataPoint], now: DateTime<Utc>) -> Vec<KpiCard> {
    let window = Duration::days(KPI_WINDOW_DAYS);
    let recent_start = now - window;
    let prior_start = recent_start - window;

    let recent = WindowTotals::collect(points.iter().filter(|p| in_window(p, recent_start, now)));
    let prior = WindowTotals::collect(points.iter().filter(|p| in_window(p, prior_start, recent_start)));

    vec![
        KpiCard::new(
            "orders",
            "Orders served",
            group_thousands(recent.orders.round() as u64),
            recent.orders,
            percent_change(recent.orders, prior.orders),
            "Last 14 days across all facilities",
        ),
        KpiCard::new(
            "uptime",
            "Fleet uptime",
            format!("{:.1}%", recent.avg_uptime()),
            round_to(recent.avg_uptime(), 2),
            percent_change(recent.avg_uptime(), prior.avg_uptime()),
            "Average shift uptime",
        ),
        KpiCard::new(
            "nps",
            "Guest NPS",
            format!("{:.1}", recent.avg_nps()),
            round_to(recent.avg_nps(), 2),
            percent_change(recent.avg_nps(), prior.avg_nps()),
            "Average post-visit survey score",
        ),
        KpiCard::new(
            "incidents",
            "Incidents per 1k orders",
            format!("{:.2}", recent.incidents_per_thousand()),
            round_to(recent.incidents_per_thousand(), 3),
            percent_change(recent.incidents_per_thousand(), prior.incidents_per_thousand()),
            "Lower is better",
        ),
    ]
}

#[derive(Default)]
struct WeekBucket {
    week_start: Option<NaiveDate>,
    samples: usize,
    orders: u64,
    incidents: u64,
    uptime_sum: f64,
    nps_sum: f64,
    turnaround_sum: f64,
    energy_sum: f64,
}

/// Weekly totals for the most recent `weeks` ISO weeks, oldest first.
pub fn build_trend_series(points: &[OpsDataPoint], weeks: usize) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(i32, u32), WeekBucket> = BTreeMap::new();

    for point in points {
        let iso = point.timestamp.iso_week();
        let bucket = buckets.entry((iso.year(), iso.week())).or_default();
        bucket.week_start.get_or_insert_with(|| {
            NaiveDate::from_isoywd_opt(iso.year(), iso.week(), Weekday::Mon)
                .unwrap_or_else(|| point.timestamp.date_naive())
        });
        bucket.samples += 1;
        bucket.orders += u64::from(point.orders_served);
        bucket.incidents += u64::from(point.incident_count);
        bucket.uptime_sum += point.uptime_pct;
        bucket.nps_sum += point.nps_score;
        bucket.turnaround_sum += point.avg_turnaround_mins;
        bucket.energy_sum += point.energy_kwh;
    }

    let skip = buckets.len().saturating_sub(weeks);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, week), bucket)| {
            let samples = bucket.samples as f64;
            TrendPoint {
                week: format!("{}-W{:02}", year, week),
                week_start: bucket.week_start.unwrap_or_default(),
                orders: bucket.orders,
                incidents: bucket.incidents,
                avg_uptime: round_to(ratio(bucket.uptime_sum, samples), 2),
                avg_nps: round_to(ratio(bucket.nps_sum, samples), 2),
                avg_turnaround_mins: round_to(ratio(bucket.turnaround_sum, samples), 2),
                energy_kwh: round_to(bucket.energy_sum, 1),
            }
        })
        .collect()
}

/// Demand per (facility, shift), normalized against the bucket's own peak.
pub fn build_heatmap(points: &[OpsDataPoint]) -> Vec<HeatmapCell> {
    let mut buckets: BTreeMap<(&str, Shift), Vec<&OpsDataPoint>> = BTreeMap::new();
    for point in points {
        buckets
            .entry((point.facility.as_str(), point.shift))
            .or_default()
            .push(point);
    }

    buckets
        .into_iter()
        .map(|((facility, shift), samples)| {
            let count = samples.len() as f64;
            let orders: Vec<f64> = samples.iter().map(|p| f64::from(p.orders_served)).collect();
            let avg_orders = ratio(orders.iter().sum(), count);
            let peak = orders.iter().copied().fold(0.0, f64::max);
            let uptime = ratio(samples.iter().map(|p| p.uptime_pct).sum(), count);

            HeatmapCell {
                facility: facility.to_string(),
                shift,
                demand_score: round_to(ratio(avg_orders, peak), 3),
                utilization: round_to(uptime, 1),
                samples: samples.len(),
            }
        })
        .collect()
}

/// Incident and uptime alerts from the last week; never empty.
pub fn build_alerts(points: &[OpsDataPoint], now: DateTime<Utc>) -> Vec<AlertInsight> {
    let window_start = now - Duration::days(ALERT_WINDOW_DAYS);

    let alerts: Vec<AlertInsight> = points
        .iter()
        .filter(|p| in_window(p, window_start, now))
        .filter(|p| p.incident_count >= 3 || p.uptime_pct < 95.0)
        .take(MAX_ALERTS)
        .enumerate()
        .map(|(index, point)| alert_for(index, point))
        .collect();

    if alerts.is_empty() {
        return vec![stable_alert(now)];
    }
    alerts
}

fn alert_for(index: usize, point: &OpsDataPoint) -> AlertInsight {
    let severity = if point.incident_count >= 4 {
        Severity::Critical
    } else {
        Severity::High
    };

    let (title, detail, recommended_action) = if point.incident_count >= 3 {
        (
            format!("{} incidents during {} at {}", point.incident_count, point.shift.label(), point.facility),
            format!(
                "{} units logged {} incidents across {} orders in {}.",
                point.robot_model.label(),
                point.incident_count,
                point.orders_served,
                point.city
            ),
            "Review incident logs and schedule a floor walk with the site lead".to_string(),
        )
    } else {
        (
            format!("Uptime dipped to {:.1}% at {}", point.uptime_pct, point.facility),
            format!(
                "{} shift uptime fell below the 95% target for {} units in {}.",
                point.shift.label(),
                point.robot_model.label(),
                point.city
            ),
            "Check charging rotation and recent fault codes for the affected units".to_string(),
        )
    };

    AlertInsight {
        id: format!("alert-{}", point.id),
        title,
        detail,
        severity,
        facility: Some(point.facility.clone()),
        owner: ALERT_OWNERS[index % ALERT_OWNERS.len()].to_string(),
        recommended_action,
        timestamp: point.timestamp,
    }
}

fn stable_alert(now: DateTime<Utc>) -> AlertInsight {
    AlertInsight {
        id: "alert-stable".to_string(),
        title: "Fleet operating within thresholds".to_string(),
        detail: "No shift in the last 7 days exceeded the incident or uptime limits.".to_string(),
        severity: Severity::Low,
        facility: None,
        owner: "Fleet Operations".to_string(),
        recommended_action: "No action needed".to_string(),
        timestamp: now,
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
