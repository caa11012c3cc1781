// HTTP request handlers
use crate::application::client_state_service::decode_client_state;
use crate::application::curation_service::DEFAULT_TREND_WEEKS;
use crate::application::fleet_service::RobotFilter;
use crate::application::live_simulator::{
    generate_api_metrics, generate_live_data_point, generate_live_metrics, generate_training_update,
};
use crate::domain::chat::ChatRequest;
use crate::domain::client_state::ClientStateKey;
use crate::domain::robot::{RobotAction, RobotModel, RobotStatus};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::ndjson_stream::ndjson_stream;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_TREND_WEEKS: i64 = 52;

type ApiResult = Result<Response<Body>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct RobotQuery {
    pub status: Option<String>,
    pub facility: Option<String>,
    pub model: Option<String>,
}

impl RobotQuery {
    fn into_filter(self) -> Result<RobotFilter, ApiError> {
        let status = self
            .status
            .map(|s| RobotStatus::parse(&s).ok_or_else(|| ApiError::BadRequest(format!("unknown status '{}'", s))))
            .transpose()?;
        let model = self
            .model
            .map(|m| RobotModel::parse(&m).ok_or_else(|| ApiError::BadRequest(format!("unknown model '{}'", m))))
            .transpose()?;

        Ok(RobotFilter {
            status,
            facility: self.facility.filter(|f| !f.is_empty()),
            model,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub weeks: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: RobotAction,
}

async fn reply<T: Serialize>(headers: &HeaderMap, data: &T) -> ApiResult {
    Ok(json_response(data, accepts_brotli(headers)).await?)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn curation(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    reply(&headers, &state.curation_service.curation()).await
}

pub async fn trend(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> ApiResult {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let weeks = query.weeks.unwrap_or(DEFAULT_TREND_WEEKS as i64);
    if !(1..=MAX_TREND_WEEKS).contains(&weeks) {
        return Err(ApiError::BadRequest(format!(
            "weeks must be between 1 and {}",
            MAX_TREND_WEEKS
        )));
    }

    reply(&headers, &state.curation_service.trend(weeks as usize)).await
}

pub async fn list_robots(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    query: Result<Query<RobotQuery>, QueryRejection>,
) -> ApiResult {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = query.into_filter()?;
    reply(&headers, &state.fleet_service.list(&filter)).await
}

pub async fn get_robot(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let robot = state
        .fleet_service
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("robot {} not found", id)))?;
    reply(&headers, &robot).await
}

pub async fn robot_action(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let robot = state
        .fleet_service
        .apply_action(&id, request.action)
        .ok_or_else(|| ApiError::NotFound(format!("robot {} not found", id)))?;
    reply(&headers, &robot).await
}

pub async fn fleet_summary(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    reply(&headers, &state.fleet_service.summary()).await
}

pub async fn facilities(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    reply(&headers, &state.fleet_service.facilities()).await
}

pub async fn live_datapoint(headers: HeaderMap) -> ApiResult {
    reply(&headers, &generate_live_data_point()).await
}

pub async fn live_metrics(headers: HeaderMap) -> ApiResult {
    reply(&headers, &generate_live_metrics()).await
}

pub async fn live_training(headers: HeaderMap) -> ApiResult {
    reply(&headers, &generate_training_update()).await
}

pub async fn live_api_metrics(headers: HeaderMap) -> ApiResult {
    reply(&headers, &generate_api_metrics()).await
}

/// Chunked feed of live samples until the client disconnects
pub async fn live_stream(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    query: Result<Query<StreamQuery>, QueryRejection>,
) -> ApiResult {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let interval = state.live_feed.interval(query.interval_ms);
    tracing::info!(interval_ms = interval.as_millis() as u64, "opening live stream");

    let feed = state.live_feed.live_feed(interval);
    Ok(ndjson_stream(feed, accepts_brotli(&headers))?)
}

pub async fn chat(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let response = state.chat_service.respond(request).await;
    reply(&headers, &response).await
}

/// Upgrades a raw browser storage blob to the current envelope version.
pub async fn client_state(Path(key): Path<String>, headers: HeaderMap, raw: String) -> ApiResult {
    let key = ClientStateKey::parse(&key)
        .ok_or_else(|| ApiError::NotFound(format!("unknown client state key '{}'", key)))?;
    reply(&headers, &decode_client_state(key, &raw)).await
}
