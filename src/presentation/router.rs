// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chat, client_state, curation, facilities, fleet_summary, get_robot, health_check, list_robots,
    live_api_metrics, live_datapoint, live_metrics, live_stream, live_training, robot_action, trend,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Compression is handled in the response builders, so no CompressionLayer here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/curation", get(curation))
        .route("/api/trend", get(trend))
        .route("/api/robots", get(list_robots))
        .route("/api/robots/:id", get(get_robot))
        .route("/api/robots/:id/actions", post(robot_action))
        .route("/api/fleet/summary", get(fleet_summary))
        .route("/api/facilities", get(facilities))
        .route("/api/live/datapoint", get(live_datapoint))
        .route("/api/live/metrics", get(live_metrics))
        .route("/api/live/training", get(live_training))
        .route("/api/live/api-metrics", get(live_api_metrics))
        .route("/api/live/stream", get(live_stream))
        .route("/api/chat", post(chat))
        .route("/api/client-state/:key", post(client_state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat_service::ChatService;
    use crate::application::curation_service::CurationService;
    use crate::application::data_context::test_support;
    use crate::application::fleet_service::FleetService;
    use crate::application::keyword_chat::KeywordChatBackend;
    use crate::application::streaming_service::LiveFeedService;
    use crate::infrastructure::config::LiveSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let context = test_support::context();
        let state = Arc::new(AppState {
            curation_service: CurationService::new(context.clone()),
            fleet_service: FleetService::new(context.clone()),
            chat_service: ChatService::new(Arc::new(KeywordChatBackend::new(context.clone())), context),
            live_feed: LiveFeedService::new(LiveSettings::default()),
        });
        build_router(state)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_curation_payload_shape() {
        let (status, body) = get_json("/api/curation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"].as_array().unwrap().len(), 4);
        assert!(body["generatedAt"].is_string());
        assert!(!body["alerts"].as_array().unwrap().is_empty());
        assert!(!body["heatmap"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trend_weeks_validated() {
        let (status, body) = get_json("/api/trend?weeks=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);

        let (status, body) = get_json("/api/trend?weeks=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = get_json("/api/trend?weeks=53").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_robot_filter_and_lookup() {
        let (status, body) = get_json("/api/robots?status=error").await;
        assert_eq!(status, StatusCode::OK);
        let robots = body.as_array().unwrap();
        assert!(robots.iter().all(|r| r["status"] == "error"));

        let (_, all) = get_json("/api/robots").await;
        let id = all[0]["id"].as_str().unwrap().to_string();
        let (status, robot) = get_json(&format!("/api/robots/{}", id.to_lowercase())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(robot["id"], json!(id));

        let (status, _) = get_json("/api/robots/NOPE00").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json("/api/robots?status=sleeping").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_robot_action_returns_updated_copy() {
        let (_, all) = get_json("/api/robots").await;
        let id = all[0]["id"].as_str().unwrap().to_string();

        let (status, robot) = post_json(&format!("/api/robots/{}/actions", id), r#"{"action":"clear_errors"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(robot["errors"], json!([]));

        let (status, _) = post_json(&format!("/api/robots/{}/actions", id), r#"{"action":"explode"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fleet_summary_and_facilities() {
        let (_, summary) = get_json("/api/fleet/summary").await;
        assert_eq!(summary["total"], json!(101));

        let (_, facilities) = get_json("/api/facilities").await;
        let total: u64 = facilities
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["robotCount"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 101);
    }

    #[tokio::test]
    async fn test_live_snapshots() {
        let (status, point) = get_json("/api/live/datapoint").await;
        assert_eq!(status, StatusCode::OK);
        assert!(point["id"].as_str().unwrap().starts_with("live-"));

        for uri in ["/api/live/metrics", "/api/live/training", "/api/live/api-metrics"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body.is_object());
        }
    }

    #[tokio::test]
    async fn test_live_stream_rejects_bad_interval() {
        let (status, body) = get_json("/api/live/stream?interval_ms=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = get_json("/api/live/stream?interval_ms=-5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let (status, body) = post_json(
            "/api/chat",
            r#"{"messages":[{"role":"user","content":"open analytics"}],"autoNavigate":true}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["toolCalls"][0]["name"], json!("navigate_to_page"));
        assert_eq!(body["toolCalls"][0]["status"], json!("executed"));
        assert_eq!(body["needsPermission"], json!(false));

        let (status, _) = post_json("/api/chat", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_client_state_migration() {
        let (status, body) = post_json("/api/client-state/bear-auto-navigate", "true").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"version": 1, "data": true}));

        let (status, body) = post_json("/api/client-state/bear-training-progress", "{{{").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"version": 1, "data": []}));

        let (status, _) = post_json("/api/client-state/unknown-key", "true").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_brotli_negotiated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/fleet/summary")
                    .header(header::ACCEPT_ENCODING, "gzip, br")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }
}
