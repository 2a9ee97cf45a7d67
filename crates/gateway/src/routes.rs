//! HTTP routes: the notify webhook plus status and liveness probes.

use std::sync::Arc;

use {
    axum::{
        Json, Router,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
    },
    serde::{Deserialize, Serialize},
};

use fanpost_common::DeliveryOutcome;

use crate::intake::{NotificationIntake, RawNotification};

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<NotificationIntake>,
}

/// Inbound webhook body. Field names match the producing service's wire
/// format.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub s3_url: Option<String>,
    pub text: Option<String>,
}

#[derive(Serialize)]
struct NotifyResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct StatusResponse {
    subscribers: usize,
    last_delivery: Option<DeliverySummary>,
}

#[derive(Serialize)]
struct DeliverySummary {
    delivered: usize,
    failed: usize,
    outcomes: Vec<DeliveryOutcome>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/notify", post(notify_handler))
        .route("/status", get(status_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}

/// Accept a notification. Returns as soon as fan-out is scheduled; delivery
/// results never surface here — the caller has already been acknowledged.
async fn notify_handler(
    State(state): State<AppState>,
    Json(body): Json<NotifyRequest>,
) -> impl IntoResponse {
    let raw = RawNotification {
        asset_url: body.s3_url,
        caption: body.text,
    };
    match state.intake.handle(raw).await {
        Ok(()) => (
            StatusCode::OK,
            Json(NotifyResponse {
                message: "Notification received",
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let subscribers = state.intake.manager().len().await;
    let last_delivery = state
        .intake
        .last_report()
        .await
        .map(|report| DeliverySummary {
            delivered: report.delivered(),
            failed: report.failed(),
            outcomes: report.outcomes,
        });
    Json(StatusResponse {
        subscribers,
        last_delivery,
    })
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use {
        async_trait::async_trait,
        axum::{
            body::Body,
            http::{Request, header},
        },
        bytes::Bytes,
        fanpost_delivery::{AssetFetcher, ChannelSink, DeliveryEngine, SinkError},
        fanpost_registry::SubscriptionManager,
        tower::ServiceExt,
    };

    use super::*;

    struct OkFetcher;

    #[async_trait]
    impl AssetFetcher for OkFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Bytes> {
            Ok(Bytes::from_static(b"img"))
        }
    }

    struct OkSink;

    #[async_trait]
    impl ChannelSink for OkSink {
        async fn post(&self, _to: &str, _caption: &str, _image: Bytes) -> Result<(), SinkError> {
            Ok(())
        }
    }

    async fn test_app(dir: &tempfile::TempDir) -> (Router, Arc<NotificationIntake>) {
        let manager = Arc::new(SubscriptionManager::load(
            dir.path().join("subscriptions.json"),
        ));
        manager.subscribe("123", "general").await.unwrap();
        let engine = Arc::new(DeliveryEngine::new(
            Arc::new(OkFetcher),
            Arc::new(OkSink),
            8,
            Duration::from_secs(5),
        ));
        let intake = NotificationIntake::new(manager, engine);
        let app = build_router(AppState {
            intake: Arc::clone(&intake),
        });
        (app, intake)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn notify_acknowledges_valid_payload() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _intake) = test_app(&dir).await;

        let response = app
            .oneshot(post_json(
                "/notify",
                r#"{"s3_url": "https://assets.example/a.png", "text": "hi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Notification received");
    }

    #[tokio::test]
    async fn notify_rejects_missing_asset_url() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _intake) = test_app(&dir).await;

        let response = app
            .oneshot(post_json("/notify", r#"{"text": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("s3_url"));
    }

    #[tokio::test]
    async fn notify_accepts_missing_text() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _intake) = test_app(&dir).await;

        let response = app
            .oneshot(post_json(
                "/notify",
                r#"{"s3_url": "https://assets.example/a.png"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn status_reports_subscriber_count_before_any_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _intake) = test_app(&dir).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["subscribers"], 1);
        assert!(json["last_delivery"].is_null());
    }

    #[tokio::test]
    async fn healthz_is_alive() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _intake) = test_app(&dir).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
