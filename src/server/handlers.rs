use crate::{
    core::{health, ingest::Outcome, storage::SaveContext},
    server::AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

/// `POST /webhook` - decode and store one notification.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let metrics = &state.metrics;
    metrics.webhooks_received_total.inc();

    let ctx = SaveContext::with_timeout(state.request_timeout);
    match state.ingest.handle(&ctx, &body).await {
        Outcome::Accepted(summary) => {
            metrics.record_received(&summary);
            metrics.record_saved(&summary);
            StatusCode::OK.into_response()
        }
        Outcome::Rejected(e) => {
            metrics.invalid_webhooks_total.inc();
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Outcome::StoreFailed(summary, e) => {
            metrics.record_received(&summary);
            metrics.record_failed(&summary);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to save alerts: {e}"),
            )
                .into_response()
        }
    }
}

/// `GET /-/health` - the store answers a ping.
pub async fn health(State(state): State<AppState>) -> Response {
    match health::liveness(state.ingest.store().as_ref()).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("failed to ping database server: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("failed to ping database server: {e}"),
            )
                .into_response()
        }
    }
}

/// `GET /-/ready` - the store is reachable and its model is supported.
pub async fn ready(State(state): State<AppState>) -> Response {
    match health::readiness(state.ingest.store().as_ref()).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            let message = if e.is_model_error() {
                format!("invalid model: {e}")
            } else {
                format!("database is not reachable: {e}")
            };
            error!("{}", message);
            (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
        }
    }
}

/// `GET /metrics` - Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(text) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            error!("failed to render metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::{
        core::{
            ingest::IngestHandler, null_store::NullStore, sql_store::SqlStore, storage::Storer,
        },
        entities::{Alert, AlertGroup},
        errors::Result,
        metrics::Metrics,
        server::{AppState, router},
        test_utils::*,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;

    fn state_over(store: &Arc<SqlStore>) -> AppState {
        AppState::new(
            IngestHandler::new(store.clone(), false),
            Arc::new(Metrics::new().unwrap()),
            Duration::from_secs(5),
        )
    }

    async fn call(state: &AppState, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_webhook_stores_valid_payload() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);

        let (status, _) =
            call(&state, Method::POST, "/webhook", Body::from(sample_payload())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(AlertGroup::find().count(store.connection()).await?, 1);
        assert_eq!(Alert::find().count(store.connection()).await?, 2);

        let metrics = &state.metrics;
        assert_eq!(metrics.webhooks_received_total.get(), 1);
        assert_eq!(metrics.invalid_webhooks_total.get(), 0);
        assert_eq!(
            metrics
                .alerts_saved_total
                .with_label_values(&["ops", "firing"])
                .get(),
            2
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_webhook_rejects_unsupported_version() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);
        let payload = sample_payload().replace(r#""version": "4""#, r#""version": "3""#);

        let (status, body) = call(&state, Method::POST, "/webhook", Body::from(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid payload: webhook version 3 is not supported");
        assert_eq!(state.metrics.invalid_webhooks_total.get(), 1);
        assert_eq!(AlertGroup::find().count(store.connection()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_webhook_rejects_malformed_json() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);

        let (status, body) = call(&state, Method::POST, "/webhook", Body::from("{")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Invalid payload: "));
        Ok(())
    }

    #[tokio::test]
    async fn test_webhook_reports_store_failure() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        store
            .connection()
            .execute_unprepared("DROP TABLE AlertAnnotation")
            .await?;
        let state = state_over(&store);

        let payload = serde_json::to_string(&labelled_group("ops", 2))?;
        let (status, body) = call(&state, Method::POST, "/webhook", Body::from(payload)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("failed to save alerts: failed to insert into AlertAnnotation"));
        assert_eq!(
            state
                .metrics
                .alerts_saving_failures_total
                .with_label_values(&["ops", "firing"])
                .get(),
            2
        );
        assert_eq!(AlertGroup::find().count(store.connection()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_webhook_only_accepts_post() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);

        let (status, _) = call(&state, Method::GET, "/webhook", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }

    #[tokio::test]
    async fn test_probes_follow_store_state() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);

        let (status, _) = call(&state, Method::GET, "/-/health", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&state, Method::GET, "/-/ready", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);

        store
            .connection()
            .execute_unprepared("UPDATE Model SET version = '9.9.9'")
            .await?;
        let (status, _) = call(&state, Method::GET, "/-/health", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&state, Method::GET, "/-/ready", Body::empty()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.starts_with("invalid model: "), "{body}");

        store.close().await?;
        let (status, body) = call(&state, Method::GET, "/-/health", Body::empty()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.starts_with("failed to ping database server: "), "{body}");
        let (status, body) = call(&state, Method::GET, "/-/ready", Body::empty()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.starts_with("database is not reachable: "), "{body}");
        Ok(())
    }

    #[tokio::test]
    async fn test_null_backend_accepts_everything() {
        let state = AppState::new(
            IngestHandler::new(Arc::new(NullStore), false),
            Arc::new(Metrics::new().unwrap()),
            Duration::from_secs(5),
        );

        let (status, _) =
            call(&state, Method::POST, "/webhook", Body::from(sample_payload())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&state, Method::GET, "/-/ready", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_exposes_counters() -> Result<()> {
        let store = Arc::new(setup_test_store().await?);
        let state = state_over(&store);
        call(&state, Method::POST, "/webhook", Body::from(sample_payload())).await;

        let (status, body) = call(&state, Method::GET, "/metrics", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("alert_ledger_webhooks_received_total 1"));
        assert!(body.contains("alert_ledger_database_up"));
        Ok(())
    }
}
