use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthReadyResponse};

/// `GET /health`
///
/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /health/ready`
///
/// Readiness probe that checks database connectivity.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    let readiness = HealthReadyResponse {
        ready: database,
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    if database {
        (StatusCode::OK, Json(ApiResponse::success(readiness))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: Some(readiness),
                ..ApiResponse::error("Database unavailable")
            }),
        )
            .into_response()
    }
}
