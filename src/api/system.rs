use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthDto};

pub async fn get_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthDto>>) {
    let database_ok = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let health = HealthDto {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database: if database_ok { "ok" } else { "unreachable" }.to_string(),
    };

    (status, Json(ApiResponse::success(health)))
}
