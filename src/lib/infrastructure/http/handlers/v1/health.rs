//! Health check handler

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::comms::{dialer::Dialer, mailer::Mailer},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// The health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,

    /// Service name
    #[schema(example = "notification-relay")]
    pub service: String,

    /// Service version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Seconds since the server started
    #[schema(example = 123)]
    pub uptime: i64,
}

/// Get the health of the application
#[utoipa::path(
    get,
    operation_id = "health",
    tag = "System",
    path = "/api/v1/health",
    responses(
        (status = StatusCode::OK, description = "Health response", body = HealthResponse),
    )
)]
pub async fn handler<M: Mailer, D: Dialer>(
    State(state): State<AppState<M, D>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let uptime = Utc::now().timestamp() - state.start_time.timestamp();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
    }))
}
