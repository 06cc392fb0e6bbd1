//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{blocking, AppError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /api/health - Liveness plus a database round trip (no auth)
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, AppError> {
    blocking(&state, |db| db.health_check()).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        service: "spendwise",
    }))
}
