//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use chrono::Utc;

use crate::{blocking, read_json, AppError, AppState};
use spendwise_core::models::{Budget, BudgetRequest};
use spendwise_core::BudgetStore;

/// GET /api/budgets/:user_id - Active budget per type
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = blocking(&state, move |db| db.active_budgets(user_id)).await?;
    Ok(Json(budgets))
}

/// GET /api/budgets/:user_id/history - Every budget ever set, newest first
pub async fn budget_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let history = blocking(&state, move |db| db.budget_history(user_id)).await?;
    Ok(Json(history))
}

/// POST /api/budgets/:user_id - Set a budget (appends; the newest is active)
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let req: BudgetRequest = read_json(request).await?;
    let budget = req.validate()?;

    let created = blocking(&state, move |db| db.set_budget(user_id, &budget, Utc::now())).await?;
    Ok(Json(created))
}
