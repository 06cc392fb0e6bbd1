//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{blocking, AppError, AppState};
use spendwise_core::dashboard::{self, Dashboard};
use spendwise_core::{BudgetStore, ExpenseStore};

/// GET /api/dashboard/:user_id - Today/week/month totals, categories, budgets
///
/// Expenses and budgets are fetched concurrently; either failing fails the
/// response.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Dashboard>, AppError> {
    let ctx = state.context(user_id);
    let (start, end) = dashboard::fetch_range(&ctx);

    let (expenses, budgets) = tokio::try_join!(
        blocking(&state, move |db| db.expenses_between(user_id, start, end)),
        blocking(&state, move |db| db.budget_history(user_id)),
    )?;

    Ok(Json(dashboard::compose(&ctx, &expenses, &budgets)))
}
