//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{blocking, AppError, AppState};
use spendwise_core::{BudgetStore, ExpenseStore, Insights};

/// GET /api/insights/:user_id - Top category, week comparison, forecast and budgets
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Insights>, AppError> {
    let ctx = state.context(user_id);
    let (start, end) = state.insights.fetch_range(&ctx);

    // Independent reads; any failure fails the request
    let (expenses, budgets, first_expense_at) = tokio::try_join!(
        blocking(&state, move |db| db.expenses_between(user_id, start, end)),
        blocking(&state, move |db| db.budget_history(user_id)),
        blocking(&state, move |db| db.first_expense_at(user_id)),
    )?;

    Ok(Json(
        state
            .insights
            .compute(&ctx, &expenses, &budgets, first_expense_at),
    ))
}
