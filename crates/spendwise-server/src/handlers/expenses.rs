//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{blocking, read_json, AppError, AppState, SuccessResponse};
use spendwise_core::models::{parse_date, Category, Expense, ExpenseFilter, ExpenseRequest};
use spendwise_core::ExpenseStore;

/// Query parameters for listing expenses
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    /// Only this category
    pub category: Option<String>,
    /// Inclusive local start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Inclusive local end date (YYYY-MM-DD)
    pub to: Option<String>,
}

impl ExpenseQuery {
    fn into_filter(self) -> Result<ExpenseFilter, AppError> {
        let category = match self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(c) => Some(
                c.parse::<Category>()
                    .map_err(|e| AppError::validation("category", &e))?,
            ),
            None => None,
        };
        let from = self
            .from
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_date("from", s))
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_date("to", s))
            .transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::validation("from", "must not be after 'to'"));
            }
        }

        Ok(ExpenseFilter { category, from, to })
    }
}

/// GET /api/expenses/:user_id - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let filter = params.into_filter()?;
    let tz = state.config.engine.timezone;

    let expenses = blocking(&state, move |db| db.list_expenses(user_id, &filter, tz)).await?;

    Ok(Json(expenses))
}

/// POST /api/expenses/:user_id - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let req: ExpenseRequest = read_json(request).await?;
    let expense = req.validate(Utc::now(), state.config.engine.timezone)?;

    let created = blocking(&state, move |db| db.add_expense(user_id, &expense)).await?;

    tracing::info!(
        user_id,
        id = created.id,
        category = %created.category,
        "Expense created"
    );
    Ok(Json(created))
}

/// DELETE /api/expenses/:user_id/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, AppError> {
    blocking(&state, move |db| db.delete_expense(user_id, id)).await?;

    tracing::info!(user_id, id, "Expense deleted");
    Ok(Json(SuccessResponse { success: true }))
}
