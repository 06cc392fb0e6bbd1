//! Bill handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};

use crate::{blocking, read_json, AppError, AppState, SuccessResponse};
use spendwise_core::bills::{self, BillView};
use spendwise_core::models::BillRequest;
use spendwise_core::BillStore;

/// GET /api/bills/:user_id - Bills with derived status, soonest due first
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BillView>>, AppError> {
    let today = state.context(user_id).today();
    let bills = blocking(&state, move |db| db.list_bills(user_id)).await?;

    Ok(Json(bills::views(bills, today)))
}

/// POST /api/bills/:user_id - Schedule a bill
pub async fn create_bill(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<BillView>, AppError> {
    let req: BillRequest = read_json(request).await?;
    let bill = req.validate()?;
    let today = state.context(user_id).today();

    let created = blocking(&state, move |db| db.add_bill(user_id, &bill)).await?;
    Ok(Json(BillView::new(created, today)))
}

/// POST /api/bills/:user_id/:id/pay - Mark a bill paid
pub async fn pay_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<Json<BillView>, AppError> {
    let ctx = state.context(user_id);
    let paid = blocking(&state, move |db| db.mark_bill_paid(user_id, id, ctx.now)).await?;

    Ok(Json(BillView::new(paid, ctx.today())))
}

/// DELETE /api/bills/:user_id/:id - Delete a bill
pub async fn delete_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, AppError> {
    blocking(&state, move |db| db.delete_bill(user_id, id)).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/bills/:user_id/reminders - Unpaid bills inside their reminder window
pub async fn bill_reminders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BillView>>, AppError> {
    let today = state.context(user_id).today();
    let bills = blocking(&state, move |db| db.list_bills(user_id)).await?;

    Ok(Json(bills::reminders(bills, today)))
}
