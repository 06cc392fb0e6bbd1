//! Budget tracker: active budget selection and consumption state

use std::collections::BTreeMap;
use std::convert::Infallible;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{aggregate, Aggregate};
use crate::context::UserContext;
use crate::models::{Budget, BudgetType, Expense};
use crate::money;
use crate::window::Window;

/// Whether spending has gone past the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionState {
    Within,
    Exceeded,
}

/// Consumption of one active budget in its current window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget_type: BudgetType,
    #[serde(with = "money")]
    pub budget_amount: Decimal,
    #[serde(with = "money")]
    pub spent: Decimal,
    /// Unspent amount, never below zero
    #[serde(with = "money")]
    pub remaining: Decimal,
    /// Spending beyond the budget, zero while within it
    #[serde(with = "money")]
    pub overspent: Decimal,
    /// `spent / budget_amount * 100`, unclamped so 250% stays 250%
    #[serde(with = "money")]
    pub percentage: Decimal,
    pub status: ConsumptionState,
}

impl BudgetStatus {
    pub fn compute(budget_type: BudgetType, budget_amount: Decimal, spent: Decimal) -> Self {
        let status = if spent > budget_amount {
            ConsumptionState::Exceeded
        } else {
            ConsumptionState::Within
        };

        Self {
            budget_type,
            budget_amount,
            spent,
            remaining: (budget_amount - spent).max(Decimal::ZERO),
            overspent: (spent - budget_amount).max(Decimal::ZERO),
            percentage: money::percentage(spent, budget_amount),
            status,
        }
    }
}

/// The active budget per type: the newest record, ties broken by the larger id
pub fn active_budgets(budgets: &[Budget]) -> BTreeMap<BudgetType, &Budget> {
    let mut active: BTreeMap<BudgetType, &Budget> = BTreeMap::new();
    for budget in budgets {
        let newer = match active.get(&budget.budget_type) {
            Some(current) => (budget.created_at, budget.id) > (current.created_at, current.id),
            None => true,
        };
        if newer {
            active.insert(budget.budget_type, budget);
        }
    }
    active
}

/// Compute consumption for each active budget.
///
/// `provider` returns the aggregate for a window; any failure aborts the whole
/// computation. Types with no budget are absent from the result.
pub fn status<E, F>(
    budgets: &[Budget],
    ctx: &UserContext,
    mut provider: F,
) -> Result<BTreeMap<BudgetType, BudgetStatus>, E>
where
    F: FnMut(Window) -> Result<Aggregate, E>,
{
    let mut result = BTreeMap::new();

    for (budget_type, budget) in active_budgets(budgets) {
        let window = ctx.window(budget_type.window_kind());
        let spent = provider(window)?.total;
        let status = BudgetStatus::compute(budget_type, budget.amount, spent);

        debug!(
            user_id = ctx.user_id,
            budget_type = %budget_type,
            spent = %status.spent,
            percentage = %status.percentage,
            "Computed budget status"
        );
        result.insert(budget_type, status);
    }

    Ok(result)
}

/// [`status`] over an in-memory set of expenses covering the budget windows
pub fn status_from_expenses(
    budgets: &[Budget],
    ctx: &UserContext,
    expenses: &[Expense],
) -> BTreeMap<BudgetType, BudgetStatus> {
    status(budgets, ctx, |window| {
        Ok::<_, Infallible>(aggregate(expenses, window))
    })
    .unwrap_or_else(|never| match never {})
}
