//! Insight Engine - top category, week-over-week delta and forecast

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::aggregate::{aggregate, Aggregate};
use crate::budget;
use crate::context::{EngineConfig, UserContext, DEFAULT_FORECAST_WEEKS, MAX_FORECAST_WEEKS};
use crate::error::Result;
use crate::models::{Budget, Expense};
use crate::store::{BudgetStore, ExpenseStore};
use crate::window::{resolve, WindowKind};

use super::forecast::{Forecaster, MovingAverage};
use super::types::{Insights, TopCategory};

/// Computes [`Insights`] for one user from their expenses
pub struct InsightEngine {
    forecaster: Box<dyn Forecaster>,
    /// Completed weeks the forecast looks back over
    history_weeks: usize,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_WEEKS)
    }
}

impl InsightEngine {
    /// Engine using the moving-average forecaster over `history_weeks` weeks
    pub fn new(history_weeks: usize) -> Self {
        Self::with_forecaster(Box::new(MovingAverage), history_weeks)
    }

    /// `history_weeks` is capped at [`MAX_FORECAST_WEEKS`]
    pub fn with_forecaster(forecaster: Box<dyn Forecaster>, history_weeks: usize) -> Self {
        Self {
            forecaster,
            history_weeks: history_weeks.min(MAX_FORECAST_WEEKS),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.forecast_weeks)
    }

    pub fn history_weeks(&self) -> usize {
        self.history_weeks
    }

    /// The instant range [`InsightEngine::compute`] needs expenses for: the
    /// current month plus the current week and the forecast history weeks.
    pub fn fetch_range(&self, ctx: &UserContext) -> (DateTime<Utc>, DateTime<Utc>) {
        let month = ctx.window(WindowKind::Month);
        let week = ctx.window(WindowKind::Week);
        let history_start = week.shifted_weeks(-(self.history_weeks as i64), ctx.tz).start;

        (month.start.min(history_start), month.end.max(week.end))
    }

    /// Compute insights from `expenses`, which must cover [`InsightEngine::fetch_range`].
    ///
    /// `first_expense_at` limits the forecast history to weeks the user was
    /// actually recording expenses; `None` means no history at all.
    /// `budgets` is the user's budget history; only active budgets report.
    pub fn compute(
        &self,
        ctx: &UserContext,
        expenses: &[Expense],
        budgets: &[Budget],
        first_expense_at: Option<DateTime<Utc>>,
    ) -> Insights {
        let month = aggregate(expenses, ctx.window(WindowKind::Month));
        let (top_category, top_category_amount) = match month.by_category.ranked().first() {
            Some((category, amount)) => (TopCategory::Category(*category), *amount),
            None => (TopCategory::NoData, Decimal::ZERO),
        };

        let week = ctx.window(WindowKind::Week);
        let current = aggregate(expenses, week);
        let previous = aggregate(expenses, week.previous(ctx.tz));
        let week_comparison = current.total - previous.total;

        let history: Vec<Aggregate> = match first_expense_at {
            Some(first) => {
                let first_week = resolve(WindowKind::Week, first, ctx.tz);
                week.preceding(self.history_weeks, ctx.tz)
                    .into_iter()
                    .filter(|w| w.start >= first_week.start)
                    .map(|w| aggregate(expenses, w))
                    .collect()
            }
            None => Vec::new(),
        };
        let predictions = self.forecaster.forecast(&history);
        let budget_status = budget::status_from_expenses(budgets, ctx, expenses);

        tracing::debug!(
            user_id = ctx.user_id,
            forecaster = self.forecaster.name(),
            history_weeks = history.len(),
            top_category = %top_category,
            week_comparison = %week_comparison,
            next_week_total = %predictions.next_week_total,
            "Computed insights"
        );

        Insights {
            top_category,
            top_category_amount,
            week_comparison,
            predictions,
            budget_status,
        }
    }

    /// Fetch what [`InsightEngine::compute`] needs from `store` and compute
    pub fn insights<S>(&self, store: &S, ctx: &UserContext) -> Result<Insights>
    where
        S: ExpenseStore + BudgetStore + ?Sized,
    {
        let (start, end) = self.fetch_range(ctx);
        let expenses = store.expenses_between(ctx.user_id, start, end)?;
        let budgets = store.budget_history(ctx.user_id)?;
        let first = store.first_expense_at(ctx.user_id)?;
        Ok(self.compute(ctx, &expenses, &budgets, first))
    }
}
