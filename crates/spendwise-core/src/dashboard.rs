//! Dashboard composition: day, week and month totals plus budget adherence

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::aggregate;
use crate::budget::{self, BudgetStatus};
use crate::context::UserContext;
use crate::error::Result;
use crate::models::{Budget, BudgetType, Category, Expense};
use crate::money;
use crate::store::{BudgetStore, ExpenseStore};
use crate::window::WindowKind;

/// One row of the month's category rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    #[serde(with = "money")]
    pub total: Decimal,
    /// Share of the month total, in percent
    #[serde(with = "money")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    #[serde(with = "money")]
    pub today_total: Decimal,
    #[serde(with = "money")]
    pub week_total: Decimal,
    pub week_count: usize,
    #[serde(with = "money")]
    pub month_total: Decimal,
    pub month_count: usize,
    /// Non-zero categories of the current month, largest first
    pub categories: Vec<CategorySummary>,
    pub budget_status: BTreeMap<BudgetType, BudgetStatus>,
}

/// Instant range covering today, this week and this month
pub fn fetch_range(ctx: &UserContext) -> (DateTime<Utc>, DateTime<Utc>) {
    let windows = [WindowKind::Day, WindowKind::Week, WindowKind::Month].map(|k| ctx.window(k));
    let start = windows.iter().map(|w| w.start).min().unwrap_or(ctx.now);
    let end = windows.iter().map(|w| w.end).max().unwrap_or(ctx.now);
    (start, end)
}

/// Compose the dashboard from expenses covering [`fetch_range`] and the user's budgets
pub fn compose(ctx: &UserContext, expenses: &[Expense], budgets: &[Budget]) -> Dashboard {
    let today = aggregate(expenses, ctx.window(WindowKind::Day));
    let week = aggregate(expenses, ctx.window(WindowKind::Week));
    let month = aggregate(expenses, ctx.window(WindowKind::Month));

    let categories = month
        .by_category
        .ranked()
        .into_iter()
        .map(|(category, total)| CategorySummary {
            category,
            total,
            percentage: money::percentage(total, month.total),
        })
        .collect();

    Dashboard {
        today_total: today.total,
        week_total: week.total,
        week_count: week.count,
        month_total: month.total,
        month_count: month.count,
        categories,
        budget_status: budget::status_from_expenses(budgets, ctx, expenses),
    }
}

/// Fetch the user's expenses and budgets from `store` and compose
pub fn dashboard<S>(store: &S, ctx: &UserContext) -> Result<Dashboard>
where
    S: ExpenseStore + BudgetStore + ?Sized,
{
    let (start, end) = fetch_range(ctx);
    let expenses = store.expenses_between(ctx.user_id, start, end)?;
    let budgets = store.budget_history(ctx.user_id)?;
    Ok(compose(ctx, &expenses, &budgets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::ConsumptionState;
    use crate::models::{NewBudget, NewExpense};
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 20, 0, 0).unwrap()
    }

    fn ctx() -> UserContext {
        UserContext::new(1, now(), Tz::UTC)
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let add = |amount, category, days: i64| {
            store
                .add_expense(1, &NewExpense::new(amount, category, now() - Duration::days(days)))
                .unwrap();
        };
        add(dec!(100), Category::Food, 3);
        add(dec!(50), Category::Food, 1);
        add(dec!(200), Category::Transport, 0);
        // Earlier in March, outside this week
        add(dec!(50), Category::Shopping, 12);
        store
    }

    #[test]
    fn test_dashboard_totals() {
        let store = seeded();
        store
            .set_budget(
                1,
                &NewBudget {
                    budget_type: BudgetType::Weekly,
                    amount: dec!(300),
                },
                now(),
            )
            .unwrap();

        let d = dashboard(&store, &ctx()).unwrap();
        assert_eq!(d.today_total, dec!(200));
        assert_eq!(d.week_total, dec!(350));
        assert_eq!(d.week_count, 3);
        assert_eq!(d.month_total, dec!(400));
        assert_eq!(d.month_count, 4);

        let order: Vec<Category> = d.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![Category::Transport, Category::Food, Category::Shopping]
        );
        assert_eq!(d.categories[0].percentage, dec!(50));
        assert_eq!(d.categories[2].percentage, dec!(12.5));

        let weekly = &d.budget_status[&BudgetType::Weekly];
        assert_eq!(weekly.percentage, dec!(116.67));
        assert_eq!(weekly.status, ConsumptionState::Exceeded);
        assert!(!d.budget_status.contains_key(&BudgetType::Monthly));
    }

    #[test]
    fn test_empty_dashboard() {
        let d = dashboard(&MemoryStore::new(), &ctx()).unwrap();
        assert_eq!(d.month_total, Decimal::ZERO);
        assert!(d.categories.is_empty());
        assert!(d.budget_status.is_empty());

        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["today_total"], 0.0);
        assert_eq!(json["budget_status"], serde_json::json!({}));
    }

    #[test]
    fn test_fetch_range_spans_week_across_month_start() {
        // Friday 1st March: the week started in February
        let ctx = UserContext::new(1, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(), Tz::UTC);
        let (start, end) = fetch_range(&ctx);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 26, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
    }
}
