//! Budget operations

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{format_datetime, parse_datetime, parse_token, Database};
use crate::error::Result;
use crate::models::{Budget, NewBudget};
use crate::money;
use crate::store::BudgetStore;

impl BudgetStore for Database {
    fn set_budget(
        &self,
        user_id: i64,
        budget: &NewBudget,
        created_at: DateTime<Utc>,
    ) -> Result<Budget> {
        let conn = self.conn()?;
        let amount_cents = money::to_cents(budget.amount)?;
        let created_at = format_datetime(created_at);

        conn.execute(
            "INSERT INTO budgets (user_id, budget_type, amount_cents, created_at) VALUES (?, ?, ?, ?)",
            params![user_id, budget.budget_type.as_str(), amount_cents, created_at],
        )?;

        tracing::info!(
            user_id,
            budget_type = %budget.budget_type,
            amount = %budget.amount,
            "Budget set"
        );

        Ok(Budget {
            id: conn.last_insert_rowid(),
            user_id,
            budget_type: budget.budget_type,
            amount: money::from_cents(amount_cents),
            created_at: parse_datetime(&created_at)?,
        })
    }

    fn budget_history(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, budget_type, amount_cents, created_at FROM budgets
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, budget_type, amount_cents, created_at)| {
                Ok(Budget {
                    id,
                    user_id,
                    budget_type: parse_token("budget_type", &budget_type)?,
                    amount: money::from_cents(amount_cents),
                    created_at: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }
}
