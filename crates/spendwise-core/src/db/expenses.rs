//! Expense operations

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, parse_token, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseFilter, NewExpense};
use crate::money;
use crate::store::ExpenseStore;

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount_cents, category, payment_method, note, date_time";

/// An expense row as stored, before token and timestamp parsing
struct ExpenseRow {
    id: i64,
    user_id: i64,
    amount_cents: i64,
    category: String,
    payment_method: String,
    note: Option<String>,
    date_time: String,
}

impl ExpenseRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount_cents: row.get(2)?,
            category: row.get(3)?,
            payment_method: row.get(4)?,
            note: row.get(5)?,
            date_time: row.get(6)?,
        })
    }

    fn into_expense(self) -> Result<Expense> {
        Ok(Expense {
            id: self.id,
            user_id: self.user_id,
            amount: money::from_cents(self.amount_cents),
            category: parse_token("category", &self.category)?,
            payment_method: parse_token("payment_method", &self.payment_method)?,
            note: self.note,
            date_time: parse_datetime(&self.date_time)?,
        })
    }
}

fn query_expenses(conn: &Connection, sql: &str, values: Vec<Value>) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(values), ExpenseRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(ExpenseRow::into_expense).collect()
}

impl ExpenseStore for Database {
    fn add_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, amount_cents, category, payment_method, note, date_time)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                money::to_cents(expense.amount)?,
                expense.category.as_str(),
                expense.payment_method.as_str(),
                expense.note,
                format_datetime(expense.date_time),
            ],
        )?;
        let id = conn.last_insert_rowid();

        let row = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                ExpenseRow::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))?;

        tracing::debug!(user_id, id, amount = %expense.amount, "Expense recorded");
        row.into_expense()
    }

    fn list_expenses(&self, user_id: i64, filter: &ExpenseFilter, tz: Tz) -> Result<Vec<Expense>> {
        let mut sql = format!("SELECT {} FROM expenses WHERE user_id = ?", EXPENSE_COLUMNS);
        let mut values: Vec<Value> = vec![Value::Integer(user_id)];

        if let Some(category) = filter.category {
            sql.push_str(" AND category = ?");
            values.push(Value::Text(category.as_str().to_string()));
        }
        let (start, end) = filter.bounds(tz);
        if let Some(start) = start {
            sql.push_str(" AND date_time >= ?");
            values.push(Value::Text(format_datetime(start)));
        }
        if let Some(end) = end {
            sql.push_str(" AND date_time < ?");
            values.push(Value::Text(format_datetime(end)));
        }
        sql.push_str(" ORDER BY date_time DESC, id DESC");

        let conn = self.conn()?;
        query_expenses(&conn, &sql, values)
    }

    fn expenses_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        query_expenses(
            &conn,
            &format!(
                "SELECT {} FROM expenses
                 WHERE user_id = ? AND date_time >= ? AND date_time < ?
                 ORDER BY date_time",
                EXPENSE_COLUMNS
            ),
            vec![
                Value::Integer(user_id),
                Value::Text(format_datetime(start)),
                Value::Text(format_datetime(end)),
            ],
        )
    }

    fn first_expense_at(&self, user_id: i64) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn()?;
        let first: Option<String> = conn.query_row(
            "SELECT MIN(date_time) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;

        first.as_deref().map(parse_datetime).transpose()
    }

    fn delete_expense(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        tracing::debug!(user_id, id, "Expense deleted");
        Ok(())
    }
}
