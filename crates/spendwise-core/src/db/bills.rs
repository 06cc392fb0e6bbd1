//! Bill operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_date, format_datetime, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Bill, NewBill};
use crate::money;
use crate::store::BillStore;

const BILL_COLUMNS: &str =
    "id, user_id, bill_name, amount_cents, due_date, reminder_days, is_recurring, paid_at";

struct BillRow {
    id: i64,
    user_id: i64,
    bill_name: String,
    amount_cents: i64,
    due_date: String,
    reminder_days: i64,
    is_recurring: bool,
    paid_at: Option<String>,
}

impl BillRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            bill_name: row.get(2)?,
            amount_cents: row.get(3)?,
            due_date: row.get(4)?,
            reminder_days: row.get(5)?,
            is_recurring: row.get(6)?,
            paid_at: row.get(7)?,
        })
    }

    fn into_bill(self) -> Result<Bill> {
        Ok(Bill {
            id: self.id,
            user_id: self.user_id,
            bill_name: self.bill_name,
            amount: money::from_cents(self.amount_cents),
            due_date: parse_date(&self.due_date)?,
            reminder_days: u32::try_from(self.reminder_days).map_err(|_| {
                Error::InvalidData(format!("Bill {} has reminder_days {}", self.id, self.reminder_days))
            })?,
            is_recurring: self.is_recurring,
            paid_at: self.paid_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

fn fetch_bill(conn: &Connection, user_id: i64, id: i64) -> Result<Bill> {
    conn.query_row(
        &format!("SELECT {} FROM bills WHERE id = ? AND user_id = ?", BILL_COLUMNS),
        params![id, user_id],
        BillRow::from_row,
    )
    .optional()?
    .ok_or_else(|| Error::NotFound(format!("Bill {}", id)))?
    .into_bill()
}

impl BillStore for Database {
    fn add_bill(&self, user_id: i64, bill: &NewBill) -> Result<Bill> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO bills (user_id, bill_name, amount_cents, due_date, reminder_days, is_recurring)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                bill.bill_name,
                money::to_cents(bill.amount)?,
                format_date(bill.due_date),
                bill.reminder_days,
                bill.is_recurring,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(user_id, id, bill_name = %bill.bill_name, due_date = %bill.due_date, "Bill added");
        fetch_bill(&conn, user_id, id)
    }

    fn list_bills(&self, user_id: i64) -> Result<Vec<Bill>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bills WHERE user_id = ? ORDER BY due_date ASC, id ASC",
            BILL_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![user_id], BillRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(BillRow::into_bill).collect()
    }

    fn get_bill(&self, user_id: i64, id: i64) -> Result<Bill> {
        let conn = self.conn()?;
        fetch_bill(&conn, user_id, id)
    }

    fn mark_bill_paid(&self, user_id: i64, id: i64, paid_at: DateTime<Utc>) -> Result<Bill> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE bills SET paid_at = COALESCE(paid_at, ?) WHERE id = ? AND user_id = ?",
            params![format_datetime(paid_at), id, user_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Bill {}", id)));
        }
        tracing::info!(user_id, id, "Bill marked paid");
        fetch_bill(&conn, user_id, id)
    }

    fn delete_bill(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM bills WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Bill {}", id)));
        }
        Ok(())
    }
}
