//! Expense command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use spendwise_core::models::{parse_date, Category, ExpenseFilter};
use spendwise_core::{Database, ExpenseRequest, ExpenseStore};

use super::{format_money, print_json, truncate, Session};

/// Build a listing filter from raw CLI flags
pub fn expense_filter(
    category: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<ExpenseFilter> {
    let category = category
        .map(|c| c.parse::<Category>().map_err(anyhow::Error::msg))
        .transpose()?;
    let from = from.map(|s| parse_date("from", s)).transpose()?;
    let to = to.map(|s| parse_date("to", s)).transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        anyhow::ensure!(from <= to, "--from ({}) is after --to ({})", from, to);
    }

    Ok(ExpenseFilter { category, from, to })
}

pub fn cmd_expenses_list(
    db: &Database,
    session: &Session,
    category: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let filter = expense_filter(category, from, to)?;
    let tz = session.config.timezone;
    let mut expenses = db.list_expenses(session.user_id, &filter, tz)?;
    expenses.truncate(limit);

    if json {
        return print_json(&expenses);
    }

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  spendwise expenses add 250 FOOD --note lunch");
        return Ok(());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for e in &expenses {
        let local = e.date_time.with_timezone(&tz);
        println!(
            "   #{:<5} │ {} │ {:>11} │ {:<13} │ {:<11} │ {}",
            e.id,
            local.format("%Y-%m-%d %H:%M"),
            format_money(e.amount),
            e.category.as_str(),
            e.payment_method.as_str(),
            truncate(e.note.as_deref().unwrap_or(""), 30)
        );
    }

    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {} expenses, {}", expenses.len(), format_money(total));

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    session: &Session,
    amount: Decimal,
    category: &str,
    payment_method: Option<String>,
    note: Option<String>,
    at: Option<String>,
) -> Result<()> {
    let request = ExpenseRequest {
        amount,
        category: category.to_string(),
        payment_method,
        note,
        date_time: at,
    };
    let expense = request.validate(Utc::now(), session.config.timezone)?;
    let created = db
        .add_expense(session.user_id, &expense)
        .context("Failed to record expense")?;

    println!(
        "✅ Recorded expense #{}: {} on {} ({})",
        created.id,
        format_money(created.amount),
        created.category,
        created.payment_method
    );

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, session: &Session, id: i64) -> Result<()> {
    db.delete_expense(session.user_id, id)?;
    println!("🗑️  Deleted expense #{}", id);
    Ok(())
}
