//! Budget command implementations

use anyhow::Result;
use rust_decimal::Decimal;
use spendwise_core::{BudgetRequest, BudgetStore, Database};

use super::{format_money, Session};

pub fn cmd_budgets_list(db: &Database, session: &Session) -> Result<()> {
    let budgets = db.active_budgets(session.user_id)?;

    if budgets.is_empty() {
        println!("No budgets set. Set one with:");
        println!("  spendwise budgets set WEEKLY 2000");
        return Ok(());
    }

    println!();
    println!("🎯 Active Budgets");
    println!("   ─────────────────────────────");

    for b in budgets {
        println!("   {:<8} {:>12}", b.budget_type.as_str(), format_money(b.amount));
    }

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    session: &Session,
    budget_type: &str,
    amount: Decimal,
) -> Result<()> {
    let budget = BudgetRequest {
        budget_type: budget_type.to_string(),
        amount,
    }
    .validate()?;
    let ctx = session.context();
    let created = db.set_budget(session.user_id, &budget, ctx.now)?;

    println!(
        "✅ {} budget set to {}",
        created.budget_type,
        format_money(created.amount)
    );

    Ok(())
}

pub fn cmd_budgets_history(db: &Database, session: &Session) -> Result<()> {
    let history = db.budget_history(session.user_id)?;

    if history.is_empty() {
        println!("No budgets have been set.");
        return Ok(());
    }

    let tz = session.config.timezone;

    println!();
    println!("📜 Budget History");
    println!("   ─────────────────────────────────────────────");

    for b in history {
        println!(
            "   {} │ {:<8} │ {:>12}",
            b.created_at.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
            b.budget_type.as_str(),
            format_money(b.amount)
        );
    }

    Ok(())
}
