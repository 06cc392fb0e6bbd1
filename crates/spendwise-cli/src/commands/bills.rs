//! Bill command implementations

use anyhow::Result;
use rust_decimal::Decimal;
use spendwise_core::bills::{self, BillStatus, BillView};
use spendwise_core::{BillRequest, BillStore, Database};

use super::{format_money, print_json, truncate, Session};

fn status_icon(view: &BillView) -> &'static str {
    match view.status {
        BillStatus::Paid => "✅",
        BillStatus::Overdue => "🔴",
        BillStatus::Upcoming if view.reminder_due => "🔔",
        BillStatus::Upcoming => "📅",
    }
}

fn due_label(view: &BillView) -> String {
    match (view.status, view.days_until_due) {
        (BillStatus::Paid, _) => "paid".to_string(),
        (_, 0) => "due today".to_string(),
        (_, 1) => "due tomorrow".to_string(),
        (_, d) if d < 0 => format!("{} days overdue", -d),
        (_, d) => format!("due in {} days", d),
    }
}

fn print_bill(view: &BillView) {
    println!(
        "   {} #{:<4} │ {:<24} │ {:>11} │ {} │ {}",
        status_icon(view),
        view.bill.id,
        truncate(&view.bill.bill_name, 24),
        format_money(view.bill.amount),
        view.bill.due_date,
        due_label(view)
    );
}

pub fn cmd_bills_list(db: &Database, session: &Session, json: bool) -> Result<()> {
    let today = session.context().today();
    let views = bills::views(db.list_bills(session.user_id)?, today);

    if json {
        return print_json(&views);
    }

    if views.is_empty() {
        println!("No bills scheduled. Add one with:");
        println!("  spendwise bills add Electricity 1200 2024-04-05");
        return Ok(());
    }

    println!();
    println!("🧾 Bills");
    println!("   ─────────────────────────────────────────────────────────────");

    for view in &views {
        print_bill(view);
    }

    Ok(())
}

pub fn cmd_bills_add(
    db: &Database,
    session: &Session,
    name: &str,
    amount: Decimal,
    due_date: &str,
    reminder_days: Option<i64>,
    recurring: bool,
) -> Result<()> {
    let bill = BillRequest {
        bill_name: name.to_string(),
        amount,
        due_date: due_date.to_string(),
        reminder_days,
        is_recurring: Some(recurring),
    }
    .validate()?;
    let created = db.add_bill(session.user_id, &bill)?;
    let view = BillView::new(created, session.context().today());

    println!(
        "✅ Scheduled bill #{}: {} {} ({})",
        view.bill.id,
        view.bill.bill_name,
        format_money(view.bill.amount),
        due_label(&view)
    );

    Ok(())
}

pub fn cmd_bills_pay(db: &Database, session: &Session, id: i64) -> Result<()> {
    let ctx = session.context();
    let bill = db.mark_bill_paid(session.user_id, id, ctx.now)?;

    println!(
        "✅ Marked '{}' paid ({})",
        bill.bill_name,
        format_money(bill.amount)
    );

    Ok(())
}

pub fn cmd_bills_delete(db: &Database, session: &Session, id: i64) -> Result<()> {
    db.delete_bill(session.user_id, id)?;
    println!("🗑️  Deleted bill #{}", id);
    Ok(())
}

pub fn cmd_bills_reminders(db: &Database, session: &Session) -> Result<()> {
    let today = session.context().today();
    let due = bills::reminders(db.list_bills(session.user_id)?, today);

    if due.is_empty() {
        println!("✅ Nothing due. No bills inside their reminder window.");
        return Ok(());
    }

    println!();
    println!("🔔 Bill Reminders");
    println!("   ─────────────────────────────────────────────────────────────");

    for view in &due {
        print_bill(view);
    }

    let total: Decimal = due.iter().map(|v| v.bill.amount).sum();
    println!();
    println!("   {} bills need attention, {} in total", due.len(), format_money(total));

    Ok(())
}
