//! Dashboard and insights command implementations

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use spendwise_core::models::BudgetType;
use spendwise_core::{
    dashboard, BudgetStatus, ConsumptionState, Database, InsightEngine, TopCategory,
};

use super::{format_money, print_json, Session};

/// Text progress bar for a percentage, clamped to the bar width
fn progress_bar(percentage: Decimal, width: usize) -> String {
    let pct = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (pct * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn print_budgets(statuses: &BTreeMap<BudgetType, BudgetStatus>) {
    if statuses.is_empty() {
        return;
    }
    println!();
    println!("  🎯 Budgets");
    for status in statuses.values() {
        let marker = match status.status {
            ConsumptionState::Within => "✅",
            ConsumptionState::Exceeded => "⚠️ ",
        };
        println!(
            "     {} {:<8} {} {:>8}  {} of {}",
            marker,
            status.budget_type.as_str(),
            progress_bar(status.percentage, 20),
            format!("{:.2}%", status.percentage),
            format_money(status.spent),
            format_money(status.budget_amount)
        );
        match status.status {
            ConsumptionState::Exceeded => {
                println!("        Over by {}", format_money(status.overspent))
            }
            ConsumptionState::Within => {
                println!("        {} left", format_money(status.remaining))
            }
        }
    }
}

pub fn cmd_dashboard(db: &Database, session: &Session, json: bool) -> Result<()> {
    let ctx = session.context();
    let d = dashboard::dashboard(db, &ctx)?;

    if json {
        return print_json(&d);
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 SpendWise Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Today:       {:>12}", format_money(d.today_total));
    println!(
        "  This week:   {:>12}  ({} expenses)",
        format_money(d.week_total),
        d.week_count
    );
    println!(
        "  This month:  {:>12}  ({} expenses)",
        format_money(d.month_total),
        d.month_count
    );

    if !d.categories.is_empty() {
        println!();
        println!("  📊 This month by category");
        for c in &d.categories {
            println!(
                "     {:<14} {:>12}  {:>7}",
                c.category.as_str(),
                format_money(c.total),
                format!("{:.2}%", c.percentage)
            );
        }
    }

    print_budgets(&d.budget_status);
    println!();

    Ok(())
}

pub fn cmd_insights(db: &Database, session: &Session, json: bool) -> Result<()> {
    let ctx = session.context();
    let engine = InsightEngine::from_config(&session.config);
    let insights = engine.insights(db, &ctx)?;

    if json {
        return print_json(&insights);
    }

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────");

    match insights.top_category {
        TopCategory::Category(category) => println!(
            "   Top category this month: {} ({})",
            category,
            format_money(insights.top_category_amount)
        ),
        TopCategory::NoData => println!("   Top category this month: no spending yet"),
    }

    let delta = insights.week_comparison;
    if delta > Decimal::ZERO {
        println!("   📈 {} more than last week", format_money(delta));
    } else if delta < Decimal::ZERO {
        println!("   📉 {} less than last week", format_money(-delta));
    } else {
        println!("   ➖ Same as last week");
    }

    println!();
    println!(
        "   🔮 Next week forecast ({}-week average): {}",
        engine.history_weeks(),
        format_money(insights.predictions.next_week_total)
    );
    for (category, amount) in &insights.predictions.category_breakdown {
        println!("      {:<14} {:>12}", category.as_str(), format_money(*amount));
    }
    print_budgets(&insights.budget_status);
    println!();

    Ok(())
}
