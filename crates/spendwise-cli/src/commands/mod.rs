//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, session)
//! - `bills` - Bill commands (list, add, pay, delete, reminders)
//! - `budgets` - Budget commands (list, set, history)
//! - `expenses` - Expense commands (list, add, delete)
//! - `reports` - Dashboard and insights
//! - `serve` - Web server command

pub mod bills;
pub mod budgets;
pub mod core;
pub mod expenses;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use bills::*;
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use reports::*;
pub use serve::*;

use rust_decimal::Decimal;
use serde::Serialize;
use spendwise_core::money;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount for display as `₹1234.50`
pub fn format_money(amount: Decimal) -> String {
    format!("₹{:.2}", money::round_cents(amount))
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
