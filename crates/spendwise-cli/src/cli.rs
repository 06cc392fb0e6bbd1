//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// SpendWise - Track where the money goes
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Self-hosted expense tracker with budgets, bills and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendwise.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// User whose records are read and written
    #[arg(short, long, default_value = "1", global = true)]
    pub user: i64,

    /// Reporting timezone as an IANA name (defaults to SPENDWISE_TZ, else UTC)
    #[arg(long, global = true)]
    pub tz: Option<String>,

    /// Completed weeks the spending forecast averages over
    #[arg(long, global = true)]
    pub forecast_weeks: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, requests need "Authorization: Bearer <key>" with a key
        /// from SPENDWISE_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Show today, this week and this month with budget adherence
    Dashboard {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show top category, week-over-week change and next week's forecast
    Insights {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Manage expenses (list, add, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage weekly and monthly budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Manage scheduled bills
    Bills {
        #[command(subcommand)]
        action: Option<BillsAction>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Only this category (FOOD, TRANSPORT, ...)
        #[arg(short, long)]
        category: Option<String>,

        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an expense
    Add {
        /// Amount, at most two decimal places
        amount: Decimal,

        /// Category (FOOD, TRANSPORT, ENTERTAINMENT, BILLS, SHOPPING, HEALTHCARE, EDUCATION, OTHER)
        category: String,

        /// Payment method (CASH, UPI, CARD, WALLET, NET_BANKING)
        #[arg(short, long)]
        payment_method: Option<String>,

        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,

        /// When it happened (RFC 3339, or local YYYY-MM-DD[THH:MM]); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Show the active budget per type
    List,

    /// Set a budget (the newest budget per type is the active one)
    Set {
        /// Budget type: WEEKLY or MONTHLY
        budget_type: String,

        /// Budget amount
        amount: Decimal,
    },

    /// Show every budget ever set, newest first
    History,
}

#[derive(Subcommand)]
pub enum BillsAction {
    /// List bills with their status, soonest due first
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Schedule a bill
    Add {
        /// Bill name
        name: String,

        /// Amount due
        amount: Decimal,

        /// Due date (YYYY-MM-DD)
        due_date: String,

        /// Days before the due date to start reminding
        #[arg(short, long)]
        reminder_days: Option<i64>,

        /// Bill repeats every period
        #[arg(long)]
        recurring: bool,
    },

    /// Mark a bill paid
    Pay {
        /// Bill ID
        id: i64,
    },

    /// Delete a bill
    Delete {
        /// Bill ID
        id: i64,
    },

    /// Show unpaid bills that are inside their reminder window
    Reminders,
}
