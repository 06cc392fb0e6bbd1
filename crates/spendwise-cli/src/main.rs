//! SpendWise CLI - Personal expense tracker
//!
//! Usage:
//!   spendwise init                       Initialize database
//!   spendwise expenses add 250 FOOD      Record an expense
//!   spendwise budgets set WEEKLY 2000    Set a weekly budget
//!   spendwise dashboard                  Today, this week, this month
//!   spendwise serve --port 3000          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let session = commands::session(cli.user, cli.tz.as_deref(), cli.forecast_weeks)?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            no_auth,
            allowed_origins,
        } => {
            commands::cmd_serve(&cli.db, &host, port, no_auth, allowed_origins, &session).await
        }
        Commands::Dashboard { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db, &session, json)
        }
        Commands::Insights { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_insights(&db, &session, json)
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_expenses_list(&db, &session, None, None, None, 20, false),
                Some(ExpensesAction::List {
                    category,
                    from,
                    to,
                    limit,
                    json,
                }) => commands::cmd_expenses_list(
                    &db,
                    &session,
                    category.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    limit,
                    json,
                ),
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    payment_method,
                    note,
                    at,
                }) => commands::cmd_expenses_add(
                    &db,
                    &session,
                    amount,
                    &category,
                    payment_method,
                    note,
                    at,
                ),
                Some(ExpensesAction::Delete { id }) => {
                    commands::cmd_expenses_delete(&db, &session, id)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&db, &session),
                Some(BudgetsAction::Set {
                    budget_type,
                    amount,
                }) => commands::cmd_budgets_set(&db, &session, &budget_type, amount),
                Some(BudgetsAction::History) => commands::cmd_budgets_history(&db, &session),
            }
        }
        Commands::Bills { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_bills_list(&db, &session, false),
                Some(BillsAction::List { json }) => commands::cmd_bills_list(&db, &session, json),
                Some(BillsAction::Add {
                    name,
                    amount,
                    due_date,
                    reminder_days,
                    recurring,
                }) => commands::cmd_bills_add(
                    &db,
                    &session,
                    &name,
                    amount,
                    &due_date,
                    reminder_days,
                    recurring,
                ),
                Some(BillsAction::Pay { id }) => commands::cmd_bills_pay(&db, &session, id),
                Some(BillsAction::Delete { id }) => commands::cmd_bills_delete(&db, &session, id),
                Some(BillsAction::Reminders) => commands::cmd_bills_reminders(&db, &session),
            }
        }
    }
}
