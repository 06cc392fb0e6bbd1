//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `session` - Resolve who the CLI acts for and on which clock
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use spendwise_core::context::{parse_timezone, valid_forecast_weeks, MAX_FORECAST_WEEKS};
use spendwise_core::{Database, EngineConfig, UserContext};
use tracing::debug;

/// The user and engine settings every command runs with
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: i64,
    pub config: EngineConfig,
}

impl Session {
    /// Context at the current instant
    pub fn context(&self) -> UserContext {
        self.config.context(self.user_id)
    }
}

/// Build the session from CLI flags layered over `SPENDWISE_TZ` and
/// `SPENDWISE_FORECAST_WEEKS`
pub fn session(user_id: i64, tz: Option<&str>, forecast_weeks: Option<usize>) -> Result<Session> {
    let mut config = EngineConfig::from_env();

    if let Some(name) = tz {
        config.timezone = parse_timezone(name).with_context(|| {
            format!("Unknown timezone '{}' (use an IANA name like Asia/Kolkata)", name)
        })?;
    }
    if let Some(weeks) = forecast_weeks {
        anyhow::ensure!(
            valid_forecast_weeks(weeks),
            "--forecast-weeks must be between 1 and {}",
            MAX_FORECAST_WEEKS
        );
        config.forecast_weeks = weeks;
    }

    debug!(
        user_id,
        timezone = %config.timezone,
        forecast_weeks = config.forecast_weeks,
        "Session resolved"
    );
    Ok(Session { user_id, config })
}

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    db.health_check().context("Database health check failed")?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: spendwise expenses add 250 FOOD --note lunch");
    println!("  2. Set a budget: spendwise budgets set WEEKLY 2000");
    println!("  3. Start web API: spendwise serve");

    Ok(())
}
