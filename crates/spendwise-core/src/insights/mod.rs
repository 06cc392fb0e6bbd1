//! Insight Engine - derived spending insights
//!
//! Turns a user's expenses and budgets into four insights:
//!
//! - **Top category** - the largest category of the current month
//! - **Week comparison** - this week's total minus last week's
//! - **Predictions** - next week's total and per-category spend, projected by
//!   a pluggable [`Forecaster`] over recent completed weeks
//! - **Budget status** - each active budget's consumption, with any overspend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::from_config(&config);
//! let insights = engine.insights(&db, &config.context(user_id))?;
//! ```

pub mod engine;
pub mod forecast;
pub mod types;

pub use engine::InsightEngine;
pub use forecast::{Forecaster, MovingAverage};
pub use types::{Insights, Predictions, TopCategory, NO_DATA};
