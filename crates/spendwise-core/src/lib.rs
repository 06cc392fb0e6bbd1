//! SpendWise Core Library
//!
//! Expense aggregation and budget-tracking engine for the SpendWise personal
//! finance tracker:
//! - Time-window resolution on the user's reporting timezone
//! - Aggregation of expenses into totals and category rollups
//! - Budget adherence against the active weekly/monthly budget
//! - Insights: top category, week-over-week delta, pluggable forecasting
//! - Bill status and reminder windows
//! - Storage traits with SQLite and in-memory implementations

pub mod aggregate;
pub mod bills;
pub mod budget;
pub mod context;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod money;
pub mod store;
pub mod window;

pub use aggregate::{aggregate, Aggregate, CategoryTotals};
pub use bills::{BillStatus, BillView, DueBand};
pub use budget::{BudgetStatus, ConsumptionState};
pub use context::{EngineConfig, UserContext};
pub use dashboard::{CategorySummary, Dashboard};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{Forecaster, InsightEngine, Insights, MovingAverage, Predictions, TopCategory};
pub use models::{
    Bill, BillRequest, Budget, BudgetRequest, BudgetType, Category, Expense, ExpenseFilter,
    ExpenseRequest, NewBill, NewBudget, NewExpense, PaymentMethod,
};
pub use store::{BillStore, BudgetStore, ExpenseStore, MemoryStore};
pub use window::{Window, WindowKind};
