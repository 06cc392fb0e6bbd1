//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod bills;
pub mod budgets;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod insights;

// Re-export all handlers for use in router
pub use bills::*;
pub use budgets::*;
pub use dashboard::*;
pub use expenses::*;
pub use health::*;
pub use insights::*;
