//! Core types for the Insight Engine

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::budget::BudgetStatus;
use crate::models::{BudgetType, Category};
use crate::money;

/// Placeholder shown when the current month has no spending
pub const NO_DATA: &str = "No data";

/// The month's largest category, or nothing when there was no spending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopCategory {
    Category(Category),
    NoData,
}

impl TopCategory {
    pub fn category(&self) -> Option<Category> {
        match self {
            TopCategory::Category(c) => Some(*c),
            TopCategory::NoData => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopCategory::Category(c) => c.as_str(),
            TopCategory::NoData => NO_DATA,
        }
    }
}

impl fmt::Display for TopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TopCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Next-week spending forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Predictions {
    #[serde(with = "money")]
    pub next_week_total: Decimal,
    /// Non-zero per-category forecasts in enumeration order
    #[serde(serialize_with = "money::serialize_map")]
    pub category_breakdown: BTreeMap<Category, Decimal>,
}

/// Insights payload for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub top_category: TopCategory,
    #[serde(with = "money")]
    pub top_category_amount: Decimal,
    /// Current week total minus previous week total (signed)
    #[serde(with = "money")]
    pub week_comparison: Decimal,
    pub predictions: Predictions,
    /// Adherence of each active budget, with any overspend
    pub budget_status: BTreeMap<BudgetType, BudgetStatus>,
}
