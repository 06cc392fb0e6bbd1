//! Spending forecasters
//!
//! A [`Forecaster`] projects next week's spending from the totals of recent
//! completed weeks. The engine decides which weeks count as history; the
//! forecaster only combines them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::aggregate::Aggregate;
use crate::models::Category;
use crate::money;

use super::types::Predictions;

/// Strategy for projecting the next period from past periods
pub trait Forecaster: Send + Sync {
    /// Short identifier, used in logs
    fn name(&self) -> &'static str;

    /// Forecast the next value of `history` (most recent first).
    /// An empty history forecasts zero.
    fn forecast_series(&self, history: &[Decimal]) -> Decimal;

    /// Forecast total and per-category spending from weekly aggregates
    fn forecast(&self, history: &[Aggregate]) -> Predictions {
        let totals: Vec<Decimal> = history.iter().map(|a| a.total).collect();

        let mut category_breakdown = BTreeMap::new();
        for category in Category::ALL {
            let series: Vec<Decimal> = history
                .iter()
                .map(|a| a.by_category.get(category))
                .collect();
            let projected = self.forecast_series(&series);
            if !projected.is_zero() {
                category_breakdown.insert(category, projected);
            }
        }

        Predictions {
            next_week_total: self.forecast_series(&totals),
            category_breakdown,
        }
    }
}

/// Arithmetic mean of the history, rounded to cents
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverage;

impl Forecaster for MovingAverage {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn forecast_series(&self, history: &[Decimal]) -> Decimal {
        if history.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = history.iter().copied().sum();
        money::round_cents(sum / Decimal::from(history.len()))
    }
}
