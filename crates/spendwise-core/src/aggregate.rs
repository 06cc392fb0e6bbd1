//! Aggregator: totals, counts and category rollups over one window

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{Category, Expense};
use crate::money;
use crate::window::Window;

/// Per-category totals. Always holds every category, iterated in the fixed
/// enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTotals([Decimal; 8]);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Decimal {
        self.0[category.index()]
    }

    pub fn add(&mut self, category: Category, amount: Decimal) {
        self.0[category.index()] += amount;
    }

    /// `(category, total)` pairs in enumeration order, zeros included
    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn sum(&self) -> Decimal {
        self.0.iter().copied().sum()
    }

    /// Non-zero categories ordered by total descending; ties keep enumeration order
    pub fn ranked(&self) -> Vec<(Category, Decimal)> {
        let mut ranked: Vec<_> = self.iter().filter(|(_, t)| !t.is_zero()).collect();
        // Stable sort preserves enumeration order among equal totals
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, total) in self.iter() {
            map.serialize_entry(category.as_str(), &money::Amount(total))?;
        }
        map.end()
    }
}

/// Derived totals for one window. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Aggregate {
    pub window: Window,
    #[serde(serialize_with = "money::serialize")]
    pub total: Decimal,
    pub count: usize,
    pub by_category: CategoryTotals,
}

impl Aggregate {
    /// The zero aggregate for `window`
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            total: Decimal::ZERO,
            count: 0,
            by_category: CategoryTotals::default(),
        }
    }

    /// Fold one expense in if it falls inside the window. Returns whether it counted.
    pub fn add(&mut self, expense: &Expense) -> bool {
        if !self.window.contains(expense.date_time) {
            return false;
        }
        self.total += expense.amount;
        self.count += 1;
        self.by_category.add(expense.category, expense.amount);
        true
    }
}

/// Aggregate the expenses that fall inside `window`.
///
/// Input order does not matter and expenses outside the window are skipped,
/// so callers can pass a superset fetched for several windows at once.
pub fn aggregate<'a, I>(expenses: I, window: Window) -> Aggregate
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut agg = Aggregate::empty(window);
    for expense in expenses {
        agg.add(expense);
    }
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::window::{resolve, WindowKind};
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn expense(id: i64, amount: Decimal, category: Category, date_time: DateTime<Utc>) -> Expense {
        Expense {
            id,
            user_id: 1,
            amount,
            category,
            payment_method: PaymentMethod::Cash,
            note: None,
            date_time,
        }
    }

    /// Mon 11th, Wed 13th, Thu 14th March 2024, plus one the week before
    fn sample() -> Vec<Expense> {
        vec![
            expense(1, dec!(100), Category::Food, at(11, 9)),
            expense(2, dec!(50), Category::Food, at(13, 13)),
            expense(3, dec!(200), Category::Transport, at(14, 18)),
            expense(4, dec!(75.25), Category::Shopping, at(8, 10)),
        ]
    }

    fn week() -> Window {
        resolve(WindowKind::Week, at(14, 12), Tz::UTC)
    }

    #[test]
    fn test_week_scenario() {
        let agg = aggregate(&sample(), week());
        assert_eq!(agg.total, dec!(350));
        assert_eq!(agg.count, 3);
        assert_eq!(agg.by_category.get(Category::Food), dec!(150));
        assert_eq!(agg.by_category.get(Category::Transport), dec!(200));
        assert_eq!(agg.by_category.get(Category::Shopping), Decimal::ZERO);
        assert_eq!(agg.by_category.iter().count(), 8);
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[], week());
        assert_eq!(agg.total, Decimal::ZERO);
        assert_eq!(agg.count, 0);
        assert!(agg.by_category.iter().all(|(_, t)| t.is_zero()));
    }

    #[test]
    fn test_category_sum_equals_total_exactly() {
        let mut expenses = Vec::new();
        // Amounts that drift under binary floating point
        for (i, category) in Category::ALL.iter().enumerate() {
            for j in 0..10 {
                expenses.push(expense(
                    (i * 10 + j) as i64,
                    dec!(0.1) + Decimal::new(j as i64, 2),
                    *category,
                    at(12, 1 + j as u32),
                ));
            }
        }
        let agg = aggregate(&expenses, week());
        assert_eq!(agg.count, 80);
        assert_eq!(agg.by_category.sum(), agg.total);
    }

    #[test]
    fn test_additivity_and_locality() {
        let base = sample();
        let before = aggregate(&base, week());

        let mut inside = base.clone();
        inside.push(expense(10, dec!(12.34), Category::Healthcare, at(15, 8)));
        assert_eq!(aggregate(&inside, week()).total, before.total + dec!(12.34));

        let mut outside = base.clone();
        outside.push(expense(11, dec!(12.34), Category::Food, at(18, 0)));
        assert_eq!(aggregate(&outside, week()).total, before.total);
    }

    #[test]
    fn test_removal_leaves_no_residue() {
        let all = sample();
        let without: Vec<_> = all.iter().filter(|e| e.id != 2).cloned().collect();
        let agg = aggregate(&without, week());
        assert_eq!(agg.total, dec!(300));
        assert_eq!(agg.by_category.get(Category::Food), dec!(100));
    }

    #[test]
    fn test_order_independent() {
        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(aggregate(&reversed, week()), aggregate(&sample(), week()));
    }

    #[test]
    fn test_ranked_ties_follow_enumeration_order() {
        let expenses = vec![
            expense(1, dec!(40), Category::Shopping, at(12, 9)),
            expense(2, dec!(40), Category::Transport, at(12, 10)),
            expense(3, dec!(90), Category::Other, at(12, 11)),
        ];
        let ranked = aggregate(&expenses, week()).by_category.ranked();
        assert_eq!(
            ranked.iter().map(|(c, _)| *c).collect::<Vec<_>>(),
            vec![Category::Other, Category::Transport, Category::Shopping]
        );
    }

    #[test]
    fn test_serializes_every_category_in_order() {
        let json = serde_json::to_string(&aggregate(&sample(), week()).by_category).unwrap();
        assert!(json.starts_with("{\"FOOD\":150.0,\"TRANSPORT\":200.0,\"ENTERTAINMENT\":0.0"));
        assert!(json.ends_with("\"OTHER\":0.0}"));
    }
}
