//! Bill status resolution
//!
//! A bill's lifecycle is derived from `paid_at`, `due_date` and the user's
//! local date; nothing here is persisted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Bill;

/// Days ahead of the due date during which a bill counts as due soon
pub const DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Upcoming,
    Paid,
    Overdue,
}

/// Presentation band for a bill's due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueBand {
    Paid,
    Overdue,
    DueSoon,
    Later,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
        }
    }
}

impl DueBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::DueSoon => "DUE_SOON",
            Self::Later => "LATER",
        }
    }
}

pub fn status(bill: &Bill, today: NaiveDate) -> BillStatus {
    if bill.paid_at.is_some() {
        BillStatus::Paid
    } else if bill.due_date < today {
        BillStatus::Overdue
    } else {
        BillStatus::Upcoming
    }
}

/// Signed days from `today` to the due date; negative once overdue
pub fn days_until_due(bill: &Bill, today: NaiveDate) -> i64 {
    (bill.due_date - today).num_days()
}

pub fn due_band(bill: &Bill, today: NaiveDate) -> DueBand {
    if bill.paid_at.is_some() {
        return DueBand::Paid;
    }
    match days_until_due(bill, today) {
        d if d < 0 => DueBand::Overdue,
        d if d <= DUE_SOON_DAYS => DueBand::DueSoon,
        _ => DueBand::Later,
    }
}

/// An unpaid bill is reminder-due from `due_date - reminder_days` onwards
pub fn reminder_due(bill: &Bill, today: NaiveDate) -> bool {
    bill.paid_at.is_none() && days_until_due(bill, today) <= i64::from(bill.reminder_days)
}

/// A bill together with its derived fields, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub status: BillStatus,
    pub days_until_due: i64,
    pub due_band: DueBand,
    pub reminder_due: bool,
}

impl BillView {
    pub fn new(bill: Bill, today: NaiveDate) -> Self {
        Self {
            status: status(&bill, today),
            days_until_due: days_until_due(&bill, today),
            due_band: due_band(&bill, today),
            reminder_due: reminder_due(&bill, today),
            bill,
        }
    }
}

/// Views for `bills`, ordered by due date then id
pub fn views(bills: Vec<Bill>, today: NaiveDate) -> Vec<BillView> {
    let mut views: Vec<_> = bills.into_iter().map(|b| BillView::new(b, today)).collect();
    views.sort_by_key(|v| (v.bill.due_date, v.bill.id));
    views
}

/// Unpaid bills inside their reminder window, soonest due first
pub fn reminders(bills: Vec<Bill>, today: NaiveDate) -> Vec<BillView> {
    views(bills, today)
        .into_iter()
        .filter(|v| v.reminder_due)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn bill(id: i64, due_in: i64) -> Bill {
        Bill {
            id,
            user_id: 1,
            bill_name: format!("Bill {}", id),
            amount: dec!(499),
            due_date: today() + chrono::Duration::days(due_in),
            reminder_days: 3,
            is_recurring: false,
            paid_at: None,
        }
    }

    #[test]
    fn test_due_today_is_upcoming_and_due_soon() {
        let b = bill(1, 0);
        assert_eq!(days_until_due(&b, today()), 0);
        assert_eq!(status(&b, today()), BillStatus::Upcoming);
        assert_eq!(due_band(&b, today()), DueBand::DueSoon);
    }

    #[test]
    fn test_due_two_days_ago_is_overdue() {
        let b = bill(1, -2);
        assert_eq!(status(&b, today()), BillStatus::Overdue);
        assert_eq!(days_until_due(&b, today()), -2);
        assert_eq!(due_band(&b, today()), DueBand::Overdue);
    }

    #[test]
    fn test_due_soon_boundary() {
        assert_eq!(due_band(&bill(1, 3), today()), DueBand::DueSoon);
        assert_eq!(due_band(&bill(1, 4), today()), DueBand::Later);
    }

    #[test]
    fn test_paid_overrides_everything() {
        let mut b = bill(1, -10);
        b.paid_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        assert_eq!(status(&b, today()), BillStatus::Paid);
        assert_eq!(due_band(&b, today()), DueBand::Paid);
        assert!(!reminder_due(&b, today()));
        assert_eq!(days_until_due(&b, today()), -10);
    }

    #[test]
    fn test_reminder_window() {
        let mut b = bill(1, 5);
        assert!(!reminder_due(&b, today()));
        b.reminder_days = 5;
        assert!(reminder_due(&b, today()));
        b.reminder_days = 0;
        assert!(!reminder_due(&b, today()));
        assert!(reminder_due(&bill(2, -1), today()));
    }

    #[test]
    fn test_reminders_sorted_by_due_date() {
        let bills = vec![bill(1, 2), bill(2, 30), bill(3, -1), bill(4, 2)];
        let due: Vec<i64> = reminders(bills, today()).iter().map(|v| v.bill.id).collect();
        assert_eq!(due, vec![3, 1, 4]);
    }

    #[test]
    fn test_view_serializes_flat() {
        let json = serde_json::to_value(BillView::new(bill(9, -2), today())).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["due_date"], "2024-03-12");
        assert_eq!(json["status"], "OVERDUE");
        assert_eq!(json["due_band"], "OVERDUE");
        assert_eq!(json["days_until_due"], -2);
        assert_eq!(json["amount"], 499.0);
    }
}
