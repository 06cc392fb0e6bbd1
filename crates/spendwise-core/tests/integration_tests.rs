//! Integration tests for spendwise-core
//!
//! These tests exercise the full record → dashboard → delete → insights
//! workflow against the SQLite store.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spendwise_core::{
    bills::{self, BillStatus, DueBand},
    budget::ConsumptionState,
    dashboard, BillRequest, BillStore, BudgetRequest, BudgetStore, BudgetType, Category,
    Database, ExpenseRequest, ExpenseStore, InsightEngine, TopCategory, UserContext,
};

/// Thursday 14th March 2024, 20:00 UTC
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 20, 0, 0).unwrap()
}

fn ctx() -> UserContext {
    UserContext::new(1, now(), Tz::UTC)
}

fn record(db: &Database, user_id: i64, amount: Decimal, category: &str, date_time: &str) -> i64 {
    let request = ExpenseRequest {
        amount,
        category: category.to_string(),
        payment_method: Some("UPI".to_string()),
        note: None,
        date_time: Some(date_time.to_string()),
    };
    let new = request.validate(now(), Tz::UTC).expect("valid expense");
    db.add_expense(user_id, &new).expect("insert expense").id
}

// =============================================================================
// Dashboard and budget workflow
// =============================================================================

#[test]
fn test_week_scenario_end_to_end() {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    record(&db, 1, dec!(100), "FOOD", "2024-03-11T09:00:00Z");
    let lunch = record(&db, 1, dec!(50), "food", "2024-03-13T13:00:00Z");
    record(&db, 1, dec!(200), "TRANSPORT", "2024-03-14T18:00:00Z");
    // Someone else's spending
    record(&db, 2, dec!(5000), "SHOPPING", "2024-03-14T10:00:00Z");

    let weekly = BudgetRequest {
        budget_type: "WEEKLY".to_string(),
        amount: dec!(300),
    }
    .validate()
    .unwrap();
    db.set_budget(1, &weekly, now() - Duration::days(20)).unwrap();

    let d = dashboard::dashboard(&db, &ctx()).unwrap();
    assert_eq!(d.week_total, dec!(350));
    assert_eq!(d.week_count, 3);
    assert_eq!(d.today_total, dec!(200));

    let status = &d.budget_status[&BudgetType::Weekly];
    assert_eq!(status.percentage, dec!(116.67));
    assert_eq!(status.status, ConsumptionState::Exceeded);

    // Deleting an expense leaves no residue in later aggregates
    db.delete_expense(1, lunch).unwrap();
    let d = dashboard::dashboard(&db, &ctx()).unwrap();
    assert_eq!(d.week_total, dec!(300));
    assert_eq!(d.week_count, 2);
    let status = &d.budget_status[&BudgetType::Weekly];
    assert_eq!(status.percentage, dec!(100));
    assert_eq!(status.status, ConsumptionState::Within);
    assert_eq!(status.remaining, Decimal::ZERO);
}

#[test]
fn test_category_totals_sum_to_month_total() {
    let db = Database::in_memory().unwrap();
    let amounts = [dec!(0.10), dec!(0.20), dec!(0.30), dec!(19.99), dec!(0.01)];
    for (i, category) in Category::ALL.iter().enumerate() {
        for (j, amount) in amounts.iter().enumerate() {
            let when = format!("2024-03-{:02}T{:02}:00:00Z", 1 + i, 1 + j);
            record(&db, 1, *amount, category.as_str(), &when);
        }
    }

    let d = dashboard::dashboard(&db, &ctx()).unwrap();
    let sum: Decimal = d.categories.iter().map(|c| c.total).sum();
    assert_eq!(sum, d.month_total);
    assert_eq!(d.month_count, 40);
    assert_eq!(d.categories.len(), 8);
}

// =============================================================================
// Insights
// =============================================================================

#[test]
fn test_insights_over_several_weeks() {
    let db = Database::in_memory().unwrap();

    // Four completed weeks before the week of 11th March
    record(&db, 1, dec!(80), "FOOD", "2024-02-13T12:00:00Z");
    record(&db, 1, dec!(120), "FOOD", "2024-02-20T12:00:00Z");
    record(&db, 1, dec!(60), "ENTERTAINMENT", "2024-02-28T12:00:00Z");
    record(&db, 1, dec!(140), "FOOD", "2024-03-05T12:00:00Z");
    // This week
    record(&db, 1, dec!(90), "TRANSPORT", "2024-03-12T12:00:00Z");

    let insights = InsightEngine::default().insights(&db, &ctx()).unwrap();

    // March so far: FOOD 140, TRANSPORT 90
    assert_eq!(insights.top_category, TopCategory::Category(Category::Food));
    assert_eq!(insights.top_category_amount, dec!(140));
    assert_eq!(insights.week_comparison, dec!(-50));

    // (80 + 120 + 60 + 140) / 4
    assert_eq!(insights.predictions.next_week_total, dec!(100));
    assert_eq!(
        insights.predictions.category_breakdown[&Category::Food],
        dec!(85)
    );
    assert_eq!(
        insights.predictions.category_breakdown[&Category::Entertainment],
        dec!(15)
    );
    assert!(!insights
        .predictions
        .category_breakdown
        .contains_key(&Category::Transport));
}

#[test]
fn test_new_user_insights() {
    let db = Database::in_memory().unwrap();
    let insights = InsightEngine::default().insights(&db, &ctx()).unwrap();

    assert_eq!(insights.top_category, TopCategory::NoData);
    assert_eq!(insights.predictions.next_week_total, Decimal::ZERO);
    assert!(insights.predictions.category_breakdown.is_empty());
}

// =============================================================================
// Bills
// =============================================================================

#[test]
fn test_bill_statuses_and_reminders() {
    let db = Database::in_memory().unwrap();
    let today = ctx().today();

    let add = |name: &str, due: NaiveDate| {
        let bill = BillRequest {
            bill_name: name.to_string(),
            amount: dec!(499),
            due_date: due.format("%Y-%m-%d").to_string(),
            reminder_days: None,
            is_recurring: None,
        }
        .validate()
        .unwrap();
        db.add_bill(1, &bill).unwrap()
    };

    let overdue = add("Gym", today - Duration::days(2));
    let due_today = add("Phone", today);
    let later = add("Insurance", today + Duration::days(20));
    let paid = add("Rent", today - Duration::days(1));
    db.mark_bill_paid(1, paid.id, now()).unwrap();

    let views = bills::views(db.list_bills(1).unwrap(), today);
    let find = |id: i64| views.iter().find(|v| v.bill.id == id).unwrap();

    assert_eq!(find(overdue.id).status, BillStatus::Overdue);
    assert_eq!(find(overdue.id).days_until_due, -2);
    assert_eq!(find(due_today.id).status, BillStatus::Upcoming);
    assert_eq!(find(due_today.id).due_band, DueBand::DueSoon);
    assert_eq!(find(later.id).due_band, DueBand::Later);
    assert_eq!(find(paid.id).status, BillStatus::Paid);

    let reminders: Vec<i64> = bills::reminders(db.list_bills(1).unwrap(), today)
        .iter()
        .map(|v| v.bill.id)
        .collect();
    assert_eq!(reminders, vec![overdue.id, due_today.id]);
}
