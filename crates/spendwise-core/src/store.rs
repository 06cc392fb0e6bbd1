//! Storage contracts for expenses, budgets and bills
//!
//! The engine only ever talks to these traits. [`crate::db::Database`] is the
//! SQLite implementation; [`MemoryStore`] keeps everything in process.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::budget;
use crate::error::{Error, Result};
use crate::models::{Bill, Budget, Expense, ExpenseFilter, NewBill, NewBudget, NewExpense};

pub trait ExpenseStore {
    fn add_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense>;

    /// Expenses matching `filter`, newest first
    fn list_expenses(&self, user_id: i64, filter: &ExpenseFilter, tz: Tz) -> Result<Vec<Expense>>;

    /// Expenses with `start <= date_time < end`
    fn expenses_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>>;

    /// Instant of the user's earliest expense
    fn first_expense_at(&self, user_id: i64) -> Result<Option<DateTime<Utc>>>;

    /// Hard delete. `NotFound` if the user has no such expense.
    fn delete_expense(&self, user_id: i64, id: i64) -> Result<()>;
}

pub trait BudgetStore {
    /// Append a budget record; the newest per type becomes active
    fn set_budget(
        &self,
        user_id: i64,
        budget: &NewBudget,
        created_at: DateTime<Utc>,
    ) -> Result<Budget>;

    /// Every budget record for the user, newest first
    fn budget_history(&self, user_id: i64) -> Result<Vec<Budget>>;

    /// The active budget per type
    fn active_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let history = self.budget_history(user_id)?;
        Ok(budget::active_budgets(&history)
            .into_values()
            .cloned()
            .collect())
    }
}

pub trait BillStore {
    fn add_bill(&self, user_id: i64, bill: &NewBill) -> Result<Bill>;

    /// Bills ordered by due date
    fn list_bills(&self, user_id: i64) -> Result<Vec<Bill>>;

    fn get_bill(&self, user_id: i64, id: i64) -> Result<Bill>;

    /// Record payment. Paying an already paid bill keeps the first `paid_at`.
    fn mark_bill_paid(&self, user_id: i64, id: i64, paid_at: DateTime<Utc>) -> Result<Bill>;

    fn delete_bill(&self, user_id: i64, id: i64) -> Result<()>;
}

#[derive(Debug, Default)]
struct Tables {
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
    bills: Vec<Bill>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store backed by vectors behind a lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::InvalidData("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::InvalidData("memory store lock poisoned".to_string()))
    }
}

fn newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date_time.cmp(&a.date_time).then(b.id.cmp(&a.id)));
}

impl ExpenseStore for MemoryStore {
    fn add_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        let mut tables = self.write()?;
        let expense = Expense {
            id: tables.next_id(),
            user_id,
            amount: expense.amount,
            category: expense.category,
            payment_method: expense.payment_method,
            note: expense.note.clone(),
            date_time: expense.date_time,
        };
        tables.expenses.push(expense.clone());
        Ok(expense)
    }

    fn list_expenses(&self, user_id: i64, filter: &ExpenseFilter, tz: Tz) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .read()?
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e, tz))
            .cloned()
            .collect();
        newest_first(&mut expenses);
        Ok(expenses)
    }

    fn expenses_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id && start <= e.date_time && e.date_time < end)
            .cloned()
            .collect())
    }

    fn first_expense_at(&self, user_id: i64) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.date_time)
            .min())
    }

    fn delete_expense(&self, user_id: i64, id: i64) -> Result<()> {
        let mut tables = self.write()?;
        let before = tables.expenses.len();
        tables
            .expenses
            .retain(|e| !(e.id == id && e.user_id == user_id));
        if tables.expenses.len() == before {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        Ok(())
    }
}

impl BudgetStore for MemoryStore {
    fn set_budget(
        &self,
        user_id: i64,
        budget: &NewBudget,
        created_at: DateTime<Utc>,
    ) -> Result<Budget> {
        let mut tables = self.write()?;
        let budget = Budget {
            id: tables.next_id(),
            user_id,
            budget_type: budget.budget_type,
            amount: budget.amount,
            created_at,
        };
        tables.budgets.push(budget.clone());
        Ok(budget)
    }

    fn budget_history(&self, user_id: i64) -> Result<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .read()?
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(budgets)
    }
}

impl BillStore for MemoryStore {
    fn add_bill(&self, user_id: i64, bill: &NewBill) -> Result<Bill> {
        let mut tables = self.write()?;
        let bill = Bill {
            id: tables.next_id(),
            user_id,
            bill_name: bill.bill_name.clone(),
            amount: bill.amount,
            due_date: bill.due_date,
            reminder_days: bill.reminder_days,
            is_recurring: bill.is_recurring,
            paid_at: None,
        };
        tables.bills.push(bill.clone());
        Ok(bill)
    }

    fn list_bills(&self, user_id: i64) -> Result<Vec<Bill>> {
        let mut bills: Vec<Bill> = self
            .read()?
            .bills
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bills.sort_by_key(|b| (b.due_date, b.id));
        Ok(bills)
    }

    fn get_bill(&self, user_id: i64, id: i64) -> Result<Bill> {
        self.read()?
            .bills
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Bill {}", id)))
    }

    fn mark_bill_paid(&self, user_id: i64, id: i64, paid_at: DateTime<Utc>) -> Result<Bill> {
        let mut tables = self.write()?;
        let bill = tables
            .bills
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
            .ok_or_else(|| Error::NotFound(format!("Bill {}", id)))?;
        bill.paid_at.get_or_insert(paid_at);
        Ok(bill.clone())
    }

    fn delete_bill(&self, user_id: i64, id: i64) -> Result<()> {
        let mut tables = self.write()?;
        let before = tables.bills.len();
        tables.bills.retain(|b| !(b.id == id && b.user_id == user_id));
        if tables.bills.len() == before {
            return Err(Error::NotFound(format!("Bill {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetType, Category};
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_expenses_scoped_by_user() {
        let store = MemoryStore::new();
        let mine = store
            .add_expense(1, &NewExpense::new(dec!(10), Category::Food, at(1)))
            .unwrap();
        store
            .add_expense(2, &NewExpense::new(dec!(20), Category::Food, at(2)))
            .unwrap();

        assert_eq!(
            store.list_expenses(1, &ExpenseFilter::default(), Tz::UTC).unwrap(),
            vec![mine.clone()]
        );
        assert_eq!(store.first_expense_at(1).unwrap(), Some(at(1)));
        assert_eq!(store.first_expense_at(3).unwrap(), None);

        // Wrong user cannot delete
        assert!(matches!(
            store.delete_expense(2, mine.id),
            Err(Error::NotFound(_))
        ));
        store.delete_expense(1, mine.id).unwrap();
        assert!(matches!(
            store.delete_expense(1, mine.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first_with_filter() {
        let store = MemoryStore::new();
        for (day, category) in [(3, Category::Food), (9, Category::Transport), (6, Category::Food)] {
            store
                .add_expense(1, &NewExpense::new(dec!(5), category, at(day)))
                .unwrap();
        }

        let all = store.list_expenses(1, &ExpenseFilter::default(), Tz::UTC).unwrap();
        let days: Vec<_> = all.iter().map(|e| e.date_time).collect();
        assert_eq!(days, vec![at(9), at(6), at(3)]);

        let filter = ExpenseFilter {
            category: Some(Category::Food),
            from: None,
            to: NaiveDate::from_ymd_opt(2024, 3, 5),
        };
        let food = store.list_expenses(1, &filter, Tz::UTC).unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].date_time, at(3));

        let between = store.expenses_between(1, at(3), at(9)).unwrap();
        assert_eq!(between.len(), 2);
    }

    #[test]
    fn test_budget_history_and_active() {
        let store = MemoryStore::new();
        let weekly = |amount| NewBudget {
            budget_type: BudgetType::Weekly,
            amount,
        };
        store.set_budget(1, &weekly(dec!(100)), at(1)).unwrap();
        let latest = store.set_budget(1, &weekly(dec!(250)), at(5)).unwrap();

        let history = store.budget_history(1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], latest);

        assert_eq!(store.active_budgets(1).unwrap(), vec![latest]);
        assert!(store.active_budgets(2).unwrap().is_empty());
    }

    #[test]
    fn test_bill_payment_is_idempotent() {
        let store = MemoryStore::new();
        let bill = store
            .add_bill(
                1,
                &NewBill {
                    bill_name: "Internet".into(),
                    amount: dec!(799),
                    due_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
                    reminder_days: 3,
                    is_recurring: true,
                },
            )
            .unwrap();

        let paid = store.mark_bill_paid(1, bill.id, at(10)).unwrap();
        assert_eq!(paid.paid_at, Some(at(10)));
        let again = store
            .mark_bill_paid(1, bill.id, at(10) + Duration::days(1))
            .unwrap();
        assert_eq!(again.paid_at, Some(at(10)));

        assert!(matches!(store.get_bill(2, bill.id), Err(Error::NotFound(_))));
        store.delete_bill(1, bill.id).unwrap();
        assert!(store.list_bills(1).unwrap().is_empty());
    }
}
