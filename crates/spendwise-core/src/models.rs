//! Domain models for SpendWise

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::money;
use crate::window::{local_midnight, WindowKind};

/// Expense category. Declaration order is the fixed enumeration order used for
/// per-category iteration and tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Bills,
    Shopping,
    Healthcare,
    Education,
    Other,
}

impl Category {
    /// Every category, in enumeration order
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Bills,
        Self::Shopping,
        Self::Healthcare,
        Self::Education,
        Self::Other,
    ];

    /// Position in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Transport => "TRANSPORT",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Bills => "BILLS",
            Self::Shopping => "SHOPPING",
            Self::Healthcare => "HEALTHCARE",
            Self::Education => "EDUCATION",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Upi,
    Card,
    Wallet,
    NetBanking,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Upi => "UPI",
            Self::Card => "CARD",
            Self::Wallet => "WALLET",
            Self::NetBanking => "NET_BANKING",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "UPI" => Ok(Self::Upi),
            "CARD" => Ok(Self::Card),
            "WALLET" => Ok(Self::Wallet),
            "NET_BANKING" | "NETBANKING" => Ok(Self::NetBanking),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    Weekly,
    Monthly,
}

impl BudgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }

    /// The window a budget of this type is measured against
    pub fn window_kind(&self) -> WindowKind {
        match self {
            Self::Weekly => WindowKind::Week,
            Self::Monthly => WindowKind::Month,
        }
    }
}

impl std::str::FromStr for BudgetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            _ => Err(format!("Unknown budget type: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense. Immutable once created; only ever deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "money")]
    pub amount: Decimal,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub date_time: DateTime<Utc>,
}

/// A validated expense ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub date_time: DateTime<Utc>,
}

impl NewExpense {
    /// Convenience constructor for callers that already hold typed values
    pub fn new(amount: Decimal, category: Category, date_time: DateTime<Utc>) -> Self {
        Self {
            amount,
            category,
            payment_method: PaymentMethod::default(),
            note: None,
            date_time,
        }
    }
}

/// Raw expense input as received from the API or CLI
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    pub amount: Decimal,
    pub category: String,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    /// RFC 3339 instant, or a local `YYYY-MM-DD[THH:MM[:SS]]`
    pub date_time: Option<String>,
}

impl ExpenseRequest {
    /// Validate into a [`NewExpense`]. `date_time` defaults to `now`.
    pub fn validate(self, now: DateTime<Utc>, tz: Tz) -> Result<NewExpense> {
        let amount = money::validate_amount("amount", self.amount)?;
        let category = self
            .category
            .parse::<Category>()
            .map_err(|e| Error::validation("category", e))?;
        let payment_method = match self.payment_method.as_deref() {
            Some(pm) if !pm.trim().is_empty() => pm
                .parse::<PaymentMethod>()
                .map_err(|e| Error::validation("payment_method", e))?,
            _ => PaymentMethod::default(),
        };
        let date_time = match self.date_time.as_deref() {
            Some(s) if !s.trim().is_empty() => parse_instant("date_time", s, tz)?,
            _ => now,
        };
        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(NewExpense {
            amount,
            category,
            payment_method,
            note,
            date_time,
        })
    }
}

/// Optional filters for listing expenses. Dates are inclusive local dates.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<Category>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Half-open instant bounds covering the inclusive local date range
    pub fn bounds(&self, tz: Tz) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self.from.map(|d| local_midnight(tz, d));
        let end = self
            .to
            .and_then(|d| d.succ_opt())
            .map(|d| local_midnight(tz, d));
        (start, end)
    }

    pub fn matches(&self, expense: &Expense, tz: Tz) -> bool {
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }
        let (start, end) = self.bounds(tz);
        start.map_or(true, |s| expense.date_time >= s) && end.map_or(true, |e| expense.date_time < e)
    }
}

/// A budget record. Every set operation appends one; the newest per type is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub budget_type: BudgetType,
    #[serde(with = "money")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub budget_type: BudgetType,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetRequest {
    pub budget_type: String,
    pub amount: Decimal,
}

impl BudgetRequest {
    pub fn validate(self) -> Result<NewBudget> {
        let budget_type = self
            .budget_type
            .parse::<BudgetType>()
            .map_err(|e| Error::validation("budget_type", e))?;
        let amount = money::validate_amount("amount", self.amount)?;
        Ok(NewBudget {
            budget_type,
            amount,
        })
    }
}

/// A scheduled bill. Its status is derived, see [`crate::bills`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub user_id: i64,
    pub bill_name: String,
    #[serde(with = "money")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub reminder_days: u32,
    pub is_recurring: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub bill_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub reminder_days: u32,
    pub is_recurring: bool,
}

/// Default lead time for bill reminders
pub const DEFAULT_REMINDER_DAYS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct BillRequest {
    pub bill_name: String,
    pub amount: Decimal,
    pub due_date: String,
    pub reminder_days: Option<i64>,
    pub is_recurring: Option<bool>,
}

impl BillRequest {
    pub fn validate(self) -> Result<NewBill> {
        let bill_name = self.bill_name.trim().to_string();
        if bill_name.is_empty() {
            return Err(Error::validation("bill_name", "must not be empty"));
        }
        let amount = money::validate_amount("amount", self.amount)?;
        let due_date = parse_date("due_date", &self.due_date)?;
        let reminder_days = match self.reminder_days {
            None => DEFAULT_REMINDER_DAYS,
            Some(days) => u32::try_from(days)
                .map_err(|_| Error::validation("reminder_days", "must be zero or more"))?,
        };

        Ok(NewBill {
            bill_name,
            amount,
            due_date,
            reminder_days,
            is_recurring: self.is_recurring.unwrap_or(false),
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(field: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(field, format!("expected YYYY-MM-DD, got '{}'", s)))
}

/// Parse an instant. RFC 3339 strings carry their own offset; bare local
/// date-times and dates are interpreted in `tz`.
pub fn parse_instant(field: &str, s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| Error::validation(field, format!("'{}' does not exist in {}", s, tz)));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(local_midnight(tz, date));
    }

    Err(Error::validation(
        field,
        format!("expected an ISO-8601 timestamp, got '{}'", s),
    ))
}
