//! Per-request session context and engine configuration
//!
//! Every engine call receives an explicit [`UserContext`] instead of reading
//! ambient state: which user, what "now" is, and which timezone windows are
//! laid out in.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::window::{self, Window, WindowKind};

/// Environment variable naming the reporting timezone (IANA name)
pub const TZ_ENV: &str = "SPENDWISE_TZ";

/// Environment variable overriding the number of weeks the forecast averages
pub const FORECAST_WEEKS_ENV: &str = "SPENDWISE_FORECAST_WEEKS";

/// Default number of completed weeks the forecast averages over
pub const DEFAULT_FORECAST_WEEKS: usize = 4;

/// Upper bound on the forecast history (ten years of weeks)
pub const MAX_FORECAST_WEEKS: usize = 520;

/// True when `weeks` is a usable forecast history length
pub fn valid_forecast_weeks(weeks: usize) -> bool {
    (1..=MAX_FORECAST_WEEKS).contains(&weeks)
}

/// Engine-wide settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Reporting timezone used to lay out windows
    pub timezone: Tz,
    /// Completed weeks the moving-average forecast looks back over
    pub forecast_weeks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            forecast_weeks: DEFAULT_FORECAST_WEEKS,
        }
    }
}

impl EngineConfig {
    /// Read overrides from `SPENDWISE_TZ` and `SPENDWISE_FORECAST_WEEKS`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var(TZ_ENV) {
            match parse_timezone(&name) {
                Some(tz) => config.timezone = tz,
                None => warn!(value = %name, "Ignoring unknown {}", TZ_ENV),
            }
        }

        if let Ok(weeks) = std::env::var(FORECAST_WEEKS_ENV) {
            match weeks.trim().parse::<usize>() {
                Ok(n) if valid_forecast_weeks(n) => config.forecast_weeks = n,
                _ => warn!(value = %weeks, "Ignoring invalid {}", FORECAST_WEEKS_ENV),
            }
        }

        config
    }

    /// Build a context for `user_id` at the current instant
    pub fn context(&self, user_id: i64) -> UserContext {
        UserContext::new(user_id, Utc::now(), self.timezone)
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Who is asking, and when
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserContext {
    pub user_id: i64,
    pub now: DateTime<Utc>,
    pub tz: Tz,
}

impl UserContext {
    pub fn new(user_id: i64, now: DateTime<Utc>, tz: Tz) -> Self {
        Self { user_id, now, tz }
    }

    /// The user's local calendar date at `now`
    pub fn today(&self) -> NaiveDate {
        window::local_date(self.now, self.tz)
    }

    /// The window of `kind` containing `now`
    pub fn window(&self, kind: WindowKind) -> Window {
        window::resolve(kind, self.now, self.tz)
    }
}
