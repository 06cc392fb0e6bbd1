//! Time-window resolution
//!
//! Windows are half-open `[start, end)` intervals laid out on the user's
//! reporting timezone calendar: days start at local midnight, weeks on Monday,
//! months on the 1st. Boundaries are stored as UTC instants so they compare
//! directly with expense timestamps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Granularity of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowKind {
    Day,
    Week,
    Month,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
        }
    }
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved half-open interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub kind: WindowKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The adjacent earlier window of the same kind
    pub fn previous(&self, tz: Tz) -> Window {
        resolve(self.kind, self.start - Duration::seconds(1), tz)
    }

    /// The adjacent later window of the same kind
    #[cfg(test)]
    pub fn next(&self, tz: Tz) -> Window {
        resolve(self.kind, self.end, tz)
    }

    /// The window of the same kind whose start lies `n` calendar weeks away.
    /// Negative `n` moves back in time.
    pub fn shifted_weeks(&self, n: i64, tz: Tz) -> Window {
        let date = local_date(self.start, tz) + Duration::weeks(n);
        resolve(self.kind, local_midnight(tz, date), tz)
    }

    /// The `count` windows immediately before this one, most recent first
    pub fn preceding(&self, count: usize, tz: Tz) -> Vec<Window> {
        let mut windows = Vec::with_capacity(count);
        let mut current = *self;
        for _ in 0..count {
            current = current.previous(tz);
            windows.push(current);
        }
        windows
    }
}

/// Resolve the window of `kind` containing `reference` in `tz`.
///
/// Pure: the same inputs always produce the same window.
pub fn resolve(kind: WindowKind, reference: DateTime<Utc>, tz: Tz) -> Window {
    let date = local_date(reference, tz);

    let (first, next) = match kind {
        WindowKind::Day => (date, date + Duration::days(1)),
        WindowKind::Week => {
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(7))
        }
        WindowKind::Month => {
            let first = date.with_day(1).unwrap_or(date);
            (first, first_of_next_month(first))
        }
    };

    Window {
        kind,
        start: local_midnight(tz, first),
        end: local_midnight(tz, next),
    }
}

/// Calendar date of `instant` in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// The first instant of `date` in `tz`.
///
/// When midnight does not exist (a DST gap), the first valid local minute of
/// the day is used instead.
pub fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    // Gaps are at most a few hours long
    for minutes in 0..=(4 * 60) {
        let candidate = midnight + Duration::minutes(minutes);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
    }

    midnight.and_utc()
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first + Duration::days(31))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_day_window() {
        let w = resolve(WindowKind::Day, utc(2024, 3, 14, 15, 30), Tz::UTC);
        assert_eq!(w.start, utc(2024, 3, 14, 0, 0));
        assert_eq!(w.end, utc(2024, 3, 15, 0, 0));
        assert_eq!(w.end - w.start, Duration::hours(24));
    }

    #[test]
    fn test_week_starts_monday() {
        // 2024-03-14 is a Thursday
        let w = resolve(WindowKind::Week, utc(2024, 3, 14, 15, 30), Tz::UTC);
        assert_eq!(w.start, utc(2024, 3, 11, 0, 0));
        assert_eq!(w.end, utc(2024, 3, 18, 0, 0));

        // Monday midnight belongs to the week it starts
        let w2 = resolve(WindowKind::Week, utc(2024, 3, 18, 0, 0), Tz::UTC);
        assert_eq!(w2.start, utc(2024, 3, 18, 0, 0));

        // Sunday night belongs to the previous week
        let w3 = resolve(WindowKind::Week, utc(2024, 3, 17, 23, 59), Tz::UTC);
        assert_eq!(w3, w);
    }

    #[test]
    fn test_month_window_handles_year_end() {
        let w = resolve(WindowKind::Month, utc(2023, 12, 31, 23, 0), Tz::UTC);
        assert_eq!(w.start, utc(2023, 12, 1, 0, 0));
        assert_eq!(w.end, utc(2024, 1, 1, 0, 0));

        let feb = resolve(WindowKind::Month, utc(2024, 2, 10, 0, 0), Tz::UTC);
        assert_eq!(feb.end, utc(2024, 3, 1, 0, 0));
    }

    #[test]
    fn test_half_open_membership() {
        let w = resolve(WindowKind::Day, utc(2024, 3, 14, 12, 0), Tz::UTC);
        assert!(w.contains(w.start));
        assert!(!w.contains(w.end));
        assert!(w.contains(w.end - Duration::seconds(1)));
    }

    #[test]
    fn test_windows_follow_reporting_timezone() {
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        // 20:00 UTC on the 14th is 01:30 on the 15th in Kolkata
        let w = resolve(WindowKind::Day, utc(2024, 3, 14, 20, 0), tz);
        assert_eq!(w.start, utc(2024, 3, 14, 18, 30));
        assert_eq!(w.end, utc(2024, 3, 15, 18, 30));
    }

    #[test]
    fn test_dst_day_is_not_24_hours() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // DST started 2024-03-10 at 02:00 local
        let w = resolve(WindowKind::Day, utc(2024, 3, 10, 12, 0), tz);
        assert_eq!(w.end - w.start, Duration::hours(23));
        assert_eq!(w.next(tz).start, w.end);
    }

    #[test]
    fn test_midnight_in_dst_gap() {
        // Chile moved clocks forward at local midnight on 2023-09-03
        let tz: Tz = "America/Santiago".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 9, 3).unwrap();
        let start = local_midnight(tz, date);
        assert_eq!(local_date(start, tz), date);
        assert!(start > local_midnight(tz, date.pred_opt().unwrap()));
    }

    #[test]
    fn test_previous_and_preceding() {
        let w = resolve(WindowKind::Week, utc(2024, 3, 14, 9, 0), Tz::UTC);
        let prev = w.previous(Tz::UTC);
        assert_eq!(prev.start, utc(2024, 3, 4, 0, 0));
        assert_eq!(prev.end, w.start);
        assert_eq!(
            prev,
            resolve(WindowKind::Week, utc(2024, 3, 14, 9, 0) - Duration::days(7), Tz::UTC)
        );

        let history = w.preceding(4, Tz::UTC);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], prev);
        assert_eq!(history[3].start, utc(2024, 2, 12, 0, 0));
        for pair in history.windows(2) {
            assert_eq!(pair[1].end, pair[0].start);
        }
    }

    #[test]
    fn test_shifted_weeks_across_dst() {
        let tz: Tz = "Europe/London".parse().unwrap();
        // Clocks went forward on Sunday 2024-03-31
        let w = resolve(WindowKind::Week, utc(2024, 4, 3, 12, 0), tz);
        let back = w.shifted_weeks(-1, tz);
        assert_eq!(back, w.previous(tz));
        assert_eq!(back.end, w.start);
        assert_eq!(back.end - back.start, Duration::hours(7 * 24 - 1));
        assert_eq!(back.shifted_weeks(1, tz), w);
        assert_eq!(w.shifted_weeks(-4, tz), w.preceding(4, tz)[3]);
    }

    #[test]
    fn test_each_instant_in_exactly_one_window() {
        let tz: Tz = "Europe/London".parse().unwrap();
        let instant = utc(2024, 3, 31, 0, 30);
        for kind in [WindowKind::Day, WindowKind::Week, WindowKind::Month] {
            let w = resolve(kind, instant, tz);
            assert!(w.contains(instant));
            assert!(!w.previous(tz).contains(instant));
            assert!(!w.next(tz).contains(instant));
        }
    }
}
