//! Date window for expansion.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EventideError, EventideResult};

/// Inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> EventideResult<Self> {
        if start > end {
            return Err(EventideError::InvalidWindow { start, end });
        }
        Ok(DateWindow { start, end })
    }

    /// Build a window from command-line style arguments.
    /// - `from`: YYYY-MM-DD, defaults to `today`
    /// - `to`: YYYY-MM-DD, defaults to `from + default_days`
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        default_days: i64,
    ) -> EventideResult<Self> {
        let start = match from {
            Some(s) => parse_date(s)?,
            None => today,
        };

        let end = match to {
            Some(s) => parse_date(s)?,
            None => Duration::try_days(default_days)
                .and_then(|span| start.checked_add_signed(span))
                .ok_or_else(|| EventideError::InvalidDate(format!("{start} + {default_days} days")))?,
        };

        DateWindow::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Intersect with `[from, until]` (`until` unbounded when None).
    /// Returns None when nothing overlaps.
    pub fn clamp_to(&self, from: NaiveDate, until: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.start.max(from);
        let end = match until {
            Some(until) => self.end.min(until),
            None => self.end,
        };
        (start <= end).then_some((start, end))
    }
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> EventideResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| EventideError::InvalidDate(format!("'{}'. Expected YYYY-MM-DD", s)))
}
