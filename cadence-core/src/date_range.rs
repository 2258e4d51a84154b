//! Date range for materializing occurrences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed date range `[from, to]`, e.g. the dates visible in the current
/// calendar view. An inverted range (`from > to`) contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from, to }
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            from: date,
            to: date,
        }
    }

    /// Whether `date` falls inside the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}
