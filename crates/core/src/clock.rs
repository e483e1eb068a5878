//! Simulated calendar clock.
//!
//! Dates have day granularity and use the `YYYY-MM-DD` text format.

use crate::{Error, Result};
use chrono::{Days, Local, NaiveDate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Date format used for parsing and display.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidArgument(format!("Invalid date '{}': {}", text, e)))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Source of the real-world date used to seed the simulated clock.
pub trait ClockSource {
    /// Returns the current date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local system calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl ClockSource for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The simulated date. Only moves forward, by whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimClock {
    current: NaiveDate,
}

impl SimClock {
    /// Creates a clock starting at `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { current: date }
    }

    /// Creates a clock starting at the source's current date.
    pub fn from_source(source: &dyn ClockSource) -> Self {
        Self::new(source.today())
    }

    /// Returns the simulated date.
    pub fn today(&self) -> NaiveDate {
        self.current
    }

    /// Computes the date `days` after the current one without moving the clock.
    ///
    /// Fails with [`Error::InvalidArgument`] if `days` is not positive or the
    /// result is out of the calendar's range.
    pub fn advanced_by(&self, days: i64) -> Result<NaiveDate> {
        if days <= 0 {
            return Err(Error::InvalidArgument(format!(
                "Days to advance must be positive, got {}",
                days
            )));
        }
        let days = u64::try_from(days)
            .map_err(|_| Error::InvalidArgument(format!("Day count {} out of range", days)))?;
        self.current
            .checked_add_days(Days::new(days))
            .ok_or_else(|| Error::InvalidArgument(format!("Advancing {} days overflows", days)))
    }

    /// Moves the clock to `date`. Earlier dates are rejected.
    pub fn set(&mut self, date: NaiveDate) -> Result<()> {
        if date < self.current {
            return Err(Error::InvalidArgument(format!(
                "Cannot move clock back from {} to {}",
                format_date(self.current),
                format_date(date)
            )));
        }
        self.current = date;
        Ok(())
    }
}
