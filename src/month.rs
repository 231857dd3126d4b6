//! Calendar months used to key monthly spend and budget alerts.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// A validated year and month, e.g. 2025-10.
///
/// Internally this is the first day of the month, so any `YearMonth` maps to a
/// representable [Date].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(Date);

impl YearMonth {
    /// Create a month from a year and a month number in `1..=12`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `month` is out of range or the year
    /// cannot be represented.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(format!("{year}-{month:02}"));

        let month = Month::try_from(month).map_err(|_| invalid())?;
        let first_day = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;

        Ok(Self(first_day))
    }

    /// The month that `date` falls in.
    pub fn containing(date: Date) -> Self {
        // Day 1 exists in every month, so replacing the day cannot fail.
        Self(date.replace_day(1).unwrap_or(date))
    }

    /// The current month in the canonical timezone `timezone`, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTimezoneError] if `timezone` is not a known
    /// canonical timezone name.
    pub fn current(timezone: &str) -> Result<Self, Error> {
        let now = OffsetDateTime::now_utc();
        let offset = time_tz::timezones::get_by_name(timezone)
            .map(|tz| tz.get_offset_utc(&now).to_utc())
            .ok_or_else(|| Error::InvalidTimezoneError(timezone.to_owned()))?;

        Ok(Self::containing(now.to_offset(offset).date()))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month number in `1..=12`.
    pub fn month(&self) -> u8 {
        self.0.month().into()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.0
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse a `YYYY-MM` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;

        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// The optional `?month=YYYY-MM` query parameter accepted by monthly endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month to use, defaults to the current month when absent.
    pub month: Option<String>,
}

impl MonthQuery {
    /// Parse the requested month, or fall back to the current month in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] for a malformed month, or
    /// [Error::InvalidTimezoneError] if the fallback needs an unknown timezone.
    pub fn resolve(&self, timezone: &str) -> Result<YearMonth, Error> {
        match &self.month {
            Some(month) => month.parse(),
            None => YearMonth::current(timezone),
        }
    }
}
