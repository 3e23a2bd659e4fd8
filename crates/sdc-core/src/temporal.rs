//! # Temporal Types — ISO-8601 Calendar Dates
//!
//! Defines `CalendarDate`, the date type used by `PeriodOfTime` and
//! `Distribution.modified`.
//!
//! ## Format Invariant
//!
//! Only the extended ISO-8601 calendar form `YYYY-MM-DD` is accepted, with
//! zero-padded month and day. Inputs that chrono would leniently accept
//! (`2024-1-5`, trailing time components) are **rejected at construction**,
//! so that [`CalendarDate::to_iso8601`] always reproduces the input exactly.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date without time or timezone.
///
/// Ordered chronologically; serializes as a `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from year, month and day components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CoreError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidDate {
                value: format!("{year:04}-{month:02}-{day:02}"),
                reason: "no such calendar day".to_string(),
            })
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid calendar
    /// date or is not in canonical zero-padded form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let date = NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).map_err(|e| {
            CoreError::InvalidDate {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?;

        let parsed = Self(date);
        if parsed.to_iso8601() != s {
            return Err(CoreError::InvalidDate {
                value: s.to_string(),
                reason: "expected zero-padded YYYY-MM-DD".to_string(),
            });
        }
        Ok(parsed)
    }

    /// Access the inner `chrono::NaiveDate`.
    pub fn as_naive_date(&self) -> &NaiveDate {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso8601(&self) -> String {
        self.0.format(ISO_DATE_FORMAT).to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_iso8601()
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
