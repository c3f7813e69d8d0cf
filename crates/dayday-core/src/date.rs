// SPDX-License-Identifier: MIT
//
// CalendarDate — a validated year/month/day triple.
//
// Both the event's target and the sampled "today" are plain calendar dates.
// Validation uses real month lengths (leap Februaries included) even though
// the day-counting model downstream is deliberately approximate, so a date
// like 02/30/2024 is rejected at the command line instead of silently
// shifting the count.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::ConfigError;

/// Years accepted for a target date.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A calendar date with `month` in `1..=12` and `day` valid for that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// Build a date, checking the year range and the month's real length.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DateOutOfRange`] when any component is out of range.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ConfigError> {
        let out_of_range = || ConfigError::DateOutOfRange { year, month, day };
        if !YEAR_RANGE.contains(&year) || !(1..=12).contains(&month) {
            return Err(out_of_range());
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(out_of_range());
        }
        Ok(Self { year, month, day })
    }

    #[inline]
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[inline]
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    #[inline]
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }
}

impl From<NaiveDate> for CalendarDate {
    /// Wall-clock dates come from chrono and are valid by construction.
    #[allow(clippy::cast_possible_truncation)]
    fn from(date: NaiveDate) -> Self {
        // month() is 1..=12 and day() is 1..=31.
        Self {
            year: date.year(),
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for CalendarDate {
    /// `MM/DD/YYYY`, the form the command line takes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.month, self.day, self.year)
    }
}

impl FromStr for CalendarDate {
    type Err = ConfigError;

    /// Parse `MM/DD/YYYY` or ISO `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ConfigError::InvalidDate(s.to_owned());

        let (year, month, day) = if let Some((m, rest)) = text.split_once('/') {
            let (d, y) = rest.split_once('/').ok_or_else(invalid)?;
            (y, m, d)
        } else {
            let mut parts = text.splitn(3, '-');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(y), Some(m), Some(d)) => (y, m, d),
                _ => return Err(invalid()),
            }
        };

        let year = number(year).ok_or_else(invalid)?;
        let month = number(month).ok_or_else(invalid)?;
        let day = number(day).ok_or_else(invalid)?;

        // Oversized fields saturate and fail the range check in `new`.
        Self::new(
            i32::try_from(year).unwrap_or(i32::MAX),
            u8::try_from(month).unwrap_or(u8::MAX),
            u8::try_from(day).unwrap_or(u8::MAX),
        )
    }
}

/// A run of 1 to 4 ASCII digits.
fn number(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 4 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Gregorian month length.
#[must_use]
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn parse_us_form() {
        assert_eq!("01/11/2000".parse::<CalendarDate>(), Ok(date(2000, 1, 11)));
        assert_eq!("7/4/1776".parse::<CalendarDate>(), Ok(date(1776, 7, 4)));
        assert_eq!(" 12/31/2030 ".parse::<CalendarDate>(), Ok(date(2030, 12, 31)));
    }

    #[test]
    fn parse_iso_form() {
        assert_eq!("2024-02-29".parse::<CalendarDate>(), Ok(date(2024, 2, 29)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "tomorrow", "01/11", "01-11-2000x", "2000-1", "1/2/3/4", "aa/bb/cccc", "01/11/20000"] {
            assert_eq!(
                text.parse::<CalendarDate>(),
                Err(ConfigError::InvalidDate(text.to_owned())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(matches!(
            "02/30/2024".parse::<CalendarDate>(),
            Err(ConfigError::DateOutOfRange { month: 2, day: 30, .. })
        ));
        assert!(matches!(
            "13/01/2024".parse::<CalendarDate>(),
            Err(ConfigError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            "01/00/2024".parse::<CalendarDate>(),
            Err(ConfigError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            "01/01/0000".parse::<CalendarDate>(),
            Err(ConfigError::DateOutOfRange { year: 0, .. })
        ));
    }

    #[test]
    fn new_checks_february() {
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(CalendarDate::new(2023, 2, 29).is_err());
        assert!(CalendarDate::new(1900, 2, 29).is_err());
        assert!(CalendarDate::new(2000, 2, 29).is_ok());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 2), 28);
    }

    #[test]
    fn display_is_us_form() {
        assert_eq!(date(2000, 1, 1).to_string(), "01/01/2000");
    }

    #[test]
    fn from_chrono() {
        let naive = NaiveDate::from_ymd_opt(2031, 8, 9).unwrap();
        assert_eq!(CalendarDate::from(naive), date(2031, 8, 9));
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(date(1999, 12, 31) < date(2000, 1, 1));
        assert!(date(2000, 2, 1) > date(2000, 1, 31));
    }
}
