// SPDX-License-Identifier: MIT
//
// Day arithmetic.
//
// Dates are mapped onto a linear day index with a fixed 365-day year, the
// non-leap month table and a whole-history leap correction. The model is
// an approximation of the Gregorian calendar, and deliberately so: the
// countdown shows the same numbers it always has. The difference between
// two indices is then clamped by the direction of counting.

use std::fmt;

use crate::date::CalendarDate;

/// Non-leap month lengths, January first.
pub const MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Which side of the event is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Days elapsed since the event.
    #[default]
    Since,
    /// Days remaining until the event.
    Until,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Since => "since",
            Self::Until => "until",
        })
    }
}

/// `y/4 - y/100 + y/400`, with `y` the previous year for January and
/// February, since that year's leap day hasn't happened yet.
#[must_use]
pub fn leap_correction(year: i32, month: u8) -> i64 {
    let y = i64::from(if month <= 2 { year - 1 } else { year });
    y / 4 - y / 100 + y / 400
}

/// Position of `date` on the linear day scale.
#[must_use]
pub fn day_index(date: CalendarDate) -> i64 {
    let months_before: i64 = MONTH_LENGTHS
        .iter()
        .take(usize::from(date.month().saturating_sub(1)))
        .map(|&len| i64::from(len))
        .sum();

    i64::from(date.year()) * 365
        + i64::from(date.day())
        + months_before
        + leap_correction(date.year(), date.month())
}

/// Days from `target` to `now` in `direction`, or 0 when the direction
/// doesn't hold yet (counting "since" an event that is still ahead, or
/// "until" one that has passed).
#[must_use]
pub fn days_between(target: CalendarDate, now: CalendarDate, direction: Direction) -> u32 {
    let target = day_index(target);
    let now = day_index(now);
    let span = match direction {
        Direction::Since => now - target,
        Direction::Until => target - now,
    };
    // Indices of years 1..=9999 differ by far less than u32::MAX.
    u32::try_from(span.max(0)).unwrap_or(u32::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
