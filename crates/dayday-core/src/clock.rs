// SPDX-License-Identifier: MIT
//
// Where "today" comes from. The controller samples the clock on every tick;
// tests substitute a fixed or hand-advanced date.

use std::cell::Cell;

use chrono::Local;

use crate::date::CalendarDate;

/// A source of the current date.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        Local::now().date_naive().into()
    }
}

/// A clock that reads whatever date it was last set to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Cell<CalendarDate>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(date: CalendarDate) -> Self {
        Self {
            date: Cell::new(date),
        }
    }

    /// Move the clock to `date`.
    pub fn set(&self, date: CalendarDate) {
        self.date.set(date);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.date.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CalendarDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(clock: impl Clock) -> CalendarDate {
        clock.today()
    }

    #[test]
    fn fixed_clock_reads_and_moves() {
        let start = CalendarDate::new(2000, 1, 1).unwrap();
        let later = CalendarDate::new(2000, 1, 11).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.today(), start);
        clock.set(later);
        assert_eq!(read(&clock), later);
    }

    #[test]
    fn system_clock_gives_a_valid_date() {
        let today = SystemClock.today();
        assert_eq!(CalendarDate::new(today.year(), today.month(), today.day()), Ok(today));
    }
}
