// SPDX-License-Identifier: MIT
//
// Split a day count into years, months and days for the YMD display.
//
// A year is always 365 days and a month always 30, so the split drifts from
// the calendar over long spans. It's meant to be read at a glance.

use crate::date::CalendarDate;
use crate::delta::{Direction, days_between};

pub const DAYS_PER_YEAR: u32 = 365;
pub const DAYS_PER_MONTH: u32 = 30;

/// One tick's worth of countdown numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownResult {
    pub total_days: u32,
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl CountdownResult {
    /// Break `total_days` down.
    #[must_use]
    pub const fn from_days(total_days: u32) -> Self {
        let rest = total_days % DAYS_PER_YEAR;
        Self {
            total_days,
            years: total_days / DAYS_PER_YEAR,
            months: rest / DAYS_PER_MONTH,
            days: rest % DAYS_PER_MONTH,
        }
    }

    /// Count from `target` to `now` and break it down.
    #[must_use]
    pub fn compute(target: CalendarDate, now: CalendarDate, direction: Direction) -> Self {
        Self::from_days(days_between(target, now, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn ten_days() {
        assert_eq!(
            CountdownResult::from_days(10),
            CountdownResult {
                total_days: 10,
                years: 0,
                months: 0,
                days: 10
            }
        );
    }

    #[test]
    fn drift_is_kept() {
        // 364 days: 12 "months" of 30 plus 4 days, still zero years.
        let r = CountdownResult::from_days(364);
        assert_eq!((r.years, r.months, r.days), (0, 12, 4));

        let r = CountdownResult::from_days(365 * 3 + 61);
        assert_eq!((r.years, r.months, r.days), (3, 2, 1));
    }

    #[test]
    fn zero() {
        assert_eq!(CountdownResult::from_days(0), CountdownResult::default());
    }

    #[test]
    fn compute_end_to_end() {
        let target = CalendarDate::new(2000, 1, 1).unwrap();
        let now = CalendarDate::new(2000, 1, 11).unwrap();
        let r = CountdownResult::compute(target, now, Direction::Since);
        assert_eq!((r.total_days, r.years, r.months, r.days), (10, 0, 0, 10));
    }

    proptest! {
        #[test]
        fn parts_never_exceed_total(total in 0u32..=4_000_000) {
            let r = CountdownResult::from_days(total);
            let recomposed = u64::from(r.years) * 365 + u64::from(r.months) * 30 + u64::from(r.days);
            prop_assert!(recomposed <= u64::from(total));
            prop_assert!(total - r.years * 365 < 365);
            prop_assert!(r.days < 30);
            prop_assert!(r.months <= 12);
        }
    }
}
