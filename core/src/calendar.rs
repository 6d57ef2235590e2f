//! In-game calendar arithmetic.
//!
//! RULE: a SimulatedTime is always normalized between ticks.
//! Months and days are zero-based internally; Display renders them
//! the way a player reads them.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOURS_PER_DAY: u32 = 24;
pub const MONTHS_PER_YEAR: u32 = 12;

/// The year a new colony starts in.
pub const DEFAULT_START_YEAR: u32 = 5500;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April",
    "May", "June", "July", "August",
    "September", "October", "November", "December",
];

/// Days per month in a common year.
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const FEBRUARY: u32 = 1;

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of `month` (0-based) in `year`, or `None` past December.
pub fn days_in_month(year: u32, month: u32) -> Option<u32> {
    if month == FEBRUARY && is_leap_year(year) {
        return Some(29);
    }
    DAYS_IN_MONTH.get(month as usize).copied()
}

/// Which calendar unit wrapped during an hourly advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    None,
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SimulatedTime {
    pub year:  u32,
    pub month: u32,
    pub day:   u32,
    pub hour:  u32,
}

impl Default for SimulatedTime {
    fn default() -> Self {
        Self { year: DEFAULT_START_YEAR, month: 0, day: 0, hour: 0 }
    }
}

impl SimulatedTime {
    pub fn new(year: u32, month: u32, day: u32, hour: u32) -> SimResult<Self> {
        let time = Self { year, month, day, hour };
        if !time.is_normalized() {
            return Err(SimError::InvalidTime { year, month, day, hour });
        }
        Ok(time)
    }

    pub fn is_normalized(&self) -> bool {
        self.hour < HOURS_PER_DAY
            && days_in_month(self.year, self.month).is_some_and(|days| self.day < days)
    }

    /// Advance one hour, cascading into day, month and year.
    /// Returns the largest unit that wrapped.
    pub fn advance_hour(&mut self) -> Rollover {
        self.hour += 1;
        if self.hour < HOURS_PER_DAY {
            return Rollover::None;
        }
        self.hour = 0;
        self.advance_day()
    }

    fn advance_day(&mut self) -> Rollover {
        self.day += 1;
        if days_in_month(self.year, self.month).is_some_and(|days| self.day < days) {
            return Rollover::Day;
        }
        self.day = 0;
        self.advance_month()
    }

    fn advance_month(&mut self) -> Rollover {
        self.month += 1;
        if self.month < MONTHS_PER_YEAR {
            return Rollover::Month;
        }
        self.month = 0;
        // The last representable year repeats rather than wrapping to zero.
        self.year = self.year.saturating_add(1);
        Rollover::Year
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }
}

impl fmt::Display for SimulatedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} - {}:00",
            self.month_name(),
            self.day + 1,
            self.year,
            self.hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(5504));
        assert!(!is_leap_year(5500));
    }

    #[test]
    fn month_lengths_are_valid() {
        for year in [1900, 2000, 2023, 2024, 5500, 5504] {
            for month in 0..MONTHS_PER_YEAR {
                let days = days_in_month(year, month).unwrap();
                assert!(
                    (28..=31).contains(&days),
                    "year {year} month {month} has {days} days"
                );
                assert_eq!(
                    days == 29,
                    month == FEBRUARY && is_leap_year(year),
                    "29 days only for February in leap years (year {year}, month {month})"
                );
            }
        }
    }

    #[test]
    fn month_past_december_has_no_length() {
        assert_eq!(days_in_month(2024, 12), None);
        assert_eq!(days_in_month(2024, u32::MAX), None);
        assert_eq!(days_in_month(2024, 11), Some(31));
    }

    #[test]
    fn last_representable_year_does_not_overflow() {
        let mut time = SimulatedTime::new(u32::MAX, 11, 30, 23).unwrap();
        assert_eq!(time.advance_hour(), Rollover::Year);
        assert_eq!(time, SimulatedTime { year: u32::MAX, month: 0, day: 0, hour: 0 });
    }

    #[test]
    fn new_rejects_out_of_range_fields() {
        assert!(SimulatedTime::new(5500, 12, 0, 0).is_err());
        assert!(SimulatedTime::new(5500, 0, 31, 0).is_err());
        assert!(SimulatedTime::new(5500, 0, 0, 24).is_err());
        assert!(SimulatedTime::new(2023, 1, 28, 0).is_err());
        assert!(SimulatedTime::new(2024, 1, 28, 0).is_ok());
    }

    #[test]
    fn february_rolls_over_on_leap_day() {
        let mut time = SimulatedTime::new(2024, 1, 27, 23).unwrap();
        assert_eq!(time.advance_hour(), Rollover::Day);
        assert_eq!((time.month, time.day), (1, 28));

        let mut time = SimulatedTime::new(2023, 1, 27, 23).unwrap();
        assert_eq!(time.advance_hour(), Rollover::Month);
        assert_eq!((time.month, time.day, time.hour), (2, 0, 0));
    }

    #[test]
    fn display_is_one_based() {
        let time = SimulatedTime::new(5500, 2, 4, 13).unwrap();
        assert_eq!(time.to_string(), "March 5, 5500 - 13:00");
        assert_eq!(SimulatedTime::default().to_string(), "January 1, 5500 - 0:00");
    }
}
