pub mod engine;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub use engine::PayPeriodEngine;

/// days in one pay period
pub const PERIOD_LENGTH_DAYS: i64 = 14;

/// 14-day budgeting window that opens on payday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    pub start_date: NaiveDate,
    /// inclusive, always `start_date + 13 days`
    pub end_date: NaiveDate,
    pub paycheck_date: NaiveDate,
}

impl PayPeriod {
    /// period opening on the given paycheck date
    ///
    /// A period running past the last representable day ends on `NaiveDate::MAX`.
    pub fn starting_on(start_date: NaiveDate) -> Self {
        let end_date = start_date
            .checked_add_signed(Duration::days(PERIOD_LENGTH_DAYS - 1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start_date,
            end_date,
            paycheck_date: start_date,
        }
    }

    /// true if the date falls inside the inclusive window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// last day before this period, `None` at the start of the calendar
    pub fn day_before(&self) -> Option<NaiveDate> {
        self.start_date.pred_opt()
    }

    /// first day after this period, `None` at the end of the calendar
    pub fn day_after(&self) -> Option<NaiveDate> {
        self.end_date.succ_opt()
    }

    /// every day of the period in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        std::iter::successors(Some(self.start_date), |day| day.succ_opt())
            .take_while(move |day| *day <= end)
    }
}

/// walking direction when enumerating periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}
