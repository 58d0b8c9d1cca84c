use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::config::PayScheduleConfig;
use crate::errors::{FinanceError, Result};
use crate::periods::{Direction, PayPeriod, PERIOD_LENGTH_DAYS};

/// maps calendar dates onto the bi-weekly pay schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriodEngine {
    reference_date: NaiveDate,
}

impl PayPeriodEngine {
    /// engine anchored on a known period start
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    pub fn from_config(config: &PayScheduleConfig) -> Self {
        Self::new(config.reference_date)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// start of the 14-day period containing `date`, never after `date`
    pub fn paycheck_date_for_date(&self, date: NaiveDate) -> NaiveDate {
        self.date_at(self.period_offset(date))
    }

    /// the pay period containing `date`
    ///
    /// The first and last periods of the representable calendar are cut short at
    /// `NaiveDate::MIN` and `NaiveDate::MAX`.
    pub fn pay_period_for_date(&self, date: NaiveDate) -> PayPeriod {
        let offset = self.period_offset(date);
        let start_date = self.date_at(offset);
        PayPeriod {
            start_date,
            end_date: self.date_at(offset + PERIOD_LENGTH_DAYS - 1),
            paycheck_date: start_date,
        }
    }

    /// days from the reference date to the start of the period containing `date`
    fn period_offset(&self, date: NaiveDate) -> i64 {
        let days = (date - self.reference_date).num_days();
        let weeks = days.div_euclid(7);
        let mut offset = weeks.div_euclid(2) * PERIOD_LENGTH_DAYS;
        if offset > days {
            offset -= PERIOD_LENGTH_DAYS;
        }
        offset
    }

    fn date_at(&self, offset: i64) -> NaiveDate {
        match self.reference_date.checked_add_signed(Duration::days(offset)) {
            Some(date) => date,
            None if offset < 0 => NaiveDate::MIN,
            None => NaiveDate::MAX,
        }
    }

    /// period containing today according to the time provider
    pub fn current_pay_period(&self, time: &SafeTimeProvider) -> PayPeriod {
        self.pay_period_for_date(time.now().date_naive())
    }

    pub fn next_pay_period(&self, time: &SafeTimeProvider) -> Result<PayPeriod> {
        let current = self.current_pay_period(time);
        self.period_after(&current).ok_or_else(|| FinanceError::InvalidDate {
            message: format!("no pay period after {}", current.end_date),
        })
    }

    pub fn previous_pay_period(&self, time: &SafeTimeProvider) -> Result<PayPeriod> {
        let current = self.current_pay_period(time);
        self.period_before(&current).ok_or_else(|| FinanceError::InvalidDate {
            message: format!("no pay period before {}", current.start_date),
        })
    }

    /// period immediately following `period`, `None` at the end of the calendar
    pub fn period_after(&self, period: &PayPeriod) -> Option<PayPeriod> {
        period.day_after().map(|day| self.pay_period_for_date(day))
    }

    /// period immediately preceding `period`, `None` at the start of the calendar
    pub fn period_before(&self, period: &PayPeriod) -> Option<PayPeriod> {
        // one week back lands inside the prior window, or the day before near the calendar's start
        period
            .start_date
            .checked_sub_signed(Duration::days(7))
            .or_else(|| period.day_before())
            .map(|day| self.pay_period_for_date(day))
    }

    /// up to `count` consecutive periods starting with the one containing `start_date`,
    /// always returned in ascending order
    ///
    /// Walking stops early at either end of the representable calendar.
    pub fn pay_periods(&self, start_date: NaiveDate, count: usize, direction: Direction) -> Vec<PayPeriod> {
        let mut periods = Vec::with_capacity(count);
        if count == 0 {
            return periods;
        }

        let mut current = self.pay_period_for_date(start_date);
        periods.push(current);
        while periods.len() < count {
            let neighbour = match direction {
                Direction::Forward => self.period_after(&current),
                Direction::Backward => self.period_before(&current),
            };
            match neighbour {
                Some(period) => {
                    current = period;
                    periods.push(current);
                }
                None => break,
            }
        }

        if direction == Direction::Backward {
            periods.reverse();
        }
        periods
    }
}

impl Default for PayPeriodEngine {
    fn default() -> Self {
        Self::from_config(&PayScheduleConfig::default())
    }
}
