use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::bills::Bill;
use crate::types::BillFrequency;

/// the parts of a bill that decide when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: BillFrequency,
    pub due_day: u32,
    pub is_recurring: bool,
}

impl RecurrenceRule {
    pub fn new(frequency: BillFrequency, due_day: u32) -> Self {
        Self {
            frequency,
            due_day,
            is_recurring: frequency != BillFrequency::Once,
        }
    }

    /// due dates inside the inclusive range `[start, end]`
    pub fn due_dates(&self, start: NaiveDate, end: NaiveDate) -> DueDates {
        if !self.is_recurring || start > end {
            return DueDates::empty();
        }

        match self.frequency {
            // one-off bills are tracked as payment rows directly
            BillFrequency::Once => DueDates::empty(),
            // yearly bills are tracked manually
            BillFrequency::Yearly => DueDates::empty(),
            BillFrequency::Monthly => DueDates {
                cursor: Cursor::DayOfMonth {
                    next: start,
                    end,
                    due_day: self.due_day,
                },
            },
            BillFrequency::Weekly | BillFrequency::Biweekly => {
                let step = match self.frequency.interval_days() {
                    Some(step) => step,
                    None => return DueDates::empty(),
                };
                match first_interval_date(start, self.due_day, step) {
                    Some(next) => DueDates {
                        cursor: Cursor::Interval { next, end, step },
                    },
                    None => DueDates::empty(),
                }
            }
        }
    }
}

/// due dates for a bill inside `[start, end]`
pub fn due_dates_for_bill(bill: &Bill, start: NaiveDate, end: NaiveDate) -> DueDates {
    bill.rule().due_dates(start, end)
}

/// anchor on `due_day` of the start month, then step until reaching `start`
///
/// A `due_day` past the end of the month rolls into the following month. `None` when
/// the anchor lies past the end of the calendar.
fn first_interval_date(start: NaiveDate, due_day: u32, step: i64) -> Option<NaiveDate> {
    let month_start = start.with_day(1).unwrap_or(start);
    let date = month_start.checked_add_signed(Duration::days(i64::from(due_day.max(1)) - 1))?;

    if date >= start {
        return Some(date);
    }
    let behind = (start - date).num_days();
    let steps = (behind + step - 1) / step;
    date.checked_add_signed(Duration::days(steps * step))
}

#[derive(Debug, Clone)]
enum Cursor {
    Exhausted,
    DayOfMonth {
        next: NaiveDate,
        end: NaiveDate,
        due_day: u32,
    },
    Interval {
        next: NaiveDate,
        end: NaiveDate,
        step: i64,
    },
}

/// lazy, chronological sequence of due dates
///
/// Holds only its own cursor, so recomputing with the same inputs yields the same dates.
#[derive(Debug, Clone)]
pub struct DueDates {
    cursor: Cursor,
}

impl DueDates {
    fn empty() -> Self {
        Self {
            cursor: Cursor::Exhausted,
        }
    }
}

impl Iterator for DueDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match &mut self.cursor {
            Cursor::Exhausted => None,
            Cursor::DayOfMonth { next, end, due_day } => {
                let (end, due_day) = (*end, *due_day);
                // months lacking the day simply produce nothing
                let mut day = *next;
                while day <= end {
                    let following = day.succ_opt();
                    if day.day() == due_day {
                        match following {
                            Some(following) => *next = following,
                            None => self.cursor = Cursor::Exhausted,
                        }
                        return Some(day);
                    }
                    match following {
                        Some(following) => day = following,
                        None => break,
                    }
                }
                self.cursor = Cursor::Exhausted;
                None
            }
            Cursor::Interval { next, end, step } => {
                let (end, step) = (*end, *step);
                if *next > end {
                    return None;
                }
                let day = *next;
                // stop once the following step falls off the calendar
                match day.checked_add_signed(Duration::days(step)) {
                    Some(following) => *next = following,
                    None => self.cursor = Cursor::Exhausted,
                }
                Some(day)
            }
        }
    }
}
