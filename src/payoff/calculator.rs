use chrono::{Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use tracing::debug;

use crate::config::PayoffConfig;
use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::payoff::{DebtPayoffInput, PayoffComparison, PayoffResult, PayoffScheduleEntry};

/// fixed-payment amortization simulator
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffCalculator {
    max_months: u32,
    tolerance: Money,
}

impl PayoffCalculator {
    pub fn new(config: &PayoffConfig) -> Self {
        Self {
            max_months: config.max_months,
            tolerance: config.payoff_tolerance,
        }
    }

    /// simulate paying `input` off month by month starting today
    ///
    /// Fails with `InvalidPaymentAmount` when nothing is paid, `PaymentBelowInterest`
    /// when the payment never outruns interest and `ExceedsMaximumTerm` when the
    /// balance is still open after `max_months`.
    pub fn calculate_payoff(
        &self,
        input: &DebtPayoffInput,
        time: &SafeTimeProvider,
    ) -> Result<PayoffResult> {
        let today = time.now().date_naive();
        self.calculate_payoff_from(input, today)
    }

    /// same as [`calculate_payoff`](Self::calculate_payoff) with an explicit start date
    pub fn calculate_payoff_from(&self, input: &DebtPayoffInput, today: NaiveDate) -> Result<PayoffResult> {
        if !input.balance.is_positive() {
            return Ok(PayoffResult {
                months: 0,
                total_payment: Money::ZERO,
                total_interest: Money::ZERO,
                payoff_date: today,
                schedule: Vec::new(),
            });
        }

        let monthly_payment = input.monthly_payment();
        if !monthly_payment.is_positive() {
            return Err(FinanceError::InvalidPaymentAmount {
                amount: monthly_payment,
            });
        }

        let mut schedule = Vec::new();
        let mut remaining = input.balance;
        let mut total_payment = Money::ZERO;
        let mut total_interest = Money::ZERO;
        let mut month = 0u32;

        while remaining > self.tolerance {
            if month >= self.max_months {
                debug!(max_months = self.max_months, %remaining, "payoff exceeds maximum term");
                return Err(FinanceError::ExceedsMaximumTerm {
                    max_months: self.max_months,
                });
            }
            month += 1;

            let interest = remaining.monthly_interest(input.apr);
            if !input.apr.is_zero() && monthly_payment <= interest {
                debug!(%monthly_payment, %interest, "payment does not cover interest");
                return Err(FinanceError::PaymentBelowInterest {
                    payment: monthly_payment,
                    interest,
                });
            }

            // last month only pays what is owed
            let payment = monthly_payment.min(remaining + interest);
            let principal = payment - interest;
            remaining = (remaining - principal).max(Money::ZERO);

            total_payment += payment;
            total_interest += interest;
            schedule.push(PayoffScheduleEntry {
                month,
                payment,
                principal,
                interest,
                balance: remaining,
            });
        }

        let payoff_date = today
            .checked_add_months(Months::new(month))
            .ok_or_else(|| FinanceError::InvalidDate {
                message: format!("{} months after {} is out of range", month, today),
            })?;

        Ok(PayoffResult {
            months: month,
            total_payment,
            total_interest,
            payoff_date,
            schedule,
        })
    }

    /// compare paying only the minimum against paying minimum plus extra
    pub fn calculate_payoff_comparison(
        &self,
        input: &DebtPayoffInput,
        time: &SafeTimeProvider,
    ) -> PayoffComparison {
        let today = time.now().date_naive();
        self.calculate_payoff_comparison_from(input, today)
    }

    pub fn calculate_payoff_comparison_from(&self, input: &DebtPayoffInput, today: NaiveDate) -> PayoffComparison {
        let minimum_input = input.with_extra_payment(Money::ZERO);
        let minimum_only = self.calculate_payoff_from(&minimum_input, today).ok();

        let with_extra = if input.extra_payment.is_positive() {
            self.calculate_payoff_from(input, today).ok()
        } else {
            minimum_only.clone()
        };

        let (base_months, base_interest) = months_and_interest(minimum_only.as_ref());
        let (extra_months, extra_interest) = months_and_interest(with_extra.as_ref());

        PayoffComparison {
            minimum_only,
            with_extra,
            months_saved: i64::from(base_months) - i64::from(extra_months),
            interest_saved: base_interest - extra_interest,
        }
    }
}

impl Default for PayoffCalculator {
    fn default() -> Self {
        Self::new(&PayoffConfig::default())
    }
}

fn months_and_interest(result: Option<&PayoffResult>) -> (u32, Money) {
    result
        .map(|r| (r.months, r.total_interest))
        .unwrap_or((0, Money::ZERO))
}
