use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayoffConfig;
use crate::decimal::{Money, Rate};
use crate::types::InstallmentFrequency;

/// fixed-installment plan terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BnplTerms {
    pub principal: Money,
    pub total_repayable: Money,
    pub number_of_payments: u32,
    pub frequency: InstallmentFrequency,
}

impl BnplTerms {
    pub fn finance_charge(&self) -> Money {
        self.total_repayable - self.principal
    }

    /// plan length in months, weekly cadences use an average month length
    pub fn term_in_months(&self, average_month_days: Decimal) -> Decimal {
        let payments = Decimal::from(self.number_of_payments);
        match self.frequency.interval_days() {
            Some(days) => payments * Decimal::from(days) / average_month_days,
            None => payments,
        }
    }

    /// simple-interest approximation of the annual rate, rounded to 2 decimal places
    /// of a percent
    ///
    /// Not an IRR solve: finance charge over principal, annualized by the plan length.
    pub fn effective_apr(&self, average_month_days: Decimal) -> Rate {
        if !self.principal.is_positive()
            || !self.total_repayable.is_positive()
            || self.number_of_payments == 0
            || average_month_days <= Decimal::ZERO
        {
            return Rate::ZERO;
        }
        if self.finance_charge().abs() < Money::CENT {
            return Rate::ZERO;
        }

        let term_months = self.term_in_months(average_month_days);
        let charge_ratio = self.finance_charge().as_decimal() / self.principal.as_decimal();
        let annual_percent = charge_ratio / (term_months / Decimal::from(12)) * Decimal::from(100);

        Rate::from_percentage_decimal(annual_percent.round_dp(2))
    }
}

/// effective APR using the default average month length
pub fn calculate_effective_apr(terms: &BnplTerms) -> Rate {
    terms.effective_apr(PayoffConfig::default().average_month_days)
}

/// rate used to rank debts, so a 0% plan with a finance charge is not ranked as free
pub fn effective_rate_for_sorting(stated_apr: Rate, terms: &BnplTerms) -> Rate {
    stated_apr.max(calculate_effective_apr(terms))
}

/// due dates of every installment, starting with `first_payment`
///
/// `None` when any installment would fall past the end of the calendar, so a
/// returned schedule always has `number_of_payments` dates.
pub fn installment_dates(
    first_payment: NaiveDate,
    number_of_payments: u32,
    frequency: InstallmentFrequency,
) -> Option<Vec<NaiveDate>> {
    (0..number_of_payments)
        .map(|i| match frequency.interval_days() {
            Some(days) => first_payment.checked_add_signed(Duration::days(days * i64::from(i))),
            // offset from the first date so short months do not drift the schedule
            None => first_payment.checked_add_months(Months::new(i)),
        })
        .collect()
}

/// split `total` into equal cent amounts, the last installment absorbs rounding
pub fn installment_amounts(total: Money, number_of_payments: u32) -> Vec<Money> {
    if number_of_payments == 0 {
        return Vec::new();
    }

    let regular = (total / Decimal::from(number_of_payments)).to_cents();
    let mut amounts = vec![regular; number_of_payments as usize - 1];
    let allocated: Money = amounts.iter().copied().sum();
    amounts.push(total - allocated);
    amounts
}
