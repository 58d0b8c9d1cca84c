pub mod bnpl;
pub mod calculator;
pub mod strategy;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

pub use bnpl::{
    calculate_effective_apr, effective_rate_for_sorting, installment_amounts, installment_dates,
    BnplTerms,
};
pub use calculator::PayoffCalculator;
pub use strategy::{prioritize_debts, Debt, PayoffStrategy};

/// inputs for a single-debt payoff simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffInput {
    pub balance: Money,
    pub apr: Rate,
    pub minimum_payment: Money,
    #[serde(default)]
    pub extra_payment: Money,
}

impl DebtPayoffInput {
    pub fn new(balance: Money, apr: Rate, minimum_payment: Money) -> Self {
        Self {
            balance,
            apr,
            minimum_payment,
            extra_payment: Money::ZERO,
        }
    }

    pub fn with_extra_payment(mut self, extra_payment: Money) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    /// amount paid every month
    pub fn monthly_payment(&self) -> Money {
        self.minimum_payment + self.extra_payment
    }
}

/// one month of a payoff schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffScheduleEntry {
    /// 1-based month number
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// balance remaining after this month's payment
    pub balance: Money,
}

/// result of a converging payoff simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    pub months: u32,
    pub total_payment: Money,
    pub total_interest: Money,
    pub payoff_date: NaiveDate,
    pub schedule: Vec<PayoffScheduleEntry>,
}

impl PayoffResult {
    /// true when the debt was already paid off
    pub fn is_already_paid(&self) -> bool {
        self.months == 0
    }
}

/// minimum-only versus minimum-plus-extra payoff
///
/// A side that does not converge is `None` and contributes zero months and zero
/// interest to the savings, check [`PayoffComparison::is_available`] before
/// presenting savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffComparison {
    pub minimum_only: Option<PayoffResult>,
    pub with_extra: Option<PayoffResult>,
    pub months_saved: i64,
    pub interest_saved: Money,
}

impl PayoffComparison {
    /// both simulations produced a schedule
    pub fn is_available(&self) -> bool {
        self.minimum_only.is_some() && self.with_extra.is_some()
    }
}
