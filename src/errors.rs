use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::BillId;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment does not cover interest: payment {payment}, interest {interest}")]
    PaymentBelowInterest {
        payment: Money,
        interest: Money,
    },

    #[error("payoff exceeds maximum term of {max_months} months")]
    ExceedsMaximumTerm {
        max_months: u32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl FinanceError {
    /// true for the failures that mean "no payoff plan exists"
    pub fn is_non_convergent(&self) -> bool {
        matches!(
            self,
            FinanceError::InvalidPaymentAmount { .. }
                | FinanceError::PaymentBelowInterest { .. }
                | FinanceError::ExceedsMaximumTerm { .. }
        )
    }
}

/// failures reported by a bill store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// a payment already exists for this bill on this day
    #[error("duplicate bill payment: bill {bill_id} on {due_date}")]
    Duplicate {
        bill_id: BillId,
        due_date: NaiveDate,
    },

    #[error("backend failure: {message}")]
    Backend {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, FinanceError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
