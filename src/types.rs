use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// owner of bills and debts
pub type UserId = Uuid;

/// unique identifier for a bill
pub type BillId = Uuid;

/// unique identifier for a materialized bill payment
pub type BillPaymentId = Uuid;

/// unique identifier for a debt
pub type DebtId = Uuid;

/// how often a bill comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillFrequency {
    /// one-off, tracked directly as a payment record
    Once,
    Weekly,
    Biweekly,
    Monthly,
    /// not generated automatically, tracked manually
    Yearly,
}

impl BillFrequency {
    /// fixed step in days for interval-based frequencies
    pub fn interval_days(&self) -> Option<i64> {
        match self {
            BillFrequency::Weekly => Some(7),
            BillFrequency::Biweekly => Some(14),
            _ => None,
        }
    }
}

/// payment status of a bill occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillPaymentStatus {
    Unpaid,
    Paid,
}

/// installment cadence of a buy-now-pay-later plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl InstallmentFrequency {
    /// days between installments, `None` for calendar-month cadence
    pub fn interval_days(&self) -> Option<i64> {
        match self {
            InstallmentFrequency::Weekly => Some(7),
            InstallmentFrequency::Biweekly => Some(14),
            InstallmentFrequency::Monthly => None,
        }
    }
}
