pub mod recurrence;
pub mod service;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{BillFrequency, BillId, BillPaymentId, BillPaymentStatus, UserId};

pub use recurrence::{due_dates_for_bill, DueDates, RecurrenceRule};
pub use service::{BillPaymentService, EnsureSummary};
pub use store::{BillStore, InMemoryBillStore};

/// a user's bill and its recurrence rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub user_id: UserId,
    pub name: String,
    pub amount: Money,
    /// day of month in 1..=31, validated before it reaches this crate
    pub due_day: u32,
    pub is_recurring: bool,
    pub frequency: BillFrequency,
    pub is_active: bool,
}

impl Bill {
    /// create an active bill, recurring unless the frequency is `Once`
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        amount: Money,
        due_day: u32,
        frequency: BillFrequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            amount,
            due_day,
            is_recurring: frequency != BillFrequency::Once,
            frequency,
            is_active: true,
        }
    }

    /// the recurrence part of the bill
    pub fn rule(&self) -> RecurrenceRule {
        RecurrenceRule {
            frequency: self.frequency,
            due_day: self.due_day,
            is_recurring: self.is_recurring,
        }
    }

    /// bills the materializer should generate payments for
    pub fn generates_payments(&self) -> bool {
        self.is_active && self.is_recurring
    }
}

/// one concrete occurrence of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillPayment {
    pub id: BillPaymentId,
    pub bill_id: BillId,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: BillPaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl BillPayment {
    pub fn is_paid(&self) -> bool {
        self.status == BillPaymentStatus::Paid
    }

    /// record the payment as settled
    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.status = BillPaymentStatus::Paid;
        self.paid_at = Some(at);
    }

    /// reopen a payment marked paid by mistake
    pub fn mark_unpaid(&mut self) {
        self.status = BillPaymentStatus::Unpaid;
        self.paid_at = None;
    }
}

/// fields for a payment row that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBillPayment {
    pub bill_id: BillId,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: BillPaymentStatus,
}

impl NewBillPayment {
    /// unpaid occurrence of `bill` on `due_date`, amount copied from the bill
    pub fn unpaid(bill: &Bill, due_date: NaiveDate) -> Self {
        Self {
            bill_id: bill.id,
            due_date,
            amount: bill.amount,
            status: BillPaymentStatus::Unpaid,
        }
    }

    /// assign an id, producing the stored record
    pub fn into_payment(self, id: BillPaymentId) -> BillPayment {
        BillPayment {
            id,
            bill_id: self.bill_id,
            due_date: self.due_date,
            amount: self.amount,
            status: self.status,
            paid_at: None,
        }
    }
}
