use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::bills::{Bill, BillPayment, NewBillPayment};
use crate::errors::{StoreError, StoreResult};
use crate::types::{BillId, UserId};

/// persistence collaborator for bills and their materialized payments
///
/// `create_payment` must reject a second payment for the same bill and day with
/// [`StoreError::Duplicate`]; callers rely on that to stay idempotent under races.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// active, recurring bills owned by `user_id`
    async fn active_recurring_bills(&self, user_id: UserId) -> StoreResult<Vec<Bill>>;

    /// a payment of `bill_id` due within `[day_start, day_end)`
    async fn find_payment_in_range(
        &self,
        bill_id: BillId,
        day_start: NaiveDate,
        day_end: NaiveDate,
    ) -> StoreResult<Option<BillPayment>>;

    /// insert a payment if none exists for its bill and day
    async fn create_payment(&self, payment: NewBillPayment) -> StoreResult<BillPayment>;
}

/// in-process store, uniqueness of (bill, day) is checked under the payments lock
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    bills: Mutex<Vec<Bill>>,
    payments: Mutex<Vec<BillPayment>>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// store with bills preloaded
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: Mutex::new(bills),
            payments: Mutex::new(Vec::new()),
        }
    }

    pub fn add_bill(&self, bill: Bill) -> StoreResult<()> {
        self.lock_bills()?.push(bill);
        Ok(())
    }

    /// deactivate a bill so it no longer generates payments
    pub fn deactivate_bill(&self, bill_id: BillId) -> StoreResult<bool> {
        let mut bills = self.lock_bills()?;
        match bills.iter_mut().find(|b| b.id == bill_id) {
            Some(bill) => {
                bill.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// snapshot of all stored payments ordered by due date
    pub fn payments(&self) -> StoreResult<Vec<BillPayment>> {
        let mut payments = self.lock_payments()?.clone();
        payments.sort_by_key(|p| p.due_date);
        Ok(payments)
    }

    pub fn payments_for_bill(&self, bill_id: BillId) -> StoreResult<Vec<BillPayment>> {
        Ok(self
            .payments()?
            .into_iter()
            .filter(|p| p.bill_id == bill_id)
            .collect())
    }

    fn lock_bills(&self) -> StoreResult<MutexGuard<'_, Vec<Bill>>> {
        self.bills.lock().map_err(|_| StoreError::Backend {
            message: "bill table lock poisoned".to_string(),
        })
    }

    fn lock_payments(&self) -> StoreResult<MutexGuard<'_, Vec<BillPayment>>> {
        self.payments.lock().map_err(|_| StoreError::Backend {
            message: "payment table lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn active_recurring_bills(&self, user_id: UserId) -> StoreResult<Vec<Bill>> {
        Ok(self
            .lock_bills()?
            .iter()
            .filter(|b| b.user_id == user_id && b.generates_payments())
            .cloned()
            .collect())
    }

    async fn find_payment_in_range(
        &self,
        bill_id: BillId,
        day_start: NaiveDate,
        day_end: NaiveDate,
    ) -> StoreResult<Option<BillPayment>> {
        Ok(self
            .lock_payments()?
            .iter()
            .find(|p| p.bill_id == bill_id && p.due_date >= day_start && p.due_date < day_end)
            .cloned())
    }

    async fn create_payment(&self, payment: NewBillPayment) -> StoreResult<BillPayment> {
        let mut payments = self.lock_payments()?;
        if payments
            .iter()
            .any(|p| p.bill_id == payment.bill_id && p.due_date == payment.due_date)
        {
            return Err(StoreError::Duplicate {
                bill_id: payment.bill_id,
                due_date: payment.due_date,
            });
        }

        let stored = payment.into_payment(Uuid::new_v4());
        payments.push(stored.clone());
        Ok(stored)
    }
}
