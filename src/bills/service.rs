use chrono::{Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bills::{due_dates_for_bill, BillStore, NewBillPayment};
use crate::config::{FinanceConfig, RecurrenceConfig};
use crate::errors::{FinanceError, Result, StoreError};
use crate::periods::PayPeriodEngine;
use crate::types::UserId;

/// outcome of a materialization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnsureSummary {
    pub created: u32,
    pub existing: u32,
}

impl EnsureSummary {
    pub fn total(&self) -> u32 {
        self.created + self.existing
    }
}

/// materializes bill payments for recurring bills
///
/// Each due date is checked and inserted on its own; a duplicate reported by the
/// store during insert counts as existing, so concurrent and repeated runs converge
/// on one payment per bill per day.
pub struct BillPaymentService<S: BillStore> {
    store: S,
    periods: PayPeriodEngine,
    config: RecurrenceConfig,
}

impl<S: BillStore> BillPaymentService<S> {
    pub fn new(store: S, periods: PayPeriodEngine, config: RecurrenceConfig) -> Self {
        Self {
            store,
            periods,
            config,
        }
    }

    pub fn from_config(store: S, config: &FinanceConfig) -> Self {
        Self::new(
            store,
            PayPeriodEngine::from_config(&config.pay_schedule),
            config.recurrence.clone(),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// ensure a payment row exists for every due date of the user's recurring bills
    /// within `[start_date, end_date]`
    pub async fn ensure_bill_payments_for_period(
        &self,
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<EnsureSummary> {
        let bills = self.store.active_recurring_bills(user_id).await?;
        let mut summary = EnsureSummary::default();

        for bill in &bills {
            for due_date in due_dates_for_bill(bill, start_date, end_date) {
                // on the last day of the calendar the lookup is empty and the store's
                // duplicate check decides
                let day_end = due_date.succ_opt().unwrap_or(NaiveDate::MAX);

                if self
                    .store
                    .find_payment_in_range(bill.id, due_date, day_end)
                    .await?
                    .is_some()
                {
                    summary.existing += 1;
                    continue;
                }

                match self.store.create_payment(NewBillPayment::unpaid(bill, due_date)).await {
                    Ok(payment) => {
                        debug!(bill_id = %bill.id, payment_id = %payment.id, %due_date, "bill payment created");
                        summary.created += 1;
                    }
                    Err(StoreError::Duplicate { .. }) => {
                        warn!(bill_id = %bill.id, %due_date, "bill payment created concurrently, treating as existing");
                        summary.existing += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        info!(
            %user_id,
            %start_date,
            %end_date,
            bills = bills.len(),
            created = summary.created,
            existing = summary.existing,
            "bill payments ensured"
        );
        Ok(summary)
    }

    /// materialize payments for the pay period containing today
    pub async fn ensure_bill_payments_for_pay_period(
        &self,
        user_id: UserId,
        time: &SafeTimeProvider,
    ) -> Result<EnsureSummary> {
        let period = self.periods.current_pay_period(time);
        self.ensure_bill_payments_for_period(user_id, period.start_date, period.end_date)
            .await
    }

    /// materialize payments from today through `months_ahead` calendar months,
    /// falling back to the configured horizon
    pub async fn generate_upcoming_bill_payments(
        &self,
        user_id: UserId,
        months_ahead: Option<u32>,
        time: &SafeTimeProvider,
    ) -> Result<EnsureSummary> {
        let today = time.now().date_naive();
        let months = months_ahead.unwrap_or(self.config.upcoming_months);
        let end_date = today
            .checked_add_months(Months::new(months))
            .ok_or_else(|| FinanceError::InvalidDate {
                message: format!("{} months after {} is out of range", months, today),
            })?;

        self.ensure_bill_payments_for_period(user_id, today, end_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::{Datelike, Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    use crate::bills::{Bill, BillPayment, InMemoryBillStore};
    use crate::decimal::Money;
    use crate::errors::StoreResult;
    use crate::types::{BillFrequency, BillId, BillPaymentStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(store: InMemoryBillStore) -> BillPaymentService<InMemoryBillStore> {
        BillPaymentService::from_config(store, &FinanceConfig::default())
    }

    /// store whose lookups never see existing rows, as if another writer raced us
    struct StaleReadStore {
        inner: InMemoryBillStore,
    }

    #[async_trait]
    impl BillStore for StaleReadStore {
        async fn active_recurring_bills(&self, user_id: UserId) -> StoreResult<Vec<Bill>> {
            self.inner.active_recurring_bills(user_id).await
        }

        async fn find_payment_in_range(
            &self,
            _bill_id: BillId,
            _day_start: NaiveDate,
            _day_end: NaiveDate,
        ) -> StoreResult<Option<BillPayment>> {
            Ok(None)
        }

        async fn create_payment(&self, payment: NewBillPayment) -> StoreResult<BillPayment> {
            self.inner.create_payment(payment).await
        }
    }

    /// store whose inserts fail after `fail_after` successes
    struct FailingStore {
        inner: InMemoryBillStore,
        fail_after: u32,
        inserts: AtomicU32,
    }

    #[async_trait]
    impl BillStore for FailingStore {
        async fn active_recurring_bills(&self, user_id: UserId) -> StoreResult<Vec<Bill>> {
            self.inner.active_recurring_bills(user_id).await
        }

        async fn find_payment_in_range(
            &self,
            bill_id: BillId,
            day_start: NaiveDate,
            day_end: NaiveDate,
        ) -> StoreResult<Option<BillPayment>> {
            self.inner.find_payment_in_range(bill_id, day_start, day_end).await
        }

        async fn create_payment(&self, payment: NewBillPayment) -> StoreResult<BillPayment> {
            if self.inserts.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
                return Err(StoreError::Backend {
                    message: "connection reset".to_string(),
                });
            }
            self.inner.create_payment(payment).await
        }
    }

    #[tokio::test]
    async fn test_creates_unpaid_payments_with_bill_amount() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Internet", Money::from_cents(5_999), 15, BillFrequency::Monthly);
        let service = service(InMemoryBillStore::with_bills(vec![bill.clone()]));

        let summary = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 3, 31))
            .await
            .unwrap();

        assert_eq!(summary, EnsureSummary { created: 3, existing: 0 });
        let payments = service.store().payments_for_bill(bill.id).unwrap();
        let dates: Vec<_> = payments.iter().map(|p| p.due_date).collect();
        assert_eq!(dates, vec![date(2025, 1, 15), date(2025, 2, 15), date(2025, 3, 15)]);
        assert!(payments
            .iter()
            .all(|p| p.status == BillPaymentStatus::Unpaid && p.amount == bill.amount));
    }

    #[tokio::test]
    async fn test_payment_on_last_day_of_calendar() {
        let user = Uuid::new_v4();
        let due_day = NaiveDate::MAX.day();
        let bill = Bill::new(user, "Forever", Money::from_major(10), due_day, BillFrequency::Monthly);
        let service = service(InMemoryBillStore::with_bills(vec![bill.clone()]));
        let start = NaiveDate::MAX - Duration::days(10);

        let first = service
            .ensure_bill_payments_for_period(user, start, NaiveDate::MAX)
            .await
            .unwrap();
        assert_eq!(first, EnsureSummary { created: 1, existing: 0 });

        let second = service
            .ensure_bill_payments_for_period(user, start, NaiveDate::MAX)
            .await
            .unwrap();
        assert_eq!(second, EnsureSummary { created: 0, existing: 1 });

        let payments = service.store().payments_for_bill(bill.id).unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].due_date, NaiveDate::MAX);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let user = Uuid::new_v4();
        let bills = vec![
            Bill::new(user, "Rent", Money::from_major(1_200), 1, BillFrequency::Monthly),
            Bill::new(user, "Groceries", Money::from_major(150), 3, BillFrequency::Weekly),
        ];
        let service = service(InMemoryBillStore::with_bills(bills));

        let first = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 2, 28))
            .await
            .unwrap();
        let stored_after_first = service.store().payments().unwrap().len();

        let second = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 2, 28))
            .await
            .unwrap();

        assert!(first.created > 0);
        assert_eq!(second.created, 0);
        assert_eq!(second.existing, first.total());
        assert_eq!(service.store().payments().unwrap().len(), stored_after_first);
    }

    #[tokio::test]
    async fn test_skips_inactive_one_off_and_yearly_bills() {
        let user = Uuid::new_v4();
        let mut inactive = Bill::new(user, "Old gym", Money::from_major(30), 1, BillFrequency::Monthly);
        inactive.is_active = false;
        let bills = vec![
            inactive,
            Bill::new(user, "Repair", Money::from_major(200), 10, BillFrequency::Once),
            Bill::new(user, "Insurance", Money::from_major(600), 10, BillFrequency::Yearly),
        ];
        let service = service(InMemoryBillStore::with_bills(bills));

        let summary = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 12, 31))
            .await
            .unwrap();

        assert_eq!(summary, EnsureSummary::default());
        assert!(service.store().payments().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_on_insert_counts_as_existing() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Phone", Money::from_major(45), 15, BillFrequency::Monthly);
        let store = StaleReadStore {
            inner: InMemoryBillStore::with_bills(vec![bill]),
        };
        let service = BillPaymentService::from_config(store, &FinanceConfig::default());

        let first = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 2, 28))
            .await
            .unwrap();
        let second = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 2, 28))
            .await
            .unwrap();

        assert_eq!(first, EnsureSummary { created: 2, existing: 0 });
        assert_eq!(second, EnsureSummary { created: 0, existing: 2 });
        assert_eq!(service.store().inner.payments().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_runs_store_one_payment_per_day() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Transit", Money::from_major(25), 6, BillFrequency::Weekly);
        let store = StaleReadStore {
            inner: InMemoryBillStore::with_bills(vec![bill]),
        };
        let service = BillPaymentService::from_config(store, &FinanceConfig::default());

        let (a, b) = tokio::join!(
            service.ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 1, 31)),
            service.ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 1, 31)),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        // jan 6, 13, 20, 27
        assert_eq!(a.created + b.created, 4);
        assert_eq!(a.existing + b.existing, 4);
        assert_eq!(service.store().inner.payments().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_other_store_failures_propagate() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Rent", Money::from_major(1_200), 1, BillFrequency::Monthly);
        let store = FailingStore {
            inner: InMemoryBillStore::with_bills(vec![bill]),
            fail_after: 1,
            inserts: AtomicU32::new(0),
        };
        let service = BillPaymentService::from_config(store, &FinanceConfig::default());

        let result = service
            .ensure_bill_payments_for_period(user, date(2025, 1, 1), date(2025, 3, 31))
            .await;

        assert!(matches!(
            result,
            Err(FinanceError::Storage(StoreError::Backend { .. }))
        ));
        // the first insert is not rolled back
        assert_eq!(service.store().inner.payments().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pay_period_wrapper_uses_current_period() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Streaming", Money::from_major(15), 1, BillFrequency::Monthly);
        let service = service(InMemoryBillStore::with_bills(vec![bill.clone()]));
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 12, 3, 12, 0, 0).unwrap()
        ));

        // current period is nov 26 - dec 9
        let summary = service.ensure_bill_payments_for_pay_period(user, &time).await.unwrap();

        assert_eq!(summary.created, 1);
        let payments = service.store().payments_for_bill(bill.id).unwrap();
        assert_eq!(payments[0].due_date, date(2025, 12, 1));
    }

    #[tokio::test]
    async fn test_upcoming_uses_configured_horizon() {
        let user = Uuid::new_v4();
        let bill = Bill::new(user, "Rent", Money::from_major(1_200), 1, BillFrequency::Monthly);
        let service = service(InMemoryBillStore::with_bills(vec![bill.clone()]));
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()
        ));

        // jan 10 through apr 10
        let summary = service.generate_upcoming_bill_payments(user, None, &time).await.unwrap();
        assert_eq!(summary.created, 3);

        // extending to six months only adds the new dates
        let summary = service
            .generate_upcoming_bill_payments(user, Some(6), &time)
            .await
            .unwrap();
        assert_eq!(summary, EnsureSummary { created: 3, existing: 3 });
    }
}
