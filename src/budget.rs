use serde::{Deserialize, Serialize};

use crate::bills::BillPayment;
use crate::decimal::Money;
use crate::periods::PayPeriod;

/// what one paycheck has to cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriodBudget {
    pub period: PayPeriod,
    pub income: Money,
    pub total_due: Money,
    pub total_paid: Money,
    pub total_unpaid: Money,
    /// income minus everything due, paid or not; negative when overcommitted
    pub remaining_after_bills: Money,
    /// payments due inside the period, earliest first
    pub payments: Vec<BillPayment>,
}

impl PayPeriodBudget {
    /// summarize the payments that fall due inside `period`
    ///
    /// Payments dated outside the window are ignored, so callers can pass
    /// everything they loaded for a wider range.
    pub fn summarize(period: PayPeriod, income: Money, payments: &[BillPayment]) -> Self {
        let mut in_period: Vec<BillPayment> = payments
            .iter()
            .filter(|p| period.contains(p.due_date))
            .cloned()
            .collect();
        in_period.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.bill_id.cmp(&b.bill_id)));

        let total_due: Money = in_period.iter().map(|p| p.amount).sum();
        let total_paid: Money = in_period.iter().filter(|p| p.is_paid()).map(|p| p.amount).sum();

        Self {
            period,
            income,
            total_due,
            total_paid,
            total_unpaid: total_due - total_paid,
            remaining_after_bills: income - total_due,
            payments: in_period,
        }
    }

    pub fn is_overcommitted(&self) -> bool {
        self.remaining_after_bills.is_negative()
    }

    pub fn unpaid(&self) -> impl Iterator<Item = &BillPayment> {
        self.payments.iter().filter(|p| !p.is_paid())
    }
}
