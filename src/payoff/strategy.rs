use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::payoff::{effective_rate_for_sorting, BnplTerms, DebtPayoffInput};
use crate::types::{DebtId, UserId};

/// order in which extra money is thrown at debts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffStrategy {
    /// highest rate first, ties go to the smaller balance
    Avalanche,
    /// smallest balance first, ties go to the higher rate
    Snowball,
}

/// a debt being tracked for payoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub user_id: UserId,
    pub name: String,
    pub balance: Money,
    pub apr: Rate,
    pub minimum_payment: Money,
    /// set for buy-now-pay-later plans
    pub bnpl: Option<BnplTerms>,
}

impl Debt {
    pub fn new(user_id: UserId, name: impl Into<String>, balance: Money, apr: Rate, minimum_payment: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            balance,
            apr,
            minimum_payment,
            bnpl: None,
        }
    }

    pub fn with_bnpl_terms(mut self, terms: BnplTerms) -> Self {
        self.bnpl = Some(terms);
        self
    }

    /// stated rate, raised to the implied rate for BNPL plans
    pub fn sorting_rate(&self) -> Rate {
        match &self.bnpl {
            Some(terms) => effective_rate_for_sorting(self.apr, terms),
            None => self.apr,
        }
    }

    pub fn payoff_input(&self, extra_payment: Money) -> DebtPayoffInput {
        DebtPayoffInput::new(self.balance, self.apr, self.minimum_payment).with_extra_payment(extra_payment)
    }
}

/// debts in the order they should be paid down, settled debts dropped
pub fn prioritize_debts(debts: &[Debt], strategy: PayoffStrategy) -> Vec<&Debt> {
    let mut open: Vec<&Debt> = debts.iter().filter(|d| d.balance.is_positive()).collect();
    open.sort_by(|a, b| compare(a, b, strategy));
    open
}

fn compare(a: &Debt, b: &Debt, strategy: PayoffStrategy) -> Ordering {
    match strategy {
        PayoffStrategy::Avalanche => b
            .sorting_rate()
            .cmp(&a.sorting_rate())
            .then_with(|| a.balance.cmp(&b.balance)),
        PayoffStrategy::Snowball => a
            .balance
            .cmp(&b.balance)
            .then_with(|| b.sorting_rate().cmp(&a.sorting_rate())),
    }
}
