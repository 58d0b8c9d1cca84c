pub mod bills;
pub mod budget;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payoff;
pub mod periods;
pub mod types;

use std::sync::Once;

// re-export key types
pub use bills::{
    due_dates_for_bill, Bill, BillPayment, BillPaymentService, BillStore, EnsureSummary,
    InMemoryBillStore, NewBillPayment, RecurrenceRule,
};
pub use budget::PayPeriodBudget;
pub use config::{FinanceConfig, PayScheduleConfig, PayoffConfig, RecurrenceConfig};
pub use decimal::{Money, Rate};
pub use errors::{FinanceError, Result, StoreError, StoreResult};
pub use payoff::{
    calculate_effective_apr, effective_rate_for_sorting, prioritize_debts, BnplTerms, Debt,
    DebtPayoffInput, PayoffCalculator, PayoffComparison, PayoffResult, PayoffScheduleEntry,
    PayoffStrategy,
};
pub use periods::{Direction, PayPeriod, PayPeriodEngine};
pub use types::{
    BillFrequency, BillId, BillPaymentId, BillPaymentStatus, DebtId, InstallmentFrequency, UserId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

static TRACING_INIT: Once = Once::new();

/// install a fmt subscriber driven by `RUST_LOG`, once per process
pub fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "personal_finance_rs=info".parse() {
            filter = filter.add_directive(directive);
        }

        // another subscriber may already be installed by the host application
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
