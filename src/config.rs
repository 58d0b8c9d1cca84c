use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};

/// start of a known pay period, every period is a whole number of cycles from it
pub const DEFAULT_REFERENCE_DATE: (i32, u32, u32) = (2025, 11, 26);

/// library configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FinanceConfig {
    pub pay_schedule: PayScheduleConfig,
    pub payoff: PayoffConfig,
    pub recurrence: RecurrenceConfig,
}

/// bi-weekly pay schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayScheduleConfig {
    pub reference_date: NaiveDate,
}

impl Default for PayScheduleConfig {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_REFERENCE_DATE;
        Self {
            reference_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
        }
    }
}

/// amortization simulation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// longest schedule produced before giving up (50 years)
    pub max_months: u32,
    /// remaining balance treated as paid off
    pub payoff_tolerance: Money,
    /// month length used to turn weekly installments into months
    pub average_month_days: Decimal,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            max_months: 600,
            payoff_tolerance: Money::CENT,
            average_month_days: dec!(30.44),
        }
    }
}

/// bill materialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    /// horizon for upcoming bill generation when none is given
    pub upcoming_months: u32,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self { upcoming_months: 3 }
    }
}

impl FinanceConfig {
    /// parse configuration from json, missing sections fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FinanceConfig =
            serde_json::from_str(json).map_err(|e| FinanceError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// serialize configuration to pretty json
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FinanceError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.payoff.max_months == 0 {
            return Err(FinanceError::InvalidConfiguration {
                message: "max_months must be greater than zero".to_string(),
            });
        }
        if self.payoff.payoff_tolerance.is_negative() {
            return Err(FinanceError::InvalidConfiguration {
                message: "payoff_tolerance cannot be negative".to_string(),
            });
        }
        if self.payoff.average_month_days <= Decimal::ZERO {
            return Err(FinanceError::InvalidConfiguration {
                message: "average_month_days must be positive".to_string(),
            });
        }
        Ok(())
    }
}
