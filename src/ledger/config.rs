use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BankError, Result};
use crate::money::Money;

/// Parameters of the recurring tax/bonus/lottery job and the transfer
/// approval threshold. Mutable only through a privileged actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    pub tax_rate: f64,
    pub hourly_bonus: Money,
    pub lottery_prize: Money,
    pub approval_limit: Money,
    pub interval_ms: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.02,
            hourly_bonus: Money::from_units(10),
            lottery_prize: Money::from_units(100),
            approval_limit: Money::from_units(100),
            interval_ms: 60 * 60 * 1000,
        }
    }
}

impl JobConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(BankError::InvalidInput(
                "tax rate must be within [0, 1)".into(),
            ));
        }
        if self.hourly_bonus.cents() < 0 {
            return Err(BankError::InvalidInput(
                "hourly bonus must not be negative".into(),
            ));
        }
        if self.lottery_prize.cents() < 0 {
            return Err(BankError::InvalidInput(
                "lottery prize must not be negative".into(),
            ));
        }
        if self.approval_limit.cents() < 0 {
            return Err(BankError::InvalidInput(
                "approval limit must not be negative".into(),
            ));
        }
        if self.interval_ms == 0 {
            return Err(BankError::InvalidInput(
                "job interval must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
