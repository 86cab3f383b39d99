use crate::error::BillingError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargePolicy {
    pub time_allowed: i64,
    pub grace_period: i64,
    pub hourly_rate: i64,
}

impl Default for ChargePolicy {
    fn default() -> Self {
        ChargePolicy {
            time_allowed: BillingConfig::TIME_ALLOWED,
            grace_period: BillingConfig::GRACE_PERIOD,
            hourly_rate: BillingConfig::HOURLY_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub time_allowed: i64,
    pub grace_period: i64,
    pub hourly_rate: i64,
    pub workstation_time_allowed: HashMap<String, i64>,
    pub bill_gates: bool,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            time_allowed: Self::TIME_ALLOWED,
            grace_period: Self::GRACE_PERIOD,
            hourly_rate: Self::HOURLY_RATE,
            workstation_time_allowed: HashMap::new(),
            bill_gates: false,
        }
    }
}

impl BillingConfig {
    const TIME_ALLOWED: i64 = 180;
    const GRACE_PERIOD: i64 = 10;
    const HOURLY_RATE: i64 = 100;
    const MAX_MINUTES: i64 = 24 * 60;
    const MAX_HOURLY_RATE: i64 = 1_000_000;

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, BillingError> {
        let data = std::fs::read_to_string(path)?;
        let config: BillingConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BillingError> {
        let check = |field: &str, value: i64, max: i64| {
            if (0..=max).contains(&value) {
                Ok(())
            } else {
                Err(BillingError::ConfigValue {
                    field: field.to_string(),
                    value,
                    max,
                })
            }
        };

        check("time_allowed", self.time_allowed, Self::MAX_MINUTES)?;
        check("grace_period", self.grace_period, Self::MAX_MINUTES)?;
        check("hourly_rate", self.hourly_rate, Self::MAX_HOURLY_RATE)?;
        for (workstation, allowed) in &self.workstation_time_allowed {
            check(
                &format!("workstation_time_allowed.{}", workstation),
                *allowed,
                Self::MAX_MINUTES,
            )?;
        }
        Ok(())
    }

    pub fn policy_for(&self, workstation: &str) -> ChargePolicy {
        ChargePolicy {
            time_allowed: self
                .workstation_time_allowed
                .get(workstation)
                .copied()
                .unwrap_or(self.time_allowed),
            grace_period: self.grace_period,
            hourly_rate: self.hourly_rate,
        }
    }
}
