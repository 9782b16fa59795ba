//! Replenishment configuration.
//!
//! Defaults carry the documented policy constants. Any of them can be
//! overridden with `STOCKWISE_*` environment variables; unparsable values are
//! logged and ignored.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use stockwise_core::{AnalyticsError, AnalyticsResult, MIN_FORECAST_POINTS};
use stockwise_forecast::{BacktestPolicy, DEFAULT_HORIZON, SelectionPolicy};
use stockwise_policy::PolicySettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentConfig {
    /// Months forecast past the last history month.
    pub forecast_horizon: usize,
    /// Trailing months requested from the demand history provider.
    pub history_months: usize,
    pub selection: SelectionPolicy,
    pub backtest: BacktestPolicy,
    pub policy: PolicySettings,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            forecast_horizon: DEFAULT_HORIZON,
            history_months: 24,
            selection: SelectionPolicy::default(),
            backtest: BacktestPolicy::default(),
            policy: PolicySettings::default(),
        }
    }
}

impl ReplenishmentConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> AnalyticsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from `lookup` (environment-shaped, for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AnalyticsResult<Self> {
        let mut cfg = Self::default();
        override_from(&lookup, "STOCKWISE_FORECAST_HORIZON", &mut cfg.forecast_horizon);
        override_from(&lookup, "STOCKWISE_HISTORY_MONTHS", &mut cfg.history_months);
        override_from(
            &lookup,
            "STOCKWISE_TREND_YOY_THRESHOLD",
            &mut cfg.selection.trend_yoy_threshold,
        );
        override_from(
            &lookup,
            "STOCKWISE_SEASONAL_SWING_THRESHOLD",
            &mut cfg.selection.seasonal_swing_threshold,
        );
        override_from(&lookup, "STOCKWISE_BACKTEST_POINTS", &mut cfg.backtest.rolling_points);
        override_from(&lookup, "STOCKWISE_SERVICE_LEVEL_Z", &mut cfg.policy.service_level_z);
        override_from(
            &lookup,
            "STOCKWISE_DEMAND_WINDOW_MONTHS",
            &mut cfg.policy.demand_window_months,
        );
        override_from(&lookup, "STOCKWISE_FORWARD_COVER_DAYS", &mut cfg.policy.forward_cover_days);
        override_from(
            &lookup,
            "STOCKWISE_LEAD_TIME_VARIABILITY",
            &mut cfg.policy.include_lead_time_variability,
        );
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.forecast_horizon == 0 {
            return Err(AnalyticsError::invalid("forecast_horizon must be >= 1"));
        }
        if self.history_months < MIN_FORECAST_POINTS {
            return Err(AnalyticsError::invalid("history_months must be >= 2"));
        }
        self.selection.validate()?;
        self.backtest.validate()?;
        self.policy.validate()
    }
}

fn override_from<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => *target = v,
        Err(_) => warn!(key, value = %raw, "ignoring unparsable configuration value"),
    }
}
