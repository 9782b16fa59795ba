//! Safety stock and reorder point.
//!
//! Core law, with service-level constant `z`:
//!
//! ```text
//! safety_stock  = ceil(z · σ_d · sqrt(L))
//! reorder_point = ceil(d · L + safety_stock)
//! ```
//!
//! Demand variability `σ_d` is not estimated from raw sales. It is
//! reverse-derived from the product's last approved safety stock, so every
//! scenario stays consistent with that policy.

use serde::{Deserialize, Serialize};

use stockwise_core::rounding::{ceil_units, round_percent};
use stockwise_core::{AnalyticsError, AnalyticsResult, MonthlyDemandSeries, ProductDemandProfile};

/// One-sided ~95% service level.
pub const DEFAULT_SERVICE_LEVEL_Z: f64 = 1.65;

/// Policy constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySettings {
    pub service_level_z: f64,
    /// Days used to turn monthly demand into daily demand.
    pub days_per_month: f64,
    /// Trailing months averaged for the baseline daily demand.
    pub demand_window_months: usize,
    /// Forward cover added on top of the reorder point when ordering.
    pub forward_cover_days: f64,
    /// Stock below `safety_stock · urgent_ratio` is urgent.
    pub urgent_ratio: f64,
    /// Fold lead-time deviation into the safety-stock law.
    pub include_lead_time_variability: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            service_level_z: DEFAULT_SERVICE_LEVEL_Z,
            days_per_month: 30.0,
            demand_window_months: 3,
            forward_cover_days: 30.0,
            urgent_ratio: 0.5,
            include_lead_time_variability: false,
        }
    }
}

impl PolicySettings {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.service_level_z.is_finite() && self.service_level_z > 0.0) {
            return Err(AnalyticsError::invalid("service_level_z must be a finite positive number"));
        }
        if !(self.days_per_month.is_finite() && self.days_per_month > 0.0) {
            return Err(AnalyticsError::invalid("days_per_month must be positive"));
        }
        if self.demand_window_months == 0 {
            return Err(AnalyticsError::invalid("demand_window_months must be >= 1"));
        }
        if !(self.forward_cover_days.is_finite() && self.forward_cover_days >= 0.0) {
            return Err(AnalyticsError::invalid("forward_cover_days must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.urgent_ratio) {
            return Err(AnalyticsError::invalid("urgent_ratio must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Stock adequacy against a policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Sufficient,
    NeedOrder,
    Urgent,
}

/// Where a policy row came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Baseline,
    User,
    Preset,
}

/// The product's current replenishment state, with `σ_d` already derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub demand_per_day: f64,
    pub lead_time_days: u32,
    pub lead_time_std_dev_days: f64,
    /// Reverse-derived demand standard deviation (units/day).
    pub demand_std_dev: f64,
    pub current_safety_stock: u64,
    pub current_stock: u64,
}

/// A perturbation of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    pub name: String,
    pub kind: ScenarioKind,
    pub demand_change_percent: f64,
    pub lead_time_change_days: i32,
}

impl Perturbation {
    pub fn baseline() -> Self {
        Self {
            name: "Baseline".to_string(),
            kind: ScenarioKind::Baseline,
            demand_change_percent: 0.0,
            lead_time_change_days: 0,
        }
    }
}

/// Policy outcome for the baseline or one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResult {
    pub scenario_name: String,
    pub kind: ScenarioKind,
    pub demand_change_percent: f64,
    pub lead_time_change_days: i32,
    /// Units per day.
    pub adjusted_demand: f64,
    /// Days, never below 1.
    pub adjusted_lead_time: u32,
    pub new_safety_stock: u64,
    pub new_reorder_point: u64,
    pub stock_status: StockStatus,
    pub required_order_quantity: u64,
    /// `current_stock / new_safety_stock · 100`, 0 without safety stock.
    pub safety_stock_ratio: f64,
}

/// The shared policy law, used for the baseline and every scenario.
#[derive(Debug, Clone, Default)]
pub struct PolicyCalculator {
    settings: PolicySettings,
}

impl PolicyCalculator {
    pub fn new(settings: PolicySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    /// Daily demand from the trailing window of monthly history (0 if empty).
    pub fn daily_demand(&self, history: &MonthlyDemandSeries) -> f64 {
        history.trailing_mean(self.settings.demand_window_months) / self.settings.days_per_month
    }

    /// Baseline for `profile`, with daily demand taken from `history`.
    pub fn baseline(
        &self,
        profile: &ProductDemandProfile,
        history: &MonthlyDemandSeries,
    ) -> AnalyticsResult<Baseline> {
        profile.validate()?;
        self.baseline_from(
            self.daily_demand(history),
            profile.lead_time_days,
            profile.lead_time_std_dev_days.unwrap_or(0.0),
            profile.current_safety_stock,
            profile.current_stock,
        )
    }

    pub fn baseline_from(
        &self,
        demand_per_day: f64,
        lead_time_days: u32,
        lead_time_std_dev_days: f64,
        current_safety_stock: u64,
        current_stock: u64,
    ) -> AnalyticsResult<Baseline> {
        self.settings.validate()?;
        if lead_time_days < 1 {
            return Err(AnalyticsError::invalid("lead_time_days must be >= 1"));
        }
        if !(demand_per_day.is_finite() && demand_per_day >= 0.0) {
            return Err(AnalyticsError::invalid(
                "demand_per_day must be a finite non-negative number",
            ));
        }
        if !(lead_time_std_dev_days.is_finite() && lead_time_std_dev_days >= 0.0) {
            return Err(AnalyticsError::invalid("lead_time_std_dev_days must be >= 0"));
        }
        let demand_std_dev = self.reverse_derive_std_dev(
            current_safety_stock,
            lead_time_days,
            demand_per_day,
            lead_time_std_dev_days,
        );
        Ok(Baseline {
            demand_per_day,
            lead_time_days,
            lead_time_std_dev_days,
            demand_std_dev,
            current_safety_stock,
            current_stock,
        })
    }

    /// `σ_d` such that the safety-stock law reproduces `safety_stock`.
    pub fn reverse_derive_std_dev(
        &self,
        safety_stock: u64,
        lead_time_days: u32,
        demand_per_day: f64,
        lead_time_std_dev_days: f64,
    ) -> f64 {
        let z = self.settings.service_level_z;
        let l = lead_time_days.max(1) as f64;
        let s = safety_stock as f64;
        if self.uses_lead_time_variability(lead_time_std_dev_days) {
            let lead_time_part = (demand_per_day * lead_time_std_dev_days).powi(2);
            (((s / z).powi(2) - lead_time_part) / l).max(0.0).sqrt()
        } else {
            s / (z * l.sqrt())
        }
    }

    pub fn safety_stock(
        &self,
        demand_std_dev: f64,
        lead_time_days: u32,
        demand_per_day: f64,
        lead_time_std_dev_days: f64,
    ) -> u64 {
        let z = self.settings.service_level_z;
        let l = lead_time_days.max(1) as f64;
        if self.uses_lead_time_variability(lead_time_std_dev_days) {
            let variance =
                l * demand_std_dev.powi(2) + (demand_per_day * lead_time_std_dev_days).powi(2);
            ceil_units(z * variance.sqrt())
        } else {
            ceil_units(z * demand_std_dev * l.sqrt())
        }
    }

    pub fn reorder_point(
        &self,
        demand_per_day: f64,
        lead_time_days: u32,
        safety_stock: u64,
    ) -> u64 {
        ceil_units(demand_per_day * lead_time_days as f64 + safety_stock as f64)
    }

    pub fn classify(
        &self,
        current_stock: u64,
        safety_stock: u64,
        reorder_point: u64,
    ) -> StockStatus {
        let stock = current_stock as f64;
        if stock < safety_stock as f64 * self.settings.urgent_ratio {
            StockStatus::Urgent
        } else if current_stock <= reorder_point {
            StockStatus::NeedOrder
        } else {
            StockStatus::Sufficient
        }
    }

    /// Enough to reach the reorder point plus the forward cover window.
    pub fn required_order_quantity(
        &self,
        status: StockStatus,
        reorder_point: u64,
        demand_per_day: f64,
        current_stock: u64,
    ) -> u64 {
        if status == StockStatus::Sufficient {
            return 0;
        }
        let target = reorder_point as f64 + demand_per_day * self.settings.forward_cover_days;
        ceil_units(target - current_stock as f64)
    }

    /// Apply the policy law to `baseline` under `perturbation`.
    pub fn evaluate(&self, baseline: &Baseline, perturbation: &Perturbation) -> PolicyResult {
        let factor = 1.0 + perturbation.demand_change_percent / 100.0;
        let adjusted_demand = (baseline.demand_per_day * factor).max(0.0);
        let adjusted_lead_time =
            adjusted_lead_time(baseline.lead_time_days, perturbation.lead_time_change_days);
        let adjusted_std_dev = (baseline.demand_std_dev * factor).max(0.0);

        let new_safety_stock = self.safety_stock(
            adjusted_std_dev,
            adjusted_lead_time,
            adjusted_demand,
            baseline.lead_time_std_dev_days,
        );
        let new_reorder_point =
            self.reorder_point(adjusted_demand, adjusted_lead_time, new_safety_stock);
        let stock_status =
            self.classify(baseline.current_stock, new_safety_stock, new_reorder_point);
        let required_order_quantity = self.required_order_quantity(
            stock_status,
            new_reorder_point,
            adjusted_demand,
            baseline.current_stock,
        );
        let safety_stock_ratio = if new_safety_stock == 0 {
            0.0
        } else {
            round_percent(baseline.current_stock as f64 / new_safety_stock as f64 * 100.0)
        };

        PolicyResult {
            scenario_name: perturbation.name.clone(),
            kind: perturbation.kind,
            demand_change_percent: perturbation.demand_change_percent,
            lead_time_change_days: perturbation.lead_time_change_days,
            adjusted_demand,
            adjusted_lead_time,
            new_safety_stock,
            new_reorder_point,
            stock_status,
            required_order_quantity,
            safety_stock_ratio,
        }
    }

    fn uses_lead_time_variability(&self, lead_time_std_dev_days: f64) -> bool {
        self.settings.include_lead_time_variability && lead_time_std_dev_days > 0.0
    }
}

/// `max(1, lead_time + delta)`.
pub fn adjusted_lead_time(lead_time_days: u32, change_days: i32) -> u32 {
    (i64::from(lead_time_days) + i64::from(change_days)).clamp(1, i64::from(u32::MAX)) as u32
}
