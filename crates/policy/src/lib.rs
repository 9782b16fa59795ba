//! `stockwise-policy`
//!
//! Replenishment policy: safety stock, reorder point, stock status and
//! what-if scenarios. The baseline and every scenario go through the same
//! [`PolicyCalculator`], so there is exactly one implementation of the law.

pub mod calculator;
pub mod scenario;

pub use calculator::{
    Baseline, DEFAULT_SERVICE_LEVEL_Z, Perturbation, PolicyCalculator, PolicyResult, PolicySettings,
    ScenarioKind, StockStatus, adjusted_lead_time,
};
pub use scenario::{
    DEMAND_CHANGE_LIMITS, LEAD_TIME_CHANGE_LIMITS, PRESETS, ScenarioInput, ScenarioJob,
    ScenarioSimulator, USER_SCENARIO_NAME,
};
