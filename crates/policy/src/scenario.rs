//! What-if scenario simulation.

use core::ops::RangeInclusive;

use tracing::debug;

use stockwise_core::{
    AnalyticsError, AnalyticsJob, AnalyticsResult, MonthlyDemandSeries, ProductDemandProfile,
    TenantId,
};

use crate::calculator::{Baseline, Perturbation, PolicyCalculator, PolicyResult, ScenarioKind};

/// Accepted user demand change, percent.
pub const DEMAND_CHANGE_LIMITS: RangeInclusive<f64> = -50.0..=50.0;

/// Accepted user lead-time change, days.
pub const LEAD_TIME_CHANGE_LIMITS: RangeInclusive<i32> = -5..=10;

/// Curated presets, in display order.
pub const PRESETS: [(&str, f64, i32); 6] = [
    ("Demand +20%", 20.0, 0),
    ("Demand -20%", -20.0, 0),
    ("Lead time +5 days", 0.0, 5),
    ("Lead time -2 days", 0.0, -2),
    ("Worst case", 20.0, 5),
    ("Best case", -20.0, -2),
];

pub const USER_SCENARIO_NAME: &str = "Custom scenario";

/// Runs the shared policy law under each scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSimulator {
    calculator: PolicyCalculator,
}

impl ScenarioSimulator {
    pub fn new(calculator: PolicyCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &PolicyCalculator {
        &self.calculator
    }

    /// Baseline, then the user scenario, then [`PRESETS`].
    ///
    /// Every scenario perturbs the baseline independently; nothing compounds.
    pub fn simulate(
        &self,
        baseline: &Baseline,
        demand_change_percent: f64,
        lead_time_change_days: i32,
    ) -> AnalyticsResult<Vec<PolicyResult>> {
        validate_user_change(demand_change_percent, lead_time_change_days)?;

        let mut scenarios = Vec::with_capacity(PRESETS.len() + 2);
        scenarios.push(Perturbation::baseline());
        scenarios.push(Perturbation {
            name: USER_SCENARIO_NAME.to_string(),
            kind: ScenarioKind::User,
            demand_change_percent,
            lead_time_change_days,
        });
        scenarios.extend(PRESETS.iter().map(|&(name, demand, lead_time)| Perturbation {
            name: name.to_string(),
            kind: ScenarioKind::Preset,
            demand_change_percent: demand,
            lead_time_change_days: lead_time,
        }));

        Ok(scenarios
            .iter()
            .map(|p| self.calculator.evaluate(baseline, p))
            .collect())
    }
}

fn validate_user_change(
    demand_change_percent: f64,
    lead_time_change_days: i32,
) -> AnalyticsResult<()> {
    if !DEMAND_CHANGE_LIMITS.contains(&demand_change_percent) {
        return Err(AnalyticsError::invalid(format!(
            "demand_change_percent must be within {}..={} (got {demand_change_percent})",
            DEMAND_CHANGE_LIMITS.start(),
            DEMAND_CHANGE_LIMITS.end()
        )));
    }
    if !LEAD_TIME_CHANGE_LIMITS.contains(&lead_time_change_days) {
        return Err(AnalyticsError::invalid(format!(
            "lead_time_change_days must be within {}..={} (got {lead_time_change_days})",
            LEAD_TIME_CHANGE_LIMITS.start(),
            LEAD_TIME_CHANGE_LIMITS.end()
        )));
    }
    Ok(())
}

/// Input snapshot for a scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    pub profile: ProductDemandProfile,
    pub history: MonthlyDemandSeries,
    pub demand_change_percent: f64,
    pub lead_time_change_days: i32,
}

/// Scenario simulation for one product.
#[derive(Debug, Clone)]
pub struct ScenarioJob {
    tenant_id: TenantId,
    input: ScenarioInput,
    simulator: ScenarioSimulator,
}

impl ScenarioJob {
    pub fn new(tenant_id: TenantId, input: ScenarioInput) -> Self {
        Self {
            tenant_id,
            input,
            simulator: ScenarioSimulator::default(),
        }
    }

    pub fn with_simulator(mut self, simulator: ScenarioSimulator) -> Self {
        self.simulator = simulator;
        self
    }
}

impl AnalyticsJob for ScenarioJob {
    type Input = ScenarioInput;
    type Output = Vec<PolicyResult>;

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn kind(&self) -> &'static str {
        "replenishment.scenarios"
    }

    fn run(&self) -> AnalyticsResult<Vec<PolicyResult>> {
        let baseline = self
            .simulator
            .calculator()
            .baseline(&self.input.profile, &self.input.history)?;
        debug!(
            product_id = %self.input.profile.id,
            demand_per_day = baseline.demand_per_day,
            demand_std_dev = baseline.demand_std_dev,
            lead_time_days = baseline.lead_time_days,
            "scenario baseline derived"
        );
        self.simulator.simulate(
            &baseline,
            self.input.demand_change_percent,
            self.input.lead_time_change_days,
        )
    }
}
