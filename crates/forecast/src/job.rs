use tracing::debug;

use stockwise_core::rounding::{round_percent, round_units};
use stockwise_core::{
    AnalyticsError, AnalyticsJob, AnalyticsResult, DemandPoint, MonthlyDemandSeries,
    ProductDemandProfile, TenantId,
};

use crate::accuracy::{BacktestPolicy, backtest};
use crate::projection::project;
use crate::result::ForecastResult;
use crate::seasonality::is_seasonal;
use crate::selector::{ManualSelection, SelectionPolicy, select_method};

/// Months forecast when no horizon is configured.
pub const DEFAULT_HORIZON: usize = 3;

/// Everything a forecast needs about one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInput {
    pub profile: ProductDemandProfile,
    pub history: MonthlyDemandSeries,
}

/// Deterministic demand forecast for a single product.
///
/// Pipeline:
/// - select a method (or take the manual override),
/// - decide on seasonal adjustment,
/// - project the horizon,
/// - back-test the same method for MAPE/confidence.
#[derive(Debug, Clone)]
pub struct ForecastJob {
    tenant_id: TenantId,
    input: ForecastInput,
    manual: Option<ManualSelection>,
    selection: SelectionPolicy,
    backtest: BacktestPolicy,
    horizon: usize,
}

impl ForecastJob {
    pub fn new(tenant_id: TenantId, input: ForecastInput) -> Self {
        Self {
            tenant_id,
            input,
            manual: None,
            selection: SelectionPolicy::default(),
            backtest: BacktestPolicy::default(),
            horizon: DEFAULT_HORIZON,
        }
    }

    pub fn with_manual(mut self, manual: Option<ManualSelection>) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection = policy;
        self
    }

    pub fn with_backtest_policy(mut self, policy: BacktestPolicy) -> Self {
        self.backtest = policy;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }
}

impl AnalyticsJob for ForecastJob {
    type Input = ForecastInput;
    type Output = ForecastResult;

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn kind(&self) -> &'static str {
        "replenishment.forecast"
    }

    fn run(&self) -> AnalyticsResult<ForecastResult> {
        if self.horizon == 0 {
            return Err(AnalyticsError::invalid("forecast horizon must be >= 1"));
        }

        let ForecastInput { profile, history } = &self.input;
        history.ensure_forecastable()?;

        let selection = match &self.manual {
            Some(manual) => manual.resolve(&self.selection)?,
            None => select_method(profile, history.len(), &self.selection)?,
        };
        let seasonal = is_seasonal(
            history,
            self.selection.seasonal_min_months,
            self.selection.seasonal_swing_threshold,
        );

        let projected = project(history, &selection.method, seasonal, self.horizon)?;
        let scored = backtest(history, &selection.method, seasonal, &self.backtest)?;

        debug!(
            product_id = %profile.id,
            method = %selection.method,
            manual = selection.is_manual,
            seasonal,
            mape = ?scored.mape,
            scored_points = scored.scored_points,
            "forecast computed"
        );

        let mut predicted = Vec::with_capacity(projected.len());
        if let Some(last) = history.last_month() {
            let mut month = last.succ();
            for v in projected {
                predicted.push(DemandPoint::new(month, round_units(v)));
                month = month.succ();
            }
        }

        Ok(ForecastResult {
            product_id: profile.id,
            method: selection.method,
            is_manual: selection.is_manual,
            seasonally_adjusted: seasonal,
            confidence: scored.confidence,
            mape: scored.mape.map(round_percent),
            selection_reason: if scored.mape.is_none() && !selection.is_manual {
                format!("{}; low confidence, no backtest", selection.reason)
            } else {
                selection.reason
            },
            history: history.clone(),
            predicted,
        })
    }
}
