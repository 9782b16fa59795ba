//! The two replenishment entry points: forecast and scenario simulation.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use stockwise_core::{AnalyticsError, ProductDemandProfile, ProductId, ProductOption, TenantId};
use stockwise_forecast::{ForecastInput, ForecastJob, ForecastResult, ManualSelection};
use stockwise_policy::{
    PolicyCalculator, PolicyResult, ScenarioInput, ScenarioJob, ScenarioSimulator,
};

use crate::config::ReplenishmentConfig;
use crate::provider::{ProviderError, ReplenishmentSource};
use crate::runner::{JobRunner, LocalJobRunner};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Forecast request: which product, and optionally which method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastRequest {
    /// `None` only lists the products.
    pub product_id: Option<ProductId>,
    pub manual: Option<ManualSelection>,
}

impl ForecastRequest {
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            manual: None,
        }
    }

    pub fn with_manual(mut self, manual: ManualSelection) -> Self {
        self.manual = Some(manual);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub products: Vec<ProductOption>,
    /// `None` when no product was requested or its history is too short.
    pub forecast: Option<ForecastResult>,
}

/// Read-only replenishment analytics over a host-supplied source.
#[derive(Debug)]
pub struct ReplenishmentService<S> {
    source: Arc<S>,
    config: ReplenishmentConfig,
    runner: LocalJobRunner,
}

impl<S: ReplenishmentSource> ReplenishmentService<S> {
    pub fn new(source: Arc<S>, config: ReplenishmentConfig) -> Self {
        Self {
            source,
            config,
            runner: LocalJobRunner::default(),
        }
    }

    pub fn with_runner(mut self, runner: LocalJobRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn config(&self) -> &ReplenishmentConfig {
        &self.config
    }

    /// Product picker entries, ordered by SKU.
    pub fn list_products(&self, tenant_id: TenantId) -> Result<Vec<ProductOption>, ServiceError> {
        let mut products: Vec<ProductOption> = self
            .source
            .products(tenant_id)?
            .iter()
            .map(ProductDemandProfile::option)
            .collect();
        products.sort_by(|a, b| a.sku.cmp(&b.sku).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    pub fn compute_forecast(
        &self,
        tenant_id: TenantId,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, ServiceError> {
        let products = self.list_products(tenant_id)?;
        let Some(product_id) = request.product_id else {
            return Ok(ForecastResponse {
                products,
                forecast: None,
            });
        };

        let profile = self.profile(tenant_id, product_id)?;
        let history = self
            .source
            .monthly_demand(tenant_id, product_id, self.config.history_months)?;

        let job = ForecastJob::new(tenant_id, ForecastInput { profile, history })
            .with_manual(request.manual)
            .with_selection_policy(self.config.selection.clone())
            .with_backtest_policy(self.config.backtest.clone())
            .with_horizon(self.config.forecast_horizon);

        let forecast = match self.runner.run(job) {
            Ok(f) => {
                info!(
                    %tenant_id,
                    %product_id,
                    method = %f.method,
                    confidence = ?f.confidence,
                    "forecast computed"
                );
                Some(f)
            }
            Err(AnalyticsError::InsufficientData { available, required }) => {
                info!(
                    %tenant_id,
                    %product_id,
                    available,
                    required,
                    "not enough history to forecast"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ForecastResponse { products, forecast })
    }

    /// Baseline, user scenario, then presets.
    pub fn simulate_scenarios(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        demand_change_percent: f64,
        lead_time_change_days: i32,
    ) -> Result<Vec<PolicyResult>, ServiceError> {
        let profile = self.profile(tenant_id, product_id)?;
        let history = self
            .source
            .monthly_demand(tenant_id, product_id, self.config.history_months)?;

        let simulator = ScenarioSimulator::new(PolicyCalculator::new(self.config.policy.clone()));
        let job = ScenarioJob::new(
            tenant_id,
            ScenarioInput {
                profile,
                history,
                demand_change_percent,
                lead_time_change_days,
            },
        )
        .with_simulator(simulator);

        let rows = self.runner.run(job)?;
        info!(
            %tenant_id,
            %product_id,
            demand_change_percent,
            lead_time_change_days,
            scenarios = rows.len(),
            "scenarios simulated"
        );
        Ok(rows)
    }

    /// Catalog profile with the latest classification applied.
    fn profile(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<ProductDemandProfile, ServiceError> {
        let mut profile = self
            .source
            .product(tenant_id, product_id)?
            .ok_or(ServiceError::ProductNotFound(product_id))?;
        if let Some(c) = self.source.classification(tenant_id, product_id)? {
            c.apply_to(&mut profile);
        }
        Ok(profile)
    }
}
