//! Seams to the host system.
//!
//! The analytics never fetch data themselves. The host implements these
//! traits over whatever persistence it has; [`crate::catalog::InMemoryCatalog`]
//! implements all of them for tests and the standalone server.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockwise_core::{
    AbcGrade, MonthlyDemandSeries, ProductDemandProfile, ProductId, TenantId, XyzGrade,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider returned malformed data: {0}")]
    Malformed(String),
}

/// Product attributes needed for replenishment.
pub trait ProductCatalog: Send + Sync {
    fn products(&self, tenant_id: TenantId) -> Result<Vec<ProductDemandProfile>, ProviderError>;

    fn product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<ProductDemandProfile>, ProviderError>;
}

/// Monthly aggregated units sold.
pub trait DemandHistoryProvider: Send + Sync {
    /// Up to `months` trailing months, oldest first.
    fn monthly_demand(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        months: usize,
    ) -> Result<MonthlyDemandSeries, ProviderError>;
}

/// Latest classification run for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(default)]
    pub abc_grade: Option<AbcGrade>,
    #[serde(default)]
    pub xyz_grade: Option<XyzGrade>,
    #[serde(default)]
    pub turnover_rate: Option<f64>,
    #[serde(default)]
    pub yoy_growth_rate: Option<f64>,
    #[serde(default)]
    pub is_overstock: bool,
}

impl Classification {
    /// Overlay this classification onto a catalog profile.
    pub fn apply_to(&self, profile: &mut ProductDemandProfile) {
        profile.abc_grade = self.abc_grade;
        profile.xyz_grade = self.xyz_grade;
        profile.turnover_rate = self.turnover_rate;
        profile.yoy_growth_rate = self.yoy_growth_rate;
        profile.is_overstock = self.is_overstock;
    }
}

/// ABC/XYZ classification results, when the host keeps them apart from the catalog.
pub trait ClassificationProvider: Send + Sync {
    /// `None` keeps whatever classification the catalog profile carries.
    fn classification(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Classification>, ProviderError>;
}

/// Everything the replenishment service reads.
pub trait ReplenishmentSource:
    ProductCatalog + DemandHistoryProvider + ClassificationProvider
{
}

impl<T> ReplenishmentSource for T where
    T: ProductCatalog + DemandHistoryProvider + ClassificationProvider
{
}
