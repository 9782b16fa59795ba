use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use stockwise_core::{MonthlyDemandSeries, ProductDemandProfile, ProductId, TenantId};

use crate::provider::{
    Classification, ClassificationProvider, DemandHistoryProvider, ProductCatalog, ProviderError,
};
use crate::store::{InMemoryTenantStore, TenantStore};

/// In-memory implementation of every provider seam.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    profiles: InMemoryTenantStore<ProductId, ProductDemandProfile>,
    histories: InMemoryTenantStore<ProductId, MonthlyDemandSeries>,
    classifications: InMemoryTenantStore<ProductId, Classification>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_profile(&self, tenant_id: TenantId, profile: ProductDemandProfile) {
        self.profiles.upsert(tenant_id, profile.id, profile);
    }

    pub fn upsert_history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        history: MonthlyDemandSeries,
    ) {
        self.histories.upsert(tenant_id, product_id, history);
    }

    pub fn upsert_classification(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        classification: Classification,
    ) {
        self.classifications.upsert(tenant_id, product_id, classification);
    }

    /// Load every tenant and product from a seed.
    pub fn load(&self, seed: CatalogSeed) {
        for tenant in seed.tenants {
            for product in tenant.products {
                let id = product.profile.id;
                self.upsert_profile(tenant.tenant_id, product.profile);
                self.upsert_history(tenant.tenant_id, id, product.history);
                if let Some(c) = product.classification {
                    self.upsert_classification(tenant.tenant_id, id, c);
                }
            }
        }
    }

    /// Read a JSON [`CatalogSeed`] from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let seed: CatalogSeed = serde_json::from_str(&raw)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        let catalog = Self::new();
        catalog.load(seed);
        Ok(catalog)
    }
}

/// Serialized catalog contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    pub tenants: Vec<TenantSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSeed {
    pub tenant_id: TenantId,
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSeed {
    pub profile: ProductDemandProfile,
    #[serde(default)]
    pub history: MonthlyDemandSeries,
    #[serde(default)]
    pub classification: Option<Classification>,
}

impl ProductCatalog for InMemoryCatalog {
    fn products(&self, tenant_id: TenantId) -> Result<Vec<ProductDemandProfile>, ProviderError> {
        Ok(self.profiles.list(tenant_id))
    }

    fn product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<ProductDemandProfile>, ProviderError> {
        Ok(self.profiles.get(tenant_id, &product_id))
    }
}

impl DemandHistoryProvider for InMemoryCatalog {
    fn monthly_demand(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        months: usize,
    ) -> Result<MonthlyDemandSeries, ProviderError> {
        let full = self.histories.get(tenant_id, &product_id).unwrap_or_default();
        let skip = full.len().saturating_sub(months);
        MonthlyDemandSeries::new(full.points()[skip..].to_vec())
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

impl ClassificationProvider for InMemoryCatalog {
    fn classification(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Classification>, ProviderError> {
        Ok(self.classifications.get(tenant_id, &product_id))
    }
}
