use std::path::Path;
use std::sync::Arc;

use stockwise_engine::{InMemoryCatalog, ReplenishmentConfig, ReplenishmentService};

/// The service instance shared by every handler.
pub type AppServices = ReplenishmentService<InMemoryCatalog>;

/// Build the replenishment service, loading the catalog from `seed_file`
/// when one is given.
pub fn build_services(
    config: ReplenishmentConfig,
    seed_file: Option<&Path>,
) -> anyhow::Result<AppServices> {
    let catalog = match seed_file {
        Some(path) => {
            let catalog = InMemoryCatalog::from_json_file(path)?;
            tracing::info!(seed_file = %path.display(), "catalog loaded");
            catalog
        }
        None => InMemoryCatalog::new(),
    };
    Ok(ReplenishmentService::new(Arc::new(catalog), config))
}
