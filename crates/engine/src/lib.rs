//! `stockwise-engine`
//!
//! Wires the analytics crates to host-supplied data: provider traits, an
//! in-memory catalog, configuration, and [`ReplenishmentService`], which
//! exposes the forecast and scenario entry points.

pub mod catalog;
pub mod config;
pub mod provider;
pub mod runner;
pub mod service;
pub mod store;

pub use catalog::{CatalogSeed, InMemoryCatalog, ProductSeed, TenantSeed};
pub use config::ReplenishmentConfig;
pub use provider::{
    Classification, ClassificationProvider, DemandHistoryProvider, ProductCatalog, ProviderError,
    ReplenishmentSource,
};
pub use runner::{JobRunner, LocalJobRunner, TenantScope};
pub use service::{ForecastRequest, ForecastResponse, ReplenishmentService, ServiceError};
pub use store::{InMemoryTenantStore, TenantStore};
