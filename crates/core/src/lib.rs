//! `stockwise-core`: shared building blocks for the replenishment analytics.
//!
//! This crate contains **pure data** primitives (no IO, no infrastructure).

pub mod error;
pub mod id;
pub mod job;
pub mod month;
pub mod profile;
pub mod rounding;
pub mod series;

pub use error::{AnalyticsError, AnalyticsResult};
pub use id::{ProductId, TenantId};
pub use job::AnalyticsJob;
pub use month::YearMonth;
pub use profile::{AbcGrade, ProductDemandProfile, ProductOption, XyzGrade};
pub use series::{DemandPoint, MIN_FORECAST_POINTS, MonthlyDemandSeries};
