//! Analytics error model.

use thiserror::Error;

/// Result type used across the analytics crates.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Deterministic, caller-recoverable analytics failure.
///
/// None of these are fatal: the caller fixes its input (or accepts a degraded
/// result) and tries again. Data-fetch failures belong to the provider layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The demand series is too short for the requested computation.
    #[error("insufficient data: {available} month(s) available, {required} required")]
    InsufficientData { available: usize, required: usize },

    /// A parameter was outside its valid domain (e.g. alpha not in (0, 1)).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every back-tested actual was zero, so MAPE is undefined.
    #[error("degenerate backtest: no non-zero actuals to score against")]
    DegenerateBacktest,
}

impl AnalyticsError {
    pub fn insufficient(available: usize, required: usize) -> Self {
        Self::InsufficientData {
            available,
            required,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
