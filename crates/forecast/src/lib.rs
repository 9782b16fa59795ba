//! `stockwise-forecast`
//!
//! **Responsibility:** per-product demand forecasting.
//!
//! - Method library (SMA, SES, Holt's) and seasonal indices.
//! - Automatic method selection from classification signals.
//! - Rolling-origin back-testing for MAPE and confidence.
//!
//! Everything here is pure and deterministic; inputs are snapshots supplied by
//! the caller.

pub mod accuracy;
pub mod job;
pub mod method;
pub mod projection;
pub mod result;
pub mod seasonality;
pub mod selector;

pub use accuracy::{Backtest, BacktestPolicy, Confidence, backtest, mean_absolute_percentage_error};
pub use job::{DEFAULT_HORIZON, ForecastInput, ForecastJob};
pub use method::{ForecastMethod, HoltState, MethodKind};
pub use projection::project;
pub use result::ForecastResult;
pub use seasonality::{SeasonalIndex, is_seasonal, swing_coefficient};
pub use selector::{ManualParams, ManualSelection, Selection, SelectionPolicy, select_method};
