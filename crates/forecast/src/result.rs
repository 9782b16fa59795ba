use serde::{Deserialize, Serialize};

use stockwise_core::{DemandPoint, MonthlyDemandSeries, ProductId};

use crate::accuracy::Confidence;
use crate::method::ForecastMethod;

/// Forecast for one product: what was chosen, how well it back-tests, and
/// the projected months.
///
/// This is an analytics result, not a stored record. Callers may persist or
/// display it as they see fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub product_id: ProductId,
    /// Method and the parameters actually used.
    pub method: ForecastMethod,
    pub is_manual: bool,
    pub seasonally_adjusted: bool,
    pub confidence: Confidence,
    /// Back-test MAPE in percent; `None` when there was nothing to score.
    pub mape: Option<f64>,
    /// Human-readable explanation of the method choice.
    pub selection_reason: String,
    pub history: MonthlyDemandSeries,
    /// Starts the month after the last history month, one point per month.
    pub predicted: Vec<DemandPoint>,
}
