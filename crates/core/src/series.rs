//! Monthly demand series.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::month::YearMonth;

/// Minimum number of months any forecast needs.
pub const MIN_FORECAST_POINTS: usize = 2;

/// Units sold (or forecast) for a single month.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub month: YearMonth,
    pub quantity: u64,
}

impl DemandPoint {
    pub fn new(month: YearMonth, quantity: u64) -> Self {
        Self { month, quantity }
    }
}

/// Chronologically ordered monthly demand for one product.
///
/// Months are strictly increasing. Consecutive points are assumed to be
/// adjacent months; providers are expected to zero-fill gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DemandPoint>", into = "Vec<DemandPoint>")]
pub struct MonthlyDemandSeries {
    points: Vec<DemandPoint>,
}

impl MonthlyDemandSeries {
    pub fn new(points: Vec<DemandPoint>) -> AnalyticsResult<Self> {
        if let Some(w) = points.windows(2).find(|w| w[0].month >= w[1].month) {
            return Err(AnalyticsError::invalid(format!(
                "demand series must be chronological ({} is followed by {})",
                w[0].month, w[1].month
            )));
        }
        Ok(Self { points })
    }

    /// Build a contiguous series starting at `start`.
    pub fn from_quantities(start: YearMonth, quantities: &[u64]) -> Self {
        let mut month = start;
        let mut points = Vec::with_capacity(quantities.len());
        for &quantity in quantities {
            points.push(DemandPoint::new(month, quantity));
            month = month.succ();
        }
        Self { points }
    }

    pub fn points(&self) -> &[DemandPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_month(&self) -> Option<YearMonth> {
        self.points.first().map(|p| p.month)
    }

    pub fn last_month(&self) -> Option<YearMonth> {
        self.points.last().map(|p| p.month)
    }

    /// Quantities as floats, in order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity as f64).collect()
    }

    /// `true` when the series is long enough to forecast from.
    pub fn is_forecastable(&self) -> bool {
        self.len() >= MIN_FORECAST_POINTS
    }

    pub fn ensure_forecastable(&self) -> AnalyticsResult<()> {
        if self.is_forecastable() {
            Ok(())
        } else {
            Err(AnalyticsError::insufficient(self.len(), MIN_FORECAST_POINTS))
        }
    }

    /// The first `len` points (used for holdout back-testing).
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            points: self.points[..len.min(self.points.len())].to_vec(),
        }
    }

    /// Mean monthly quantity over the last `months` points (0 when empty).
    pub fn trailing_mean(&self, months: usize) -> f64 {
        let take = months.min(self.len());
        if take == 0 {
            return 0.0;
        }
        let tail = &self.points[self.len() - take..];
        tail.iter().map(|p| p.quantity as f64).sum::<f64>() / take as f64
    }
}

impl TryFrom<Vec<DemandPoint>> for MonthlyDemandSeries {
    type Error = AnalyticsError;

    fn try_from(points: Vec<DemandPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<MonthlyDemandSeries> for Vec<DemandPoint> {
    fn from(series: MonthlyDemandSeries) -> Self {
        series.points
    }
}
