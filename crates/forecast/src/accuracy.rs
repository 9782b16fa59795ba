//! Back-testing and confidence scoring.

use serde::{Deserialize, Serialize};

use stockwise_core::{AnalyticsError, AnalyticsResult, MIN_FORECAST_POINTS, MonthlyDemandSeries};

use crate::method::ForecastMethod;
use crate::projection::project;

/// How trustworthy a forecast is, as displayed to users.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Back-test window and confidence cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestPolicy {
    /// Rolling-origin holdout size once that many months are testable.
    pub rolling_points: usize,
    /// MAPE strictly below this is `High`.
    pub high_below: f64,
    /// MAPE strictly below this (and not `High`) is `Medium`.
    pub medium_below: f64,
}

impl Default for BacktestPolicy {
    fn default() -> Self {
        Self {
            rolling_points: 3,
            high_below: 15.0,
            medium_below: 30.0,
        }
    }
}

impl BacktestPolicy {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.rolling_points == 0 {
            return Err(AnalyticsError::invalid("rolling_points must be >= 1"));
        }
        let finite = self.high_below.is_finite() && self.medium_below.is_finite();
        if !(finite && self.high_below <= self.medium_below) {
            return Err(AnalyticsError::invalid(
                "confidence cut-offs must be finite with high_below <= medium_below",
            ));
        }
        Ok(())
    }

    /// Bucket a MAPE; an undefined MAPE is always `Low`.
    pub fn confidence(&self, mape: Option<f64>) -> Confidence {
        match mape {
            Some(m) if m < self.high_below => Confidence::High,
            Some(m) if m < self.medium_below => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// Outcome of a back-test.
#[derive(Debug, Clone, PartialEq)]
pub struct Backtest {
    /// Percent; `None` when nothing could be scored.
    pub mape: Option<f64>,
    pub confidence: Confidence,
    /// Months held out and scored (zero actuals excluded).
    pub scored_points: usize,
}

/// Mean absolute percentage error over `(actual, forecast)` pairs, in percent.
///
/// Pairs with a zero actual carry no percentage error and are skipped; if
/// nothing is left the result is [`AnalyticsError::DegenerateBacktest`].
pub fn mean_absolute_percentage_error(pairs: &[(f64, f64)]) -> AnalyticsResult<f64> {
    let errors: Vec<f64> = pairs
        .iter()
        .filter(|(actual, _)| *actual > 0.0)
        .map(|(actual, forecast)| (actual - forecast).abs() / actual)
        .collect();
    if errors.is_empty() {
        return Err(AnalyticsError::DegenerateBacktest);
    }
    Ok(errors.iter().sum::<f64>() / errors.len() as f64 * 100.0)
}

/// Rolling-origin back-test of `method` on `series`.
///
/// Each held-out month is forecast one step ahead from the history before
/// it. With at least `rolling_points` testable months the last
/// `rolling_points` are averaged; otherwise only the final month is held out.
pub fn backtest(
    series: &MonthlyDemandSeries,
    method: &ForecastMethod,
    seasonal: bool,
    policy: &BacktestPolicy,
) -> AnalyticsResult<Backtest> {
    let n = series.len();
    let testable = n.saturating_sub(MIN_FORECAST_POINTS);
    let holdout = if testable >= policy.rolling_points {
        policy.rolling_points
    } else {
        testable.min(1)
    };

    let mut pairs = Vec::with_capacity(holdout);
    for origin in n - holdout..n {
        let train = series.prefix(origin);
        let predicted = project(&train, method, seasonal, 1)?;
        let actual = series.points()[origin].quantity as f64;
        pairs.push((actual, predicted.first().copied().unwrap_or(0.0)));
    }

    let mape = match mean_absolute_percentage_error(&pairs) {
        Ok(m) => Some(m),
        Err(AnalyticsError::DegenerateBacktest) => None,
        Err(e) => return Err(e),
    };
    Ok(Backtest {
        mape,
        confidence: policy.confidence(mape),
        scored_points: pairs.iter().filter(|(a, _)| *a > 0.0).count(),
    })
}
