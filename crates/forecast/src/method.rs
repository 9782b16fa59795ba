//! Point-forecast methods: SMA, SES and Holt's linear trend.
//!
//! Each method turns a demand history into a single next-period estimate.
//! SMA and SES repeat that estimate across the horizon; Holt's extrapolates its
//! trend linearly. Outputs are clamped at zero since demand cannot be negative.

use serde::{Deserialize, Serialize};

use stockwise_core::{AnalyticsError, AnalyticsResult, MIN_FORECAST_POINTS};

/// Method family, without parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    #[serde(rename = "SMA", alias = "sma")]
    Sma,
    #[serde(rename = "SES", alias = "ses")]
    Ses,
    #[serde(rename = "Holts", alias = "holts", alias = "HOLTS")]
    Holts,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Sma => "SMA",
            MethodKind::Ses => "SES",
            MethodKind::Holts => "Holts",
        }
    }
}

impl core::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully parameterized forecast method.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ForecastMethod {
    #[serde(rename = "SMA", rename_all = "camelCase")]
    Sma { window_size: usize },
    #[serde(rename = "SES")]
    Ses { alpha: f64 },
    #[serde(rename = "Holts")]
    Holts { alpha: f64, beta: f64 },
}

impl ForecastMethod {
    pub fn kind(&self) -> MethodKind {
        match self {
            ForecastMethod::Sma { .. } => MethodKind::Sma,
            ForecastMethod::Ses { .. } => MethodKind::Ses,
            ForecastMethod::Holts { .. } => MethodKind::Holts,
        }
    }

    /// Reject out-of-domain parameters before any computation runs.
    pub fn validate(&self) -> AnalyticsResult<()> {
        match *self {
            ForecastMethod::Sma { window_size } => {
                if window_size < 2 {
                    return Err(AnalyticsError::invalid(format!(
                        "SMA window_size must be >= 2 (got {window_size})"
                    )));
                }
            }
            ForecastMethod::Ses { alpha } => check_unit_open("alpha", alpha)?,
            ForecastMethod::Holts { alpha, beta } => {
                check_unit_open("alpha", alpha)?;
                check_unit_open("beta", beta)?;
            }
        }
        Ok(())
    }

    /// Forecast `horizon` periods after the end of `values`.
    pub fn forecast(&self, values: &[f64], horizon: usize) -> AnalyticsResult<Vec<f64>> {
        self.validate()?;
        match *self {
            ForecastMethod::Sma { window_size } => {
                let level = simple_moving_average(values, window_size)?;
                Ok(vec![level.max(0.0); horizon])
            }
            ForecastMethod::Ses { alpha } => {
                let level = simple_exponential_smoothing(values, alpha)?;
                Ok(vec![level.max(0.0); horizon])
            }
            ForecastMethod::Holts { alpha, beta } => {
                let state = holts_linear(values, alpha, beta)?;
                Ok((1..=horizon).map(|h| state.at(h)).collect())
            }
        }
    }
}

impl core::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ForecastMethod::Sma { window_size } => write!(f, "SMA(window={window_size})"),
            ForecastMethod::Ses { alpha } => write!(f, "SES(alpha={alpha})"),
            ForecastMethod::Holts { alpha, beta } => write!(f, "Holts(alpha={alpha}, beta={beta})"),
        }
    }
}

fn check_unit_open(name: &str, v: f64) -> AnalyticsResult<()> {
    if v.is_finite() && v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(AnalyticsError::invalid(format!("{name} must be in (0, 1) (got {v})")))
    }
}

fn ensure_len(values: &[f64]) -> AnalyticsResult<()> {
    if values.len() < MIN_FORECAST_POINTS {
        return Err(AnalyticsError::insufficient(values.len(), MIN_FORECAST_POINTS));
    }
    Ok(())
}

/// Mean of the last `window_size` values.
///
/// A window longer than the series is clamped to the series length.
pub fn simple_moving_average(values: &[f64], window_size: usize) -> AnalyticsResult<f64> {
    ensure_len(values)?;
    let window = window_size.min(values.len());
    let tail = &values[values.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}

/// Last smoothed level of `s_t = α·x_t + (1−α)·s_{t−1}`, seeded with `x_1`.
pub fn simple_exponential_smoothing(values: &[f64], alpha: f64) -> AnalyticsResult<f64> {
    ensure_len(values)?;
    let mut s = values[0];
    for &x in &values[1..] {
        s = alpha * x + (1.0 - alpha) * s;
    }
    Ok(s)
}

/// Final level and trend of Holt's double exponential smoothing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HoltState {
    pub level: f64,
    pub trend: f64,
}

impl HoltState {
    /// Forecast `h` steps ahead, floored at zero.
    pub fn at(&self, h: usize) -> f64 {
        (self.level + h as f64 * self.trend).max(0.0)
    }
}

/// Holt's linear trend smoothing, seeded with `L_1 = x_1`, `T_1 = x_2 − x_1`.
pub fn holts_linear(values: &[f64], alpha: f64, beta: f64) -> AnalyticsResult<HoltState> {
    ensure_len(values)?;
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    for &x in &values[1..] {
        let prev_level = level;
        level = alpha * x + (1.0 - alpha) * (prev_level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }
    Ok(HoltState { level, trend })
}
