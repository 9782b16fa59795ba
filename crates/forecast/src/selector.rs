//! Method selection: classification signals in, parameterized method out.

use serde::{Deserialize, Serialize};

use stockwise_core::{
    AnalyticsError, AnalyticsResult, MIN_FORECAST_POINTS, ProductDemandProfile, XyzGrade,
};

use crate::method::{ForecastMethod, MethodKind};

/// Tunable thresholds and parameters for automatic selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// |YoY growth| (percent) at or above which the trend-aware method wins.
    pub trend_yoy_threshold: f64,
    pub trend_alpha: f64,
    pub trend_beta: f64,
    /// SMA window for stable (X) demand.
    pub stable_window: usize,
    /// SES alpha for moderately variable (Y) demand.
    pub moderate_alpha: f64,
    /// SES alpha for erratic (Z) demand.
    pub erratic_alpha: f64,
    /// Without an XYZ grade, histories at least this long use SES.
    pub long_history_months: usize,
    pub seasonal_min_months: usize,
    pub seasonal_swing_threshold: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            trend_yoy_threshold: 15.0,
            trend_alpha: 0.3,
            trend_beta: 0.1,
            stable_window: 3,
            moderate_alpha: 0.3,
            erratic_alpha: 0.5,
            long_history_months: 6,
            seasonal_min_months: 12,
            seasonal_swing_threshold: 0.15,
        }
    }
}

impl SelectionPolicy {
    /// Every method this policy can emit must itself be valid.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.trend_yoy_threshold.is_finite() && self.trend_yoy_threshold >= 0.0) {
            return Err(AnalyticsError::invalid("trend_yoy_threshold must be >= 0"));
        }
        if !(self.seasonal_swing_threshold.is_finite() && self.seasonal_swing_threshold >= 0.0) {
            return Err(AnalyticsError::invalid("seasonal_swing_threshold must be >= 0"));
        }
        ForecastMethod::Holts {
            alpha: self.trend_alpha,
            beta: self.trend_beta,
        }
        .validate()?;
        ForecastMethod::Sma {
            window_size: self.stable_window,
        }
        .validate()?;
        ForecastMethod::Ses {
            alpha: self.moderate_alpha,
        }
        .validate()?;
        ForecastMethod::Ses {
            alpha: self.erratic_alpha,
        }
        .validate()
    }
}

/// A chosen method with the reason shown to users.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub method: ForecastMethod,
    pub reason: String,
    pub is_manual: bool,
}

/// Pick a method for `profile` given how many months of history exist.
pub fn select_method(
    profile: &ProductDemandProfile,
    history_len: usize,
    policy: &SelectionPolicy,
) -> AnalyticsResult<Selection> {
    if history_len < MIN_FORECAST_POINTS {
        return Err(AnalyticsError::insufficient(history_len, MIN_FORECAST_POINTS));
    }

    if let Some(yoy) = profile.yoy_growth_rate.filter(|y| y.is_finite()) {
        if yoy.abs() >= policy.trend_yoy_threshold {
            return Ok(auto(
                ForecastMethod::Holts {
                    alpha: policy.trend_alpha,
                    beta: policy.trend_beta,
                },
                format!("trend-aware method selected due to significant YoY change ({yoy:+.1}%)"),
            ));
        }
    }

    let selection = match profile.xyz_grade {
        Some(XyzGrade::X) => auto(
            ForecastMethod::Sma {
                window_size: policy.stable_window,
            },
            format!(
                "stable demand (XYZ grade X): moving average of the last {} months",
                policy.stable_window
            ),
        ),
        Some(XyzGrade::Y) => auto(
            ForecastMethod::Ses {
                alpha: policy.moderate_alpha,
            },
            format!(
                "moderate demand variability (XYZ grade Y): exponential smoothing, alpha {}",
                policy.moderate_alpha
            ),
        ),
        Some(XyzGrade::Z) => auto(
            ForecastMethod::Ses {
                alpha: policy.erratic_alpha,
            },
            format!(
                "erratic demand (XYZ grade Z): exponential smoothing weighted to recent months, \
                 alpha {}",
                policy.erratic_alpha
            ),
        ),
        None if history_len >= policy.long_history_months => auto(
            ForecastMethod::Ses {
                alpha: policy.moderate_alpha,
            },
            format!(
                "no variability grade; {history_len} months of history support exponential \
                 smoothing"
            ),
        ),
        None => {
            let window_size = policy.stable_window.min(history_len);
            auto(
                ForecastMethod::Sma { window_size },
                format!(
                    "no variability grade; short history ({history_len} months) uses a moving \
                     average"
                ),
            )
        }
    };
    Ok(selection)
}

fn auto(method: ForecastMethod, reason: String) -> Selection {
    Selection {
        method,
        reason,
        is_manual: false,
    }
}

/// Optional parameters for a manually chosen method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManualParams {
    #[serde(default)]
    pub window_size: Option<usize>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
}

/// A caller-supplied override that bypasses automatic selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualSelection {
    pub method: MethodKind,
    #[serde(default)]
    pub params: ManualParams,
}

impl ManualSelection {
    pub fn new(method: MethodKind) -> Self {
        Self {
            method,
            params: ManualParams::default(),
        }
    }

    pub fn with_params(mut self, params: ManualParams) -> Self {
        self.params = params;
        self
    }

    /// Fill unset parameters from `policy` and validate the result.
    pub fn resolve(&self, policy: &SelectionPolicy) -> AnalyticsResult<Selection> {
        let p = self.params;
        let method = match self.method {
            MethodKind::Sma => ForecastMethod::Sma {
                window_size: p.window_size.unwrap_or(policy.stable_window),
            },
            MethodKind::Ses => ForecastMethod::Ses {
                alpha: p.alpha.unwrap_or(policy.moderate_alpha),
            },
            MethodKind::Holts => ForecastMethod::Holts {
                alpha: p.alpha.unwrap_or(policy.trend_alpha),
                beta: p.beta.unwrap_or(policy.trend_beta),
            },
        };
        method.validate()?;
        Ok(Selection {
            method,
            reason: "manually selected".to_string(),
            is_manual: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_core::ProductId;

    fn profile(xyz: Option<XyzGrade>, yoy: Option<f64>) -> ProductDemandProfile {
        ProductDemandProfile {
            id: ProductId::new(),
            sku: "SKU".to_string(),
            name: "Thing".to_string(),
            abc_grade: None,
            xyz_grade: xyz,
            turnover_rate: None,
            yoy_growth_rate: yoy,
            is_overstock: false,
            lead_time_days: 7,
            lead_time_std_dev_days: None,
            current_safety_stock: 0,
            current_reorder_point: 0,
            current_stock: 0,
        }
    }

    fn pick(xyz: Option<XyzGrade>, yoy: Option<f64>, len: usize) -> ForecastMethod {
        select_method(&profile(xyz, yoy), len, &SelectionPolicy::default())
            .unwrap()
            .method
    }

    #[test]
    fn strong_yoy_change_selects_holts_regardless_of_grade() {
        let m = pick(Some(XyzGrade::X), Some(-15.0), 12);
        assert_eq!(m, ForecastMethod::Holts { alpha: 0.3, beta: 0.1 });

        let s = select_method(&profile(None, Some(22.0)), 12, &SelectionPolicy::default()).unwrap();
        assert!(s.reason.starts_with("trend-aware method selected due to significant YoY change"));
        assert!(!s.is_manual);
    }

    #[test]
    fn xyz_grade_drives_selection_below_trend_threshold() {
        assert_eq!(pick(Some(XyzGrade::X), Some(14.9), 12), ForecastMethod::Sma { window_size: 3 });
        assert_eq!(pick(Some(XyzGrade::Y), None, 12), ForecastMethod::Ses { alpha: 0.3 });
        assert_eq!(pick(Some(XyzGrade::Z), None, 12), ForecastMethod::Ses { alpha: 0.5 });
    }

    #[test]
    fn unknown_grade_falls_back_on_history_length() {
        assert_eq!(pick(None, None, 6), ForecastMethod::Ses { alpha: 0.3 });
        assert_eq!(pick(None, None, 5), ForecastMethod::Sma { window_size: 3 });
        // The window never exceeds the data, but stays >= 2.
        assert_eq!(pick(None, None, 2), ForecastMethod::Sma { window_size: 2 });
    }

    #[test]
    fn short_history_selects_nothing() {
        let err = select_method(&profile(None, None), 1, &SelectionPolicy::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
    }

    #[test]
    fn manual_selection_fills_defaults_and_validates() {
        let policy = SelectionPolicy::default();
        let s = ManualSelection::new(MethodKind::Holts)
            .with_params(ManualParams {
                alpha: Some(0.6),
                ..Default::default()
            })
            .resolve(&policy)
            .unwrap();
        assert_eq!(s.method, ForecastMethod::Holts { alpha: 0.6, beta: 0.1 });
        assert!(s.is_manual);
        assert_eq!(s.reason, "manually selected");

        let bad = ManualSelection::new(MethodKind::Sma).with_params(ManualParams {
            window_size: Some(1),
            ..Default::default()
        });
        assert!(matches!(bad.resolve(&policy), Err(AnalyticsError::InvalidParameter(_))));
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(SelectionPolicy::default().validate().is_ok());
        let broken = SelectionPolicy {
            erratic_alpha: 1.0,
            ..Default::default()
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn manual_params_reject_unknown_keys() {
        let p: ManualParams = serde_json::from_str(r#"{"windowSize": 6}"#).unwrap();
        assert_eq!(p.window_size, Some(6));
        assert!(serde_json::from_str::<ManualParams>(r#"{"window_size": 6}"#).is_err());
        assert!(serde_json::from_str::<ManualParams>(r#"{"alpah": 0.4}"#).is_err());
    }
}
