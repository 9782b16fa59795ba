//! Seasonal detection and multiplicative seasonal indices.

use stockwise_core::{MonthlyDemandSeries, YearMonth};

/// Months per seasonal cycle.
pub const SEASON_LENGTH: usize = 12;

const EPS: f64 = 1e-9;

/// Dispersion of month-over-month deltas relative to the mean demand level.
///
/// Population stddev of the deltas divided by the series mean. `None` when the
/// series is too short or its mean is zero.
pub fn swing_coefficient(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let level = values.iter().sum::<f64>() / values.len() as f64;
    if level <= EPS {
        return None;
    }
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
    let var = deltas.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / deltas.len() as f64;
    Some(var.sqrt() / level)
}

/// Whether a series shows enough repeating swing to warrant seasonal adjustment.
pub fn is_seasonal(series: &MonthlyDemandSeries, min_months: usize, swing_threshold: f64) -> bool {
    if series.len() < min_months.max(SEASON_LENGTH) {
        return false;
    }
    swing_coefficient(&series.values()).is_some_and(|cv| cv > swing_threshold)
}

/// Multiplicative seasonal factor per calendar month, normalized to mean 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalIndex {
    factors: [f64; SEASON_LENGTH],
}

impl SeasonalIndex {
    /// Estimate indices from at least a year of history.
    ///
    /// Ratios to a centered 2x12 moving average are averaged per calendar
    /// month. Months the moving average never covers fall back to their mean
    /// over the overall mean.
    pub fn fit(series: &MonthlyDemandSeries) -> Option<Self> {
        let n = series.len();
        if n < SEASON_LENGTH {
            return None;
        }
        let values = series.values();
        let overall = values.iter().sum::<f64>() / n as f64;
        if overall <= EPS {
            return None;
        }
        let months: Vec<usize> = series.points().iter().map(|p| p.month.month0()).collect();

        let half = SEASON_LENGTH / 2;
        let mut ratio_sum = [0.0; SEASON_LENGTH];
        let mut ratio_n = [0usize; SEASON_LENGTH];
        for t in half..n.saturating_sub(half) {
            let inner: f64 = values[t - half + 1..t + half].iter().sum();
            let edges = 0.5 * values[t - half] + 0.5 * values[t + half];
            let cma = (edges + inner) / SEASON_LENGTH as f64;
            if cma > EPS {
                ratio_sum[months[t]] += values[t] / cma;
                ratio_n[months[t]] += 1;
            }
        }

        let mut raw_sum = [0.0; SEASON_LENGTH];
        let mut raw_n = [0usize; SEASON_LENGTH];
        for (&m, &v) in months.iter().zip(&values) {
            raw_sum[m] += v;
            raw_n[m] += 1;
        }

        let mut factors = [1.0; SEASON_LENGTH];
        for m in 0..SEASON_LENGTH {
            if ratio_n[m] > 0 {
                factors[m] = ratio_sum[m] / ratio_n[m] as f64;
            } else if raw_n[m] > 0 {
                factors[m] = raw_sum[m] / raw_n[m] as f64 / overall;
            }
        }

        let mean = factors.iter().sum::<f64>() / SEASON_LENGTH as f64;
        if mean > EPS {
            for f in &mut factors {
                *f /= mean;
            }
        }
        for f in &mut factors {
            if *f <= EPS {
                *f = 1.0;
            }
        }
        Some(Self { factors })
    }

    pub fn factor(&self, month: YearMonth) -> f64 {
        self.factors[month.month0()]
    }

    pub fn factors(&self) -> &[f64; SEASON_LENGTH] {
        &self.factors
    }

    /// History with each point divided by its month's factor.
    pub fn deseasonalize(&self, series: &MonthlyDemandSeries) -> Vec<f64> {
        series
            .points()
            .iter()
            .map(|p| p.quantity as f64 / self.factor(p.month))
            .collect()
    }

    /// Re-apply factors to a forecast whose first period is `first_month`.
    pub fn reseasonalize(&self, first_month: YearMonth, forecast: &[f64]) -> Vec<f64> {
        let mut month = first_month;
        let mut out = Vec::with_capacity(forecast.len());
        for &v in forecast {
            out.push(v * self.factor(month));
            month = month.succ();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(years: usize) -> MonthlyDemandSeries {
        // Winter peak, summer trough around a level of 105.
        let pattern = [160, 150, 120, 90, 70, 60, 60, 70, 90, 110, 130, 150];
        let q: Vec<u64> = (0..years * 12).map(|i| pattern[i % 12]).collect();
        MonthlyDemandSeries::from_quantities(YearMonth::new(2022, 1).unwrap(), &q)
    }

    #[test]
    fn flat_series_has_no_swing() {
        assert_eq!(swing_coefficient(&[50.0; 12]), Some(0.0));
        assert_eq!(swing_coefficient(&[0.0; 12]), None);
    }

    #[test]
    fn short_history_is_never_seasonal() {
        let start = YearMonth::new(2024, 1).unwrap();
        let s = MonthlyDemandSeries::from_quantities(start, &[10, 90, 10, 90]);
        assert!(!is_seasonal(&s, 12, 0.25));
    }

    #[test]
    fn swinging_year_is_seasonal() {
        assert!(is_seasonal(&seasonal_series(2), 12, 0.1));
    }

    #[test]
    fn swing_equal_to_threshold_is_not_seasonal() {
        let s = seasonal_series(2);
        let cv = swing_coefficient(&s.values()).unwrap();
        assert!(!is_seasonal(&s, 12, cv));
        assert!(is_seasonal(&s, 12, cv - 1e-9));
    }

    #[test]
    fn indices_are_normalized_and_track_peaks() {
        let idx = SeasonalIndex::fit(&seasonal_series(3)).unwrap();
        let mean = idx.factors().iter().sum::<f64>() / 12.0;
        assert!((mean - 1.0).abs() < 1e-9);

        let jan = YearMonth::new(2030, 1).unwrap();
        let jun = YearMonth::new(2030, 6).unwrap();
        assert!(idx.factor(jan) > 1.0);
        assert!(idx.factor(jun) < 1.0);
    }

    #[test]
    fn one_year_falls_back_to_ratio_to_mean() {
        let idx = SeasonalIndex::fit(&seasonal_series(1)).unwrap();
        // Level is 105; January is 160.
        let jan = YearMonth::new(2022, 1).unwrap();
        assert!((idx.factor(jan) - 160.0 / 105.0).abs() < 1e-9);
    }

    #[test]
    fn deseasonalize_then_reseasonalize_is_identity() {
        let s = seasonal_series(2);
        let idx = SeasonalIndex::fit(&s).unwrap();
        let flat = idx.deseasonalize(&s);
        let back = idx.reseasonalize(s.first_month().unwrap(), &flat);
        for (b, p) in back.iter().zip(s.points()) {
            assert!((b - p.quantity as f64).abs() < 1e-6);
        }
    }
}
