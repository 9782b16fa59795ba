use stockwise_core::{AnalyticsResult, MonthlyDemandSeries};

use crate::method::ForecastMethod;
use crate::seasonality::SeasonalIndex;

/// Forecast `horizon` months past the end of `series`.
///
/// With `seasonal` set and at least a year of data, the method runs on the
/// deseasonalized history and its output is re-multiplied by each future
/// month's index. Otherwise the method runs on the raw quantities.
pub fn project(
    series: &MonthlyDemandSeries,
    method: &ForecastMethod,
    seasonal: bool,
    horizon: usize,
) -> AnalyticsResult<Vec<f64>> {
    series.ensure_forecastable()?;
    let index = if seasonal { SeasonalIndex::fit(series) } else { None };
    match (index, series.last_month()) {
        (Some(index), Some(last)) => {
            let adjusted = index.deseasonalize(series);
            let raw = method.forecast(&adjusted, horizon)?;
            Ok(index.reseasonalize(last.succ(), &raw))
        }
        _ => method.forecast(&series.values(), horizon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_core::YearMonth;

    #[test]
    fn seasonal_projection_follows_the_calendar() {
        let pattern = [160, 150, 120, 90, 70, 60, 60, 70, 90, 110, 130, 150];
        let q: Vec<u64> = (0..24).map(|i| pattern[i % 12]).collect();
        let s = MonthlyDemandSeries::from_quantities(YearMonth::new(2022, 1).unwrap(), &q);
        let m = ForecastMethod::Sma { window_size: 12 };

        let flat = project(&s, &m, false, 6).unwrap();
        assert!(flat.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));

        // Next months are Jan..Jun 2024: January must come out above June.
        let seasonal = project(&s, &m, true, 6).unwrap();
        assert!(seasonal[0] > seasonal[5]);
    }

    #[test]
    fn seasonal_flag_is_ignored_for_short_series() {
        let start = YearMonth::new(2024, 1).unwrap();
        let s = MonthlyDemandSeries::from_quantities(start, &[100, 120, 140]);
        let m = ForecastMethod::Sma { window_size: 3 };
        assert_eq!(project(&s, &m, true, 3).unwrap(), project(&s, &m, false, 3).unwrap());
    }
}
