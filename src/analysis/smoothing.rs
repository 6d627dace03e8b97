//! Centered rolling mean used for presentation.

use super::{AnalysisError, Sector, SectorRecord, SmoothedRecord};
use std::collections::BTreeMap;

const LOG_TARGET: &str = " smoothing";

/// Default smoothing window, in years.
pub const DEFAULT_WINDOW: usize = 5;

/// Check that `window` is a positive odd number.
pub fn validate_window(window: usize) -> Result<(), AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Config("smoothing window must be positive".to_string()));
    }

    if window % 2 == 0 {
        return Err(AnalysisError::Config(format!("smoothing window must be odd, got {window}")));
    }

    Ok(())
}

/// Centered moving average over `window` points.
///
/// Near the ends of the series the window shrinks to the points that exist, so every input
/// point has a smoothed counterpart.
pub fn smooth(series: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    validate_window(window)?;

    if window == 1 {
        return Ok(series.to_vec());
    }

    let half = window / 2;
    let smoothed = (0..series.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(series.len() - 1);
            let points = &series[lo..=hi];

            #[expect(clippy::cast_precision_loss, reason = "windows are tiny")]
            let count = points.len() as f64;

            points.iter().sum::<f64>() / count
        })
        .collect();

    Ok(smoothed)
}

/// Smooth each sector's series independently.
///
/// Output is ordered by canonical sector order, then year.
pub fn smooth_sectors(records: &[SectorRecord], window: usize) -> Result<Vec<SmoothedRecord>, AnalysisError> {
    validate_window(window)?;

    let mut by_sector: BTreeMap<Sector, Vec<&SectorRecord>> = BTreeMap::new();
    for record in records {
        by_sector.entry(record.sector).or_default().push(record);
    }

    let mut smoothed = Vec::with_capacity(records.len());
    for series in by_sector.values_mut() {
        series.sort_by_key(|r| r.year);

        let values: Vec<f64> = series.iter().map(|r| r.emissions_mtco2).collect();
        for (record, value) in series.iter().zip(smooth(&values, window)?) {
            smoothed.push(SmoothedRecord {
                year: record.year,
                sector: record.sector,
                emissions_mtco2: record.emissions_mtco2,
                emissions_smoothed: value,
            });
        }
    }

    log::info!(target: LOG_TARGET, "Smoothed {} sector-year records (window {window})", smoothed.len());

    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "expected {e}, got {a}");
        }
    }

    #[test]
    fn test_window_one_is_identity() {
        let series = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(smooth(&series, 1).unwrap(), series.to_vec());
    }

    #[test]
    fn test_even_window_is_rejected() {
        let err = smooth(&[1.0, 2.0], 4).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert_eq!(smooth(&[1.0], 0).unwrap_err().kind(), "ConfigError");
    }

    #[test]
    fn test_window_three() {
        let smoothed = smooth(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_close(&smoothed, &[1.5, 2.0, 3.0, 3.5]);
    }

    #[test]
    fn test_seven_points_window_five_has_no_gaps() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let smoothed = smooth(&series, 5).unwrap();

        assert_eq!(smoothed.len(), series.len());
        assert!(smoothed.iter().all(|v| v.is_finite()));
        assert_close(&smoothed, &[2.0, 2.5, 3.0, 4.0, 5.0, 5.5, 6.0]);
    }

    #[test]
    fn test_window_larger_than_series() {
        let smoothed = smooth(&[2.0, 4.0], 9).unwrap();
        assert_close(&smoothed, &[3.0, 3.0]);
    }

    #[test]
    fn test_empty_series() {
        assert!(smooth(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_smooth_sectors_keeps_series_apart() {
        let records = vec![
            SectorRecord { year: 2000, sector: Sector::Oil, emissions_mtco2: 10.0 },
            SectorRecord { year: 2000, sector: Sector::Coal, emissions_mtco2: 1.0 },
            SectorRecord { year: 2001, sector: Sector::Oil, emissions_mtco2: 20.0 },
            SectorRecord { year: 2001, sector: Sector::Coal, emissions_mtco2: 3.0 },
        ];

        let smoothed = smooth_sectors(&records, 3).unwrap();
        let keys: Vec<(Sector, i32)> = smoothed.iter().map(|r| (r.sector, r.year)).collect();
        assert_eq!(keys, vec![(Sector::Coal, 2000), (Sector::Coal, 2001), (Sector::Oil, 2000), (Sector::Oil, 2001)]);

        let values: Vec<f64> = smoothed.iter().map(|r| r.emissions_smoothed).collect();
        assert_close(&values, &[2.0, 2.0, 15.0, 15.0]);
    }
}
