//! Kaya identity decomposition using the additive Log-Mean Divisia Index.
//!
//! The Kaya identity factors total emissions as
//!
//! ```text
//! CO2 = P × (GDP / P) × (CO2 / GDP) = P × A × I
//! ```
//!
//! For a period from year 0 to year T, the change in emissions splits into
//!
//! ```text
//! ΔCO2 = L × ln(P_T / P_0) + L × ln(A_T / A_0) + L × ln(I_T / I_0)
//! ```
//!
//! where `L` is the logarithmic mean of `CO2_0` and `CO2_T`. Since the three log-ratios sum
//! to `ln(CO2_T / CO2_0)`, the effects add up to `ΔCO2` exactly.

use super::safe_math::divide;
use super::{AnalysisError, AnnualRecord, LmdiPeriodResult};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "      lmdi";

/// Tolerance below which two emission totals are treated as equal.
pub const LMDI_EPSILON: f64 = 1e-9;

/// A named end of the available year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Earliest,
    Latest,
}

/// One boundary of a requested period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum YearBound {
    Year(i32),
    Anchor(Anchor),
}

impl YearBound {
    const fn resolve(self, earliest: i32, latest: i32) -> i32 {
        match self {
            Self::Year(year) => year,
            Self::Anchor(Anchor::Earliest) => earliest,
            Self::Anchor(Anchor::Latest) => latest,
        }
    }
}

/// A `(start, end)` period to decompose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodRequest {
    pub start: YearBound,
    pub end: YearBound,
}

impl PeriodRequest {
    #[must_use]
    pub const fn years(start: i32, end: i32) -> Self {
        Self {
            start: YearBound::Year(start),
            end: YearBound::Year(end),
        }
    }

    /// 1990 to the latest year, 2000 to 2019, and 2019 to the latest year.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        let latest = YearBound::Anchor(Anchor::Latest);
        vec![
            Self {
                start: YearBound::Year(1990),
                end: latest,
            },
            Self::years(2000, 2019),
            Self {
                start: YearBound::Year(2019),
                end: latest,
            },
        ]
    }
}

/// Kaya factors for a single year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KayaFactors {
    pub co2: f64,
    pub population: f64,
    pub affluence: Option<f64>,
    pub intensity: Option<f64>,
}

impl KayaFactors {
    #[must_use]
    pub fn from_record(record: &AnnualRecord) -> Self {
        Self {
            co2: record.total_co2,
            population: record.population,
            affluence: divide(record.gdp, record.population),
            intensity: divide(record.total_co2, record.gdp),
        }
    }
}

/// Logarithmic mean of two emission totals, used as the LMDI weight.
///
/// When the totals are equal within [`LMDI_EPSILON`], or their logarithms are, the weight is
/// `start` (its limit), or 1 when `start` is zero.
#[must_use]
pub fn log_mean(start: f64, end: f64) -> f64 {
    let fallback = if start == 0.0 { 1.0 } else { start };

    if (end - start).abs() < LMDI_EPSILON {
        return fallback;
    }

    let ln_diff = end.ln() - start.ln();
    if ln_diff.abs() < LMDI_EPSILON {
        return fallback;
    }

    (end - start) / ln_diff
}

/// Contribution of one factor: `weight × ln(end / start)`.
///
/// Undefined when the factor is missing at either end, its start value is not positive,
/// or the result is not finite.
#[must_use]
pub fn factor_effect(weight: f64, start: Option<f64>, end: Option<f64>) -> Option<f64> {
    let start = start.filter(|&s| s > 0.0)?;
    let ratio = divide(end?, start)?;
    let effect = weight * ratio.ln();
    effect.is_finite().then_some(effect)
}

/// Pick the record closest to `requested`.
///
/// `records` must be sorted by year. Ties go to the earlier year.
#[must_use]
pub fn nearest_record(records: &[AnnualRecord], requested: i32) -> Option<&AnnualRecord> {
    records.iter().min_by_key(|r| r.year.abs_diff(requested))
}

/// Decompose each requested period, in request order.
pub fn decompose(records: &[AnnualRecord], periods: &[PeriodRequest]) -> Result<Vec<LmdiPeriodResult>, AnalysisError> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|r| r.year);

    let (Some(first), Some(last)) = (ordered.first(), ordered.last()) else {
        return Err(AnalysisError::MissingInput("no annual records available for the LMDI decomposition".to_string()));
    };
    let (earliest, latest) = (first.year, last.year);

    log::info!(target: LOG_TARGET, "Computing LMDI decomposition for {} periods", periods.len());

    let mut results = Vec::with_capacity(periods.len());
    for period in periods {
        let requested_start = period.start.resolve(earliest, latest);
        let requested_end = period.end.resolve(earliest, latest);

        let start = nearest_record(&ordered, requested_start).unwrap_or(first);
        let end = nearest_record(&ordered, requested_end).unwrap_or(last);

        if start.year != requested_start || end.year != requested_end {
            log::warn!(
                target: LOG_TARGET,
                "Period {requested_start}–{requested_end}: adjusted to {}–{}",
                start.year,
                end.year
            );
        }

        results.push(decompose_period(start, end, (requested_start, requested_end)));
    }

    log::info!(target: LOG_TARGET, "LMDI decomposition computed for {} periods", results.len());

    Ok(results)
}

fn decompose_period(start: &AnnualRecord, end: &AnnualRecord, requested: (i32, i32)) -> LmdiPeriodResult {
    let f0 = KayaFactors::from_record(start);
    let f1 = KayaFactors::from_record(end);

    let weight = log_mean(f0.co2, f1.co2);

    LmdiPeriodResult {
        period: format!("{}–{}", start.year, end.year),
        start_year: start.year,
        end_year: end.year,
        effect_population: factor_effect(weight, Some(f0.population), Some(f1.population)),
        effect_affluence: factor_effect(weight, f0.affluence, f1.affluence),
        effect_intensity: factor_effect(weight, f0.intensity, f1.intensity),
        delta_co2: f1.co2 - f0.co2,
        requested,
    }
}
