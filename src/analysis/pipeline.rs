//! Sequences the engine stages over one annual table.

use super::lmdi::{PeriodRequest, decompose};
use super::metrics::{compute_contribution, compute_shares, compute_yoy, total_yoy, totals_by_year};
use super::sectors::extract_sector_long;
use super::smoothing::{DEFAULT_WINDOW, smooth_sectors, validate_window};
use super::{
    AnalysisError, AnnualRecord, ContributionRecord, DeltaRecord, LmdiPeriodResult, SectorRecord, ShareRecord, SmoothedRecord,
};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "  pipeline";

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub smoothing_window: usize,
    pub periods: Vec<PeriodRequest>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_WINDOW,
            periods: PeriodRequest::defaults(),
        }
    }
}

/// Every table produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTables {
    pub annual: Vec<AnnualRecord>,
    pub totals_by_year: BTreeMap<i32, f64>,
    pub total_deltas: BTreeMap<i32, Option<f64>>,
    pub sector_long: Vec<SectorRecord>,
    pub shares: Vec<ShareRecord>,
    pub yoy: Vec<DeltaRecord>,
    pub contribution: Vec<ContributionRecord>,
    pub smoothed: Vec<SmoothedRecord>,
    pub lmdi: Vec<LmdiPeriodResult>,
}

impl AnalysisTables {
    /// First and last year of the annual table.
    #[must_use]
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.totals_by_year.keys().next()?, *self.totals_by_year.keys().next_back()?))
    }
}

/// Run every stage in order, aborting on the first failure.
///
/// `records` must be year-ascending with unique years.
pub fn run_analysis(records: &[AnnualRecord], options: &PipelineOptions) -> Result<AnalysisTables, AnalysisError> {
    validate_window(options.smoothing_window)?;

    if records.is_empty() {
        return Err(AnalysisError::MissingInput("the annual table is empty".to_string()));
    }

    if let Some(pair) = records.windows(2).find(|w| w[0].year >= w[1].year) {
        return Err(AnalysisError::DataFormat(format!(
            "annual records must have strictly ascending years, found {} followed by {}",
            pair[0].year, pair[1].year
        )));
    }

    log::info!(target: LOG_TARGET, "Analyzing {} annual records", records.len());

    let sector_long = extract_sector_long(records)?;
    let totals = totals_by_year(records);
    let shares = compute_shares(&sector_long, &totals)?;
    let yoy = compute_yoy(&sector_long);
    let total_deltas = total_yoy(records);
    let contribution = compute_contribution(&yoy, &total_deltas);
    let smoothed = smooth_sectors(&sector_long, options.smoothing_window)?;
    let lmdi = decompose(records, &options.periods)?;

    Ok(AnalysisTables {
        annual: records.to_vec(),
        totals_by_year: totals,
        total_deltas,
        sector_long,
        shares,
        yoy,
        contribution,
        smoothed,
        lmdi,
    })
}
