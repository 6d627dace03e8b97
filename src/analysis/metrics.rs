//! Shares, year-over-year deltas, and contributions to the annual change in total emissions.
//!
//! Joins are explicit lookups keyed by year. Each function states what happens on a miss.

use super::safe_math::{divide, divide_opt};
use super::{AnalysisError, AnnualRecord, ContributionRecord, DeltaRecord, Sector, SectorRecord, ShareRecord};
use std::collections::{BTreeMap, BTreeSet};

const LOG_TARGET: &str = "   metrics";

/// Total emissions keyed by year, taken from the input rather than re-derived from sectors.
#[must_use]
pub fn totals_by_year(records: &[AnnualRecord]) -> BTreeMap<i32, f64> {
    records.iter().map(|r| (r.year, r.total_co2)).collect()
}

/// Year-over-year change of total emissions over consecutive rows.
///
/// The first year maps to `None`.
#[must_use]
pub fn total_yoy(records: &[AnnualRecord]) -> BTreeMap<i32, Option<f64>> {
    let mut ordered: Vec<&AnnualRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.year);

    let mut previous: Option<f64> = None;
    ordered
        .into_iter()
        .map(|r| {
            let delta = previous.map(|p| r.total_co2 - p);
            previous = Some(r.total_co2);
            (r.year, delta)
        })
        .collect()
}

/// Share of each sector in the total emissions of its year.
///
/// Joined on year; a sector year without a total is a [`AnalysisError::Join`].
pub fn compute_shares(sectors: &[SectorRecord], totals: &BTreeMap<i32, f64>) -> Result<Vec<ShareRecord>, AnalysisError> {
    let mut shares = sectors
        .iter()
        .map(|r| {
            let total = *totals.get(&r.year).ok_or(AnalysisError::Join { year: r.year })?;
            Ok(ShareRecord {
                year: r.year,
                sector: r.sector,
                share_of_total: divide(r.emissions_mtco2, total),
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    shares.sort_by_key(|r| (r.year, r.sector));

    let years = shares.iter().map(|r| r.year).collect::<BTreeSet<_>>().len();
    log::info!(target: LOG_TARGET, "Sector shares computed for {years} years");

    Ok(shares)
}

/// Absolute and relative change of each sector against its own previous observation.
///
/// Each sector's earliest year has undefined changes.
#[must_use]
pub fn compute_yoy(sectors: &[SectorRecord]) -> Vec<DeltaRecord> {
    let mut by_sector: BTreeMap<Sector, Vec<&SectorRecord>> = BTreeMap::new();
    for record in sectors {
        by_sector.entry(record.sector).or_default().push(record);
    }

    let mut deltas = Vec::with_capacity(sectors.len());
    for series in by_sector.values_mut() {
        series.sort_by_key(|r| r.year);

        let mut previous: Option<f64> = None;
        for record in series.iter() {
            let change = previous.map(|p| record.emissions_mtco2 - p);
            deltas.push(DeltaRecord {
                year: record.year,
                sector: record.sector,
                emissions_mtco2: record.emissions_mtco2,
                yoy_change_mtco2: change,
                yoy_change_pct: divide_opt(change, previous),
            });
            previous = Some(record.emissions_mtco2);
        }
    }

    deltas.sort_by_key(|r| (r.year, r.sector));
    log::info!(target: LOG_TARGET, "Year-on-year changes computed for {} records", deltas.len());

    deltas
}

/// Each sector's delta as a fraction of the total delta of the same year.
///
/// Left join on year: a year absent from `total_deltas` yields an undefined total and share.
/// A flat year (total delta of exactly zero) also yields an undefined share.
#[must_use]
pub fn compute_contribution(sector_deltas: &[DeltaRecord], total_deltas: &BTreeMap<i32, Option<f64>>) -> Vec<ContributionRecord> {
    let mut contributions: Vec<ContributionRecord> = sector_deltas
        .iter()
        .map(|r| {
            let delta_total = total_deltas.get(&r.year).copied().flatten();
            ContributionRecord {
                year: r.year,
                sector: r.sector,
                delta_mtco2: r.yoy_change_mtco2,
                delta_total,
                contribution_share: divide_opt(r.yoy_change_mtco2, delta_total),
            }
        })
        .collect();

    contributions.sort_by_key(|r| (r.year, r.sector));
    log::info!(target: LOG_TARGET, "Sector contributions to annual change computed");

    contributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    fn sector_record(year: i32, sector: Sector, value: f64) -> SectorRecord {
        SectorRecord {
            year,
            sector,
            emissions_mtco2: value,
        }
    }

    fn annual(year: i32, total: f64) -> AnnualRecord {
        AnnualRecord {
            year,
            total_co2: total,
            population: 1.0,
            gdp: 1.0,
            sectors: [None; Sector::COUNT],
        }
    }

    #[test]
    fn test_shares_divide_by_year_total() {
        let sectors = vec![
            sector_record(2000, Sector::Coal, 25.0),
            sector_record(2000, Sector::Oil, 50.0),
            sector_record(2001, Sector::Coal, 30.0),
        ];
        let totals = BTreeMap::from([(2000, 100.0), (2001, 60.0)]);

        let shares = compute_shares(&sectors, &totals).unwrap();
        assert_eq!(shares[0].share_of_total, Some(0.25));
        assert_eq!(shares[1].share_of_total, Some(0.5));
        assert_eq!(shares[2].share_of_total, Some(0.5));
    }

    #[test]
    fn test_shares_with_zero_total_are_undefined() {
        let sectors = vec![sector_record(1800, Sector::Coal, 0.0)];
        let totals = BTreeMap::from([(1800, 0.0)]);

        let shares = compute_shares(&sectors, &totals).unwrap();
        assert_eq!(shares[0].share_of_total, None);
    }

    #[test]
    fn test_shares_missing_total_is_join_error() {
        let sectors = vec![sector_record(1999, Sector::Gas, 1.0)];
        let totals = BTreeMap::from([(2000, 10.0)]);

        let err = compute_shares(&sectors, &totals).unwrap_err();
        assert!(matches!(err, AnalysisError::Join { year: 1999 }));
        assert_eq!(err.kind(), "JoinError");
    }

    #[test]
    fn test_shares_sum_to_at_most_one() {
        let sectors = vec![
            sector_record(2010, Sector::Coal, 40.0),
            sector_record(2010, Sector::Oil, 35.0),
            sector_record(2010, Sector::Gas, 20.0),
        ];
        let totals = BTreeMap::from([(2010, 100.0)]);

        let shares = compute_shares(&sectors, &totals).unwrap();
        let sum: f64 = shares.iter().filter_map(|s| s.share_of_total).sum();
        assert!(sum <= 1.0 + 1e-12);
        assert!(shares.iter().all(|s| s.share_of_total.unwrap() >= 0.0));
    }

    #[test]
    fn test_yoy_first_year_is_undefined() {
        let sectors = vec![
            sector_record(2000, Sector::Coal, 10.0),
            sector_record(2001, Sector::Coal, 12.0),
            sector_record(2002, Sector::Coal, 9.0),
        ];

        let deltas = compute_yoy(&sectors);
        assert_eq!(deltas[0].yoy_change_mtco2, None);
        assert_eq!(deltas[0].yoy_change_pct, None);
        assert_eq!(deltas[1].yoy_change_mtco2, Some(2.0));
        assert_eq!(deltas[1].yoy_change_pct, Some(0.2));
        assert_eq!(deltas[2].yoy_change_mtco2, Some(-3.0));
        assert_eq!(deltas[2].yoy_change_pct, Some(-0.25));
    }

    #[test]
    fn test_yoy_uses_previous_observation_not_calendar_year() {
        // Gap between 2000 and 2005 for Cement.
        let sectors = vec![
            sector_record(2000, Sector::Cement, 4.0),
            sector_record(2005, Sector::Cement, 10.0),
            sector_record(2005, Sector::Coal, 1.0),
        ];

        let deltas = compute_yoy(&sectors);
        let cement_2005 = deltas.iter().find(|d| d.year == 2005 && d.sector == Sector::Cement).unwrap();
        assert_eq!(cement_2005.yoy_change_mtco2, Some(6.0));

        // Coal starts in 2005, so it has no prior data even though other sectors do.
        let coal_2005 = deltas.iter().find(|d| d.year == 2005 && d.sector == Sector::Coal).unwrap();
        assert_eq!(coal_2005.yoy_change_mtco2, None);
    }

    #[test]
    fn test_yoy_pct_undefined_when_prior_is_zero() {
        let sectors = vec![sector_record(1900, Sector::Flaring, 0.0), sector_record(1901, Sector::Flaring, 3.0)];

        let deltas = compute_yoy(&sectors);
        assert_eq!(deltas[1].yoy_change_mtco2, Some(3.0));
        assert_eq!(deltas[1].yoy_change_pct, None);
    }

    #[test]
    fn test_yoy_output_ordered_by_year_then_sector() {
        let sectors = vec![
            sector_record(2001, Sector::Oil, 2.0),
            sector_record(2000, Sector::Oil, 1.0),
            sector_record(2001, Sector::Coal, 2.0),
            sector_record(2000, Sector::Coal, 1.0),
        ];

        let keys: Vec<(i32, Sector)> = compute_yoy(&sectors).iter().map(|d| (d.year, d.sector)).collect();
        assert_eq!(keys, vec![(2000, Sector::Coal), (2000, Sector::Oil), (2001, Sector::Coal), (2001, Sector::Oil)]);
    }

    #[test]
    fn test_total_yoy_over_consecutive_rows() {
        let records = vec![annual(2000, 100.0), annual(2001, 110.0), annual(2002, 105.0)];
        let deltas = total_yoy(&records);
        assert_eq!(deltas[&2000], None);
        assert_eq!(deltas[&2001], Some(10.0));
        assert_eq!(deltas[&2002], Some(-5.0));
    }

    #[test]
    fn test_contribution_flat_year_is_undefined() {
        let sector_deltas = vec![DeltaRecord {
            year: 2015,
            sector: Sector::Gas,
            emissions_mtco2: 550.0,
            yoy_change_mtco2: Some(50.0),
            yoy_change_pct: Some(0.1),
        }];
        let totals = BTreeMap::from([(2015, Some(0.0))]);

        let contributions = compute_contribution(&sector_deltas, &totals);
        assert_eq!(contributions[0].delta_mtco2, Some(50.0));
        assert_eq!(contributions[0].delta_total, Some(0.0));
        assert_eq!(contributions[0].contribution_share, None);
    }

    #[test]
    fn test_contribution_ratio() {
        let sector_deltas = vec![
            DeltaRecord {
                year: 2016,
                sector: Sector::Coal,
                emissions_mtco2: 0.0,
                yoy_change_mtco2: Some(-20.0),
                yoy_change_pct: None,
            },
            DeltaRecord {
                year: 2016,
                sector: Sector::Oil,
                emissions_mtco2: 0.0,
                yoy_change_mtco2: Some(60.0),
                yoy_change_pct: None,
            },
        ];
        let totals = BTreeMap::from([(2016, Some(40.0))]);

        let contributions = compute_contribution(&sector_deltas, &totals);
        assert_eq!(contributions[0].contribution_share, Some(-0.5));
        assert_eq!(contributions[1].contribution_share, Some(1.5));
    }

    #[test]
    fn test_contribution_missing_total_year_is_undefined() {
        let sector_deltas = vec![DeltaRecord {
            year: 1800,
            sector: Sector::Coal,
            emissions_mtco2: 1.0,
            yoy_change_mtco2: None,
            yoy_change_pct: None,
        }];

        let contributions = compute_contribution(&sector_deltas, &BTreeMap::new());
        assert_eq!(contributions[0].delta_total, None);
        assert_eq!(contributions[0].contribution_share, None);
    }
}
