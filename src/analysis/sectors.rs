//! Canonical sector taxonomy and the wide-to-long reshape.

use super::{AnalysisError, AnnualRecord, SectorRecord};
use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

const LOG_TARGET: &str = "   sectors";

/// Emission source categories, declared in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumCount, Serialize)]
pub enum Sector {
    Coal,
    Oil,
    Gas,
    Cement,
    Flaring,
    #[strum(serialize = "Other industry")]
    #[serde(rename = "Other industry")]
    OtherIndustry,
}

/// Raw input column for each canonical sector, in presentation order.
pub const SECTOR_MAPPING: [(&str, Sector); Sector::COUNT] = [
    ("coal_co2", Sector::Coal),
    ("oil_co2", Sector::Oil),
    ("gas_co2", Sector::Gas),
    ("cement_co2", Sector::Cement),
    ("flaring_co2", Sector::Flaring),
    ("other_industry_co2", Sector::OtherIndustry),
];

impl Sector {
    /// Name of the input column holding this sector's emissions.
    #[must_use]
    pub const fn column(self) -> &'static str {
        SECTOR_MAPPING[self.index()].0
    }

    /// Position of this sector in the canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up the sector fed by a raw input column.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        SECTOR_MAPPING.iter().find(|(name, _)| *name == column).map(|&(_, sector)| sector)
    }
}

/// Reshape annual rows into one record per `(year, sector)` with a reported value.
///
/// Missing sector values are skipped. A value that is present but not finite is rejected.
/// The output is ordered by year, then canonical sector order.
pub fn extract_sector_long(records: &[AnnualRecord]) -> Result<Vec<SectorRecord>, AnalysisError> {
    let mut long = Vec::with_capacity(records.len() * Sector::COUNT);

    for record in records {
        for sector in Sector::iter() {
            let Some(value) = record.sector(sector) else {
                continue;
            };

            if !value.is_finite() {
                return Err(AnalysisError::non_numeric(sector.column(), format_args!("year {}", record.year), &value.to_string()));
            }

            long.push(SectorRecord {
                year: record.year,
                sector,
                emissions_mtco2: value,
            });
        }
    }

    long.sort_by_key(|r| (r.year, r.sector));

    log::info!(
        target: LOG_TARGET,
        "Extracted {} sector-year records across {} sectors",
        long.len(),
        Sector::COUNT
    );

    Ok(long)
}
