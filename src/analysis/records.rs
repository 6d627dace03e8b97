//! Value records flowing through the engine.
//!
//! Every field holding an `Option<f64>` is `None` when the quantity is undefined, for
//! example a ratio over a zero denominator or the first year of a series.

use super::Sector;
use serde::Serialize;
use strum::EnumCount;

/// One year of the reference aggregate, as read from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualRecord {
    pub year: i32,
    pub total_co2: f64,
    pub population: f64,
    pub gdp: f64,

    /// Raw sector values indexed by [`Sector::index`].
    pub sectors: [Option<f64>; Sector::COUNT],
}

impl AnnualRecord {
    #[must_use]
    pub const fn sector(&self, sector: Sector) -> Option<f64> {
        self.sectors[sector.index()]
    }

    /// Sum of the sector values present for this year.
    #[must_use]
    pub fn sector_sum(&self) -> f64 {
        self.sectors.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorRecord {
    pub year: i32,
    pub sector: Sector,
    pub emissions_mtco2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShareRecord {
    pub year: i32,
    pub sector: Sector,
    pub share_of_total: Option<f64>,
}

/// Year-over-year change of one sector against its previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaRecord {
    pub year: i32,
    pub sector: Sector,
    pub emissions_mtco2: f64,
    pub yoy_change_mtco2: Option<f64>,
    pub yoy_change_pct: Option<f64>,
}

/// A sector's share of the change in total emissions for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContributionRecord {
    pub year: i32,
    pub sector: Sector,
    pub delta_mtco2: Option<f64>,
    pub delta_total: Option<f64>,
    pub contribution_share: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedRecord {
    pub year: i32,
    pub sector: Sector,
    pub emissions_mtco2: f64,
    pub emissions_smoothed: f64,
}

/// Kaya/LMDI decomposition of the change in total emissions over one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LmdiPeriodResult {
    pub period: String,
    pub start_year: i32,
    pub end_year: i32,
    pub effect_population: Option<f64>,
    pub effect_affluence: Option<f64>,
    pub effect_intensity: Option<f64>,
    pub delta_co2: f64,

    /// Years originally asked for, before nearest-year resolution.
    #[serde(skip)]
    pub requested: (i32, i32),
}

impl LmdiPeriodResult {
    /// Sum of the three effects, when all of them are defined.
    #[must_use]
    pub fn effects_sum(&self) -> Option<f64> {
        Some(self.effect_population? + self.effect_affluence? + self.effect_intensity?)
    }

    #[must_use]
    pub const fn was_adjusted(&self) -> bool {
        self.requested.0 != self.start_year || self.requested.1 != self.end_year
    }
}
