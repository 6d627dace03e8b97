//! The decomposition and metrics engine.
//!
//! Every stage is a pure transformation over in-memory records:
//!
//! - [`sectors`] reshapes the annual table into long-form sector records
//! - [`metrics`] derives shares, year-over-year changes, and contributions to the total change
//! - [`smoothing`] computes centered rolling means for presentation
//! - [`lmdi`] decomposes the change in total emissions into Kaya factor effects
//! - [`pipeline`] sequences the above
//!
//! Ratios over a zero or non-finite denominator are `None`, never an error.

mod error;
mod records;

pub mod lmdi;
pub mod metrics;
pub mod pipeline;
pub mod safe_math;
pub mod sectors;
pub mod smoothing;

pub use error::AnalysisError;
pub use lmdi::{Anchor, PeriodRequest, YearBound};
pub use pipeline::{AnalysisTables, PipelineOptions, run_analysis};
pub use records::{AnnualRecord, ContributionRecord, DeltaRecord, LmdiPeriodResult, SectorRecord, ShareRecord, SmoothedRecord};
pub use sectors::{SECTOR_MAPPING, Sector};
