//! Sectoral CO₂ metrics and Kaya/LMDI decomposition of global emissions.
//!
//! # Overview
//!
//! `kaya-decomp` reads the Our World in Data CO₂ dataset, keeps the global aggregate, and
//! derives a set of tables and static figures from it:
//!
//! - emissions per sector (coal, oil, gas, cement, flaring, other industry) in long form
//! - each sector's share of the yearly total
//! - year-over-year changes per sector, and each sector's contribution to the change in the total
//! - a centered rolling mean of each sector's series
//! - a Kaya identity decomposition of the change in total emissions over chosen periods into
//!   population, affluence and intensity effects, using the additive Log-Mean Divisia Index
//!
//! The run is deterministic: the same input produces byte-identical outputs.
//!
//! # Quick Start
//!
//! ```bash
//! kaya-decomp init
//! kaya-decomp analyze --input data/owid-co2-data.csv
//! ```
//!
//! # Outputs
//!
//! **Tables** (`output/tables`):
//! - `world_sector_emissions_long.csv`
//! - `world_sector_shares.csv`
//! - `world_yoy_changes.csv`
//! - `world_contribution_to_yoy_total.csv`
//! - `kaya_lmdi_decomposition.csv`
//! - `sector_emissions_smoothed.csv`
//!
//! Undefined values, such as a share of a zero total or the first year's change, are written
//! as empty fields.
//!
//! **Figures** (`output/figures`):
//! - `total_co2_timeseries.svg`
//! - `sector_emissions_timeseries.svg`
//! - `sector_shares_stacked_area.svg`
//! - `sector_contribution_yoy_latest20.svg`
//! - `kaya_lmdi_waterfall.svg`
//!
//! # Configuration
//!
//! Settings are read from `kaya.toml` in the current directory, or from the file given with
//! `--config`. `kaya-decomp init` writes the defaults:
//!
//! ```toml
//! input = "data/owid-co2-data.csv"
//! smoothing_window = 5
//! contribution_years = 20
//!
//! [[lmdi_periods]]
//! start = 1990
//! end = "latest"
//! ```
//!
//! A period bound is a year or one of `"earliest"` / `"latest"`. A year missing from the data
//! is replaced by the closest available year (the earlier one on a tie) and a warning is logged.
//!
//! # Exit Status
//!
//! A failed run prints `<category>: <message>` to standard error, writes no outputs, and exits
//! with status 1. Categories are `MissingInputError`, `SchemaError`, `DataFormatError`,
//! `ConfigError`, `JoinError` and `IoError`.

use kaya_decomp::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that writes to the process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args())
}
