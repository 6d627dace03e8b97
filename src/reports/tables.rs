use super::Artifact;
use crate::Result;
use crate::analysis::AnalysisTables;
use ohno::IntoAppError;
use serde::Serialize;

pub const SECTOR_LONG_FILE: &str = "world_sector_emissions_long.csv";
pub const SHARES_FILE: &str = "world_sector_shares.csv";
pub const YOY_FILE: &str = "world_yoy_changes.csv";
pub const CONTRIBUTION_FILE: &str = "world_contribution_to_yoy_total.csv";
pub const LMDI_FILE: &str = "kaya_lmdi_decomposition.csv";
pub const SMOOTHED_FILE: &str = "sector_emissions_smoothed.csv";

const SECTOR_LONG_COLUMNS: &[&str] = &["year", "sector", "emissions_mtco2"];
const SHARES_COLUMNS: &[&str] = &["year", "sector", "share_of_total"];
const YOY_COLUMNS: &[&str] = &["year", "sector", "emissions_mtco2", "yoy_change_mtco2", "yoy_change_pct"];
const CONTRIBUTION_COLUMNS: &[&str] = &["year", "sector", "delta_mtco2", "delta_total", "contribution_share"];
const LMDI_COLUMNS: &[&str] = &[
    "period",
    "start_year",
    "end_year",
    "effect_population",
    "effect_affluence",
    "effect_intensity",
    "delta_co2",
];
const SMOOTHED_COLUMNS: &[&str] = &["year", "sector", "emissions_mtco2", "emissions_smoothed"];

/// Render every exported table as CSV, in a fixed order.
pub fn generate(tables: &AnalysisTables) -> Result<Vec<Artifact>> {
    Ok(vec![
        Artifact::new(SECTOR_LONG_FILE, write_table(SECTOR_LONG_COLUMNS, &tables.sector_long)?),
        Artifact::new(SHARES_FILE, write_table(SHARES_COLUMNS, &tables.shares)?),
        Artifact::new(YOY_FILE, write_table(YOY_COLUMNS, &tables.yoy)?),
        Artifact::new(CONTRIBUTION_FILE, write_table(CONTRIBUTION_COLUMNS, &tables.contribution)?),
        Artifact::new(LMDI_FILE, write_table(LMDI_COLUMNS, &tables.lmdi)?),
        Artifact::new(SMOOTHED_FILE, write_table(SMOOTHED_COLUMNS, &tables.smoothed)?),
    ])
}

/// Write `rows` under an explicit header, so empty tables still carry their schema.
///
/// Undefined values become empty fields.
fn write_table<T: Serialize>(columns: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    writer.write_record(columns).into_app_err("writing table header")?;
    for row in rows {
        writer.serialize(row).into_app_err("writing table row")?;
    }

    writer.into_inner().map_err(csv::IntoInnerError::into_error).into_app_err("flushing table")
}
