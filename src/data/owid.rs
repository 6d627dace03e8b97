use crate::analysis::{AnalysisError, AnnualRecord, SECTOR_MAPPING, Sector};
use camino::Utf8Path;
use csv::StringRecord;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use strum::EnumCount;

const LOG_TARGET: &str = "      data";

/// Column holding the entity name.
pub const ENTITY_COLUMN: &str = "country";

/// Columns that must be present in the input.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    ENTITY_COLUMN,
    "year",
    "iso_code",
    "co2",
    "population",
    "gdp",
    "coal_co2",
    "oil_co2",
    "gas_co2",
    "cement_co2",
    "flaring_co2",
    "other_industry_co2",
];

/// Positions of the columns the loader reads.
struct Columns {
    entity: usize,
    year: usize,
    co2: usize,
    population: usize,
    gdp: usize,
    sectors: [usize; Sector::COUNT],
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, AnalysisError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::Schema { missing });
        }

        let required = |name: &str| position(name).ok_or_else(|| AnalysisError::Schema { missing: vec![name.to_string()] });

        let mut sectors = [0; Sector::COUNT];
        for (slot, (column, _)) in sectors.iter_mut().zip(SECTOR_MAPPING) {
            *slot = required(column)?;
        }

        Ok(Self {
            entity: required(ENTITY_COLUMN)?,
            year: required("year")?,
            co2: required("co2")?,
            population: required("population")?,
            gdp: required("gdp")?,
            sectors,
        })
    }
}

/// Load the rows for `entity` from the CSV file at `path`.
///
/// Fails with [`AnalysisError::MissingInput`] when the file does not exist or holds no rows
/// for `entity`.
pub fn load_world_table(path: &Utf8Path, entity: &str) -> Result<Vec<AnnualRecord>, AnalysisError> {
    log::info!(target: LOG_TARGET, "Loading CO₂ dataset from {path}");

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AnalysisError::MissingInput(format!("input file '{path}' does not exist")));
        }
        Err(e) => return Err(e.into()),
    };

    read_world_table(file, entity)
}

/// Parse and validate CSV content, keeping only the rows for `entity`, sorted by year.
pub fn read_world_table<R: Read>(reader: R, entity: &str) -> Result<Vec<AnnualRecord>, AnalysisError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(false).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;
    log::debug!(target: LOG_TARGET, "All {} required columns present", REQUIRED_COLUMNS.len());

    let mut rows = 0_usize;
    let mut records = Vec::new();
    let mut seen_years = BTreeSet::new();

    for row in csv_reader.records() {
        let row = row?;
        rows += 1;

        if row.get(columns.entity).map(str::trim) != Some(entity) {
            continue;
        }

        let record = parse_row(&row, &columns)?;
        if !seen_years.insert(record.year) {
            return Err(AnalysisError::DataFormat(format!("year {} appears more than once for '{entity}'", record.year)));
        }

        records.push(record);
    }

    log::info!(target: LOG_TARGET, "Dataset loaded: {rows} rows, {} columns", headers.len());

    if records.is_empty() {
        return Err(AnalysisError::MissingInput(format!("no '{entity}' aggregate found in the dataset")));
    }

    records.sort_by_key(|r| r.year);

    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        log::info!(
            target: LOG_TARGET,
            "Filtered to '{entity}': {} years ({}–{})",
            records.len(),
            first.year,
            last.year
        );
        component_sum_check(last);
    }

    Ok(records)
}

/// Log how closely the sector values of `record` add up to its total.
pub fn component_sum_check(record: &AnnualRecord) {
    let total = record.total_co2;
    let sum = record.sector_sum();
    let diff = (total - sum).abs();
    let pct = if total == 0.0 { 0.0 } else { diff / total * 100.0 };

    log::info!(
        target: LOG_TARGET,
        "Component sum check (year {}): total_co2={total:.2}, sum(components)={sum:.2}, diff={diff:.4} ({pct:.3}%)",
        record.year
    );
}

fn parse_row(row: &StringRecord, columns: &Columns) -> Result<AnnualRecord, AnalysisError> {
    let raw_year = row.get(columns.year).unwrap_or_default().trim();
    let year = parse_year(raw_year)?;

    let required = |index: usize, column: &str| -> Result<f64, AnalysisError> {
        let value = parse_number(row.get(index).unwrap_or_default(), column, year)?;
        Ok(value.unwrap_or_else(|| {
            log::debug!(target: LOG_TARGET, "Year {year}: '{column}' is empty, using 0");
            0.0
        }))
    };

    let total_co2 = required(columns.co2, "co2")?;
    let population = required(columns.population, "population")?;
    let gdp = required(columns.gdp, "gdp")?;

    let mut sectors = [None; Sector::COUNT];
    for ((slot, &index), (column, _)) in sectors.iter_mut().zip(&columns.sectors).zip(SECTOR_MAPPING) {
        *slot = parse_number(row.get(index).unwrap_or_default(), column, year)?;
    }

    Ok(AnnualRecord {
        year,
        total_co2,
        population,
        gdp,
        sectors,
    })
}

fn parse_year(raw: &str) -> Result<i32, AnalysisError> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }

    // Some exports write years as floats, e.g. "1990.0"
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) => {
            #[expect(clippy::cast_possible_truncation, reason = "range and integrality checked above")]
            let year = value as i32;
            Ok(year)
        }
        _ => Err(AnalysisError::DataFormat(format!("column 'year' holds non-integer value '{raw}'"))),
    }
}

/// Parse a numeric cell. Empty and `NaN` cells are missing.
fn parse_number(raw: &str, column: &str, year: i32) -> Result<Option<f64>, AnalysisError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let Ok(value) = raw.parse::<f64>() else {
        return Err(AnalysisError::non_numeric(column, format_args!("year {year}"), raw));
    };

    if value.is_nan() {
        return Ok(None);
    }

    if value.is_infinite() {
        return Err(AnalysisError::non_numeric(column, format_args!("year {year}"), raw));
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "country,year,iso_code,co2,population,gdp,coal_co2,oil_co2,gas_co2,cement_co2,flaring_co2,other_industry_co2\n";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_filters_entity_and_sorts_by_year() {
        let text = csv(&[
            "World,2001,OWID_WRL,110,6.1e9,5.1e13,40,40,20,5,1,4",
            "France,2000,FRA,4,6e7,1e12,1,1,1,0.5,0,0.5",
            "World,2000,OWID_WRL,100,6e9,5e13,35,38,18,4,1,4",
        ]);
        let records = read_world_table(text.as_bytes(), "World").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2000);
        assert_eq!(records[1].year, 2001);
        assert_eq!(records[0].sector(Sector::Coal), Some(35.0));
    }

    #[test]
    fn test_empty_sector_cells_are_missing() {
        let text = csv(&["World,1850,OWID_WRL,200,1.2e9,,190,,,,,"]);
        let records = read_world_table(text.as_bytes(), "World").unwrap();

        assert_eq!(records[0].sector(Sector::Coal), Some(190.0));
        assert_eq!(records[0].sector(Sector::Oil), None);
        assert_eq!(records[0].sector(Sector::OtherIndustry), None);
        assert!(records[0].gdp.abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_cell_is_missing() {
        let text = csv(&["World,1850,OWID_WRL,200,1.2e9,1e12,NaN,1,1,1,1,1"]);
        let records = read_world_table(text.as_bytes(), "World").unwrap();
        assert_eq!(records[0].sector(Sector::Coal), None);
    }

    #[test]
    fn test_missing_columns_reported() {
        let text = "country,year,iso_code,co2,population\nWorld,2000,OWID_WRL,1,1\n";
        let err = read_world_table(text.as_bytes(), "World").unwrap_err();

        assert_eq!(err.kind(), "SchemaError");
        let AnalysisError::Schema { missing } = err else {
            panic!("expected a schema error");
        };
        assert!(missing.contains(&"gdp".to_string()));
        assert!(missing.contains(&"other_industry_co2".to_string()));
        assert!(!missing.contains(&"co2".to_string()));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let text = csv(&["World,2000,OWID_WRL,100,6e9,5e13,abc,38,18,4,1,4"]);
        let err = read_world_table(text.as_bytes(), "World").unwrap_err();

        assert_eq!(err.kind(), "DataFormatError");
        assert!(err.to_string().contains("coal_co2"));
    }

    #[test]
    fn test_infinite_value_rejected() {
        let text = csv(&["World,2000,OWID_WRL,inf,6e9,5e13,1,1,1,1,1,1"]);
        let err = read_world_table(text.as_bytes(), "World").unwrap_err();
        assert_eq!(err.kind(), "DataFormatError");
    }

    #[test]
    fn test_missing_entity_rejected() {
        let text = csv(&["France,2000,FRA,4,6e7,1e12,1,1,1,0.5,0,0.5"]);
        let err = read_world_table(text.as_bytes(), "World").unwrap_err();
        assert_eq!(err.kind(), "MissingInputError");
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let text = csv(&[
            "World,2000,OWID_WRL,100,6e9,5e13,35,38,18,4,1,4",
            "World,2000,OWID_WRL,101,6e9,5e13,35,38,18,4,1,4",
        ]);
        let err = read_world_table(text.as_bytes(), "World").unwrap_err();
        assert_eq!(err.kind(), "DataFormatError");
    }

    #[test]
    fn test_float_year_accepted() {
        assert_eq!(parse_year("1990.0").unwrap(), 1990);
        assert!(parse_year("1990.5").is_err());
        assert!(parse_year("nineteen").is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::try_from(tmp.path().join("absent.csv")).unwrap();
        let err = load_world_table(&path, "World").unwrap_err();
        assert_eq!(err.kind(), "MissingInputError");
    }
}
