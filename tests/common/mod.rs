//! Synthetic dataset shared by the integration tests.
//!
//! The "World" rows span 1850 to 2022. Oil starts in 1870, gas in 1900, flaring is never
//! reported, and 2020 is a flat year: total emissions equal 2019's while coal rises by 50.

#![allow(dead_code, reason = "each test binary uses a different subset")]

pub const HEADER: &str = "country,year,iso_code,co2,population,gdp,coal_co2,oil_co2,gas_co2,cement_co2,flaring_co2,other_industry_co2";

pub const FIRST_YEAR: i32 = 1850;
pub const LAST_YEAR: i32 = 2022;
pub const FLAT_YEAR: i32 = 2020;

#[derive(Debug, Clone)]
pub struct Row {
    pub country: &'static str,
    pub year: i32,
    pub total: f64,
    pub population: f64,
    pub gdp: f64,
    pub sectors: [Option<f64>; 6],
}

fn sectors(year: i32) -> [Option<f64>; 6] {
    let t = f64::from(year - FIRST_YEAR);
    [
        Some(50.0 + 10.0 * t),
        (year >= 1870).then(|| 5.0 * (t - 19.0)),
        (year >= 1900).then(|| 2.0 * (t - 49.0)),
        Some(1.0 + 0.5 * t),
        None,
        Some(3.0),
    ]
}

fn row(year: i32) -> Row {
    let t = f64::from(year - FIRST_YEAR);
    let sectors = sectors(year);
    Row {
        country: "World",
        year,
        total: sectors.iter().flatten().sum::<f64>() + 100.0,
        population: 1.0e9 + 1.0e7 * t,
        gdp: 1.0e12 + 5.0e10 * t,
        sectors,
    }
}

pub fn world_rows() -> Vec<Row> {
    (FIRST_YEAR..=LAST_YEAR)
        .map(|year| {
            if year == FLAT_YEAR {
                let previous = row(year - 1);
                let mut sectors = previous.sectors;
                sectors[0] = sectors[0].map(|coal| coal + 50.0);
                Row {
                    year,
                    sectors,
                    ..previous
                }
            } else {
                row(year)
            }
        })
        .collect()
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn to_csv(rows: &[Row]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for r in rows {
        text.push_str(&format!(
            "{},{},{},{},{},{}",
            r.country,
            r.year,
            if r.country == "World" { "OWID_WRL" } else { "FRA" },
            r.total,
            r.population,
            r.gdp
        ));
        for value in r.sectors {
            text.push(',');
            text.push_str(&cell(value));
        }
        text.push('\n');
    }
    text
}

/// World rows interleaved with rows of another country.
pub fn fixture_csv() -> String {
    let mut rows = Vec::new();
    for world in world_rows() {
        let mut other = world.clone();
        other.country = "France";
        other.total /= 100.0;
        rows.push(other);
        rows.push(world);
    }
    to_csv(&rows)
}
