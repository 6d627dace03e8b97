//! The five static figures, rendered as SVG.

use super::Artifact;
use super::svg::{self, Anchor, Plot, Rect};
use crate::Result;
use crate::analysis::{AnalysisTables, ContributionRecord, LmdiPeriodResult, Sector, SectorRecord, ShareRecord};
use std::collections::BTreeMap;
use strum::{EnumCount, IntoEnumIterator};

const LOG_TARGET: &str = "    charts";

pub const TOTAL_FILE: &str = "total_co2_timeseries.svg";
pub const SECTORS_FILE: &str = "sector_emissions_timeseries.svg";
pub const SHARES_FILE: &str = "sector_shares_stacked_area.svg";
pub const LMDI_FILE: &str = "kaya_lmdi_waterfall.svg";

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const PLOT_AREA: Rect = Rect::new(90.0, 50.0, 640.0, 420.0);
const LEGEND_ORIGIN: (f64, f64) = (760.0, 70.0);

const PANEL_WIDTH: f64 = 340.0;
const PANEL_AREA: Rect = Rect::new(80.0, 60.0, 230.0, 390.0);

const TOTAL_COLOR: &str = "#000000";
const POSITIVE_COLOR: &str = "#2ecc71";
const NEGATIVE_COLOR: &str = "#e74c3c";
const DELTA_COLOR: &str = "#3498db";
const EMISSIONS_LABEL: &str = "Emissions (MtCO₂)";

/// File name of the contribution figure covering the last `years` years.
#[must_use]
pub fn contribution_file_name(years: usize) -> String {
    format!("sector_contribution_yoy_latest{years}.svg")
}

/// Fixed colour of each sector.
#[must_use]
pub const fn sector_color(sector: Sector) -> &'static str {
    match sector {
        Sector::Coal => "#1f77b4",
        Sector::Oil => "#ff7f0e",
        Sector::Gas => "#2ca02c",
        Sector::Cement => "#d62728",
        Sector::Flaring => "#9467bd",
        Sector::OtherIndustry => "#8c564b",
    }
}

/// Render every figure. The LMDI figure is omitted when there are no periods.
pub fn generate(tables: &AnalysisTables, contribution_years: usize) -> Result<Vec<Artifact>> {
    log::info!(target: LOG_TARGET, "Rendering figures");

    let mut figures = vec![
        Artifact::new(TOTAL_FILE, total_timeseries(&tables.totals_by_year)?.into_bytes()),
        Artifact::new(SECTORS_FILE, sector_timeseries(&tables.sector_long)?.into_bytes()),
        Artifact::new(SHARES_FILE, shares_stacked_area(&tables.shares, &tables.totals_by_year)?.into_bytes()),
        Artifact::new(
            contribution_file_name(contribution_years),
            contribution_bars(&tables.contribution, contribution_years)?.into_bytes(),
        ),
    ];

    match lmdi_waterfall(&tables.lmdi)? {
        Some(svg) => figures.push(Artifact::new(LMDI_FILE, svg.into_bytes())),
        None => log::info!(target: LOG_TARGET, "No LMDI periods to visualize"),
    }

    Ok(figures)
}

#[expect(clippy::cast_precision_loss, reason = "chart element counts are small")]
fn count(n: usize) -> f64 {
    n as f64
}

/// `[min, max]` of `values`, always including zero, padded by 5% away from zero.
fn value_domain(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let pad = (hi - lo) * 0.05;
    if hi > 0.0 {
        hi += pad;
    }
    if lo < 0.0 {
        lo -= pad;
    }

    (lo, hi)
}

fn year_domain(years: impl IntoIterator<Item = i32>) -> (f64, f64) {
    let mut iter = years.into_iter();
    let Some(first) = iter.next() else {
        return (0.0, 1.0);
    };
    let (lo, hi) = iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    (f64::from(lo), f64::from(hi))
}

struct Series<'a> {
    label: &'a str,
    color: &'a str,
    points: Vec<(f64, f64)>,
}

fn line_chart(title: &str, series: &[Series<'_>], show_legend: bool) -> Result<String> {
    let x_domain = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .fold(None, |acc: Option<(f64, f64)>, x| Some(acc.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x)))))
        .unwrap_or((0.0, 1.0));
    let y_domain = value_domain(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    let plot = Plot::new(PLOT_AREA, x_domain, y_domain);

    let mut out = String::new();
    svg::open(&mut out, WIDTH, HEIGHT)?;
    svg::title(&mut out, PLOT_AREA.left + PLOT_AREA.width / 2.0, 30.0, title)?;
    svg::y_axis(&mut out, &plot, &svg::ticks(y_domain.0, y_domain.1, 6), EMISSIONS_LABEL)?;
    svg::x_axis(&mut out, &plot, &svg::ticks(x_domain.0, x_domain.1, 8), "Year")?;

    for s in series {
        let points: Vec<(f64, f64)> = s.points.iter().map(|&(x, y)| plot.point(x, y)).collect();
        svg::polyline(&mut out, &points, s.color, 2.0)?;
    }

    if show_legend {
        let entries: Vec<(&str, &str)> = series.iter().map(|s| (s.label, s.color)).collect();
        svg::legend(&mut out, LEGEND_ORIGIN, &entries)?;
    }

    svg::close(&mut out)?;
    Ok(out)
}

fn total_timeseries(totals: &BTreeMap<i32, f64>) -> Result<String> {
    log::debug!(target: LOG_TARGET, "Rendering {TOTAL_FILE}");

    let series = [Series {
        label: "Total CO₂",
        color: TOTAL_COLOR,
        points: totals.iter().map(|(&year, &value)| (f64::from(year), value)).collect(),
    }];

    line_chart("Global CO₂ Emissions Over Time", &series, false)
}

fn sector_timeseries(sector_long: &[SectorRecord]) -> Result<String> {
    log::debug!(target: LOG_TARGET, "Rendering {SECTORS_FILE}");

    let labels: Vec<String> = Sector::iter().map(|s| s.to_string()).collect();
    let series: Vec<Series<'_>> = Sector::iter()
        .zip(&labels)
        .filter_map(|(sector, label)| {
            let mut points: Vec<(f64, f64)> = sector_long
                .iter()
                .filter(|r| r.sector == sector)
                .map(|r| (f64::from(r.year), r.emissions_mtco2))
                .collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));

            (!points.is_empty()).then_some(Series {
                label: label.as_str(),
                color: sector_color(sector),
                points,
            })
        })
        .collect();

    line_chart("Sectoral CO₂ Emissions Over Time", &series, true)
}

fn shares_stacked_area(shares: &[ShareRecord], totals: &BTreeMap<i32, f64>) -> Result<String> {
    log::debug!(target: LOG_TARGET, "Rendering {SHARES_FILE}");

    let lookup: BTreeMap<(i32, Sector), f64> = shares.iter().map(|r| ((r.year, r.sector), r.share_of_total.unwrap_or(0.0))).collect();
    let years: Vec<i32> = totals.keys().copied().collect();

    let plot = Plot::new(PLOT_AREA, year_domain(years.iter().copied()), (0.0, 1.0));

    let mut out = String::new();
    svg::open(&mut out, WIDTH, HEIGHT)?;
    svg::title(&mut out, PLOT_AREA.left + PLOT_AREA.width / 2.0, 30.0, "Sectoral Shares of Global CO₂ Emissions")?;
    svg::y_axis(&mut out, &plot, &svg::ticks(0.0, 1.0, 5), "Share of Total Emissions")?;

    let mut baseline = vec![0.0_f64; years.len()];
    let mut entries = Vec::with_capacity(Sector::COUNT);
    let labels: Vec<String> = Sector::iter().map(|s| s.to_string()).collect();

    for (sector, label) in Sector::iter().zip(&labels) {
        let values: Vec<f64> = years.iter().map(|&year| lookup.get(&(year, sector)).copied().unwrap_or(0.0)).collect();
        let top: Vec<f64> = baseline.iter().zip(&values).map(|(b, v)| b + v).collect();

        let mut outline: Vec<(f64, f64)> = years.iter().zip(&top).map(|(&year, &y)| plot.point(f64::from(year), y)).collect();
        outline.extend(years.iter().zip(&baseline).rev().map(|(&year, &y)| plot.point(f64::from(year), y)));

        svg::polygon(&mut out, &outline, sector_color(sector), 0.8)?;
        entries.push((label.as_str(), sector_color(sector)));
        baseline = top;
    }

    let (x0, x1) = year_domain(years.iter().copied());
    svg::x_axis(&mut out, &plot, &svg::ticks(x0, x1, 8), "Year")?;
    svg::legend(&mut out, LEGEND_ORIGIN, &entries)?;
    svg::close(&mut out)?;
    Ok(out)
}

/// Sector deltas for the last `years` calendar years, undefined deltas as zero.
fn recent_deltas(contribution: &[ContributionRecord], years: usize) -> BTreeMap<i32, [f64; Sector::COUNT]> {
    let Some(max_year) = contribution.iter().map(|r| r.year).max() else {
        return BTreeMap::new();
    };
    let span = i32::try_from(years).unwrap_or(i32::MAX);
    let min_year = max_year.saturating_sub(span).saturating_add(1);

    let mut by_year: BTreeMap<i32, [f64; Sector::COUNT]> = BTreeMap::new();
    for record in contribution.iter().filter(|r| r.year >= min_year) {
        by_year.entry(record.year).or_insert([0.0; Sector::COUNT])[record.sector.index()] = record.delta_mtco2.unwrap_or(0.0);
    }
    by_year
}

fn contribution_bars(contribution: &[ContributionRecord], years: usize) -> Result<String> {
    log::debug!(target: LOG_TARGET, "Rendering contribution figure for the last {years} years");

    let by_year = recent_deltas(contribution, years);

    let extremes = by_year.values().flat_map(|deltas| {
        let up: f64 = deltas.iter().filter(|d| **d > 0.0).sum();
        let down: f64 = deltas.iter().filter(|d| **d < 0.0).sum();
        [up, down]
    });
    let y_domain = value_domain(extremes);
    let bars = by_year.len().max(1);
    let plot = Plot::new(PLOT_AREA, (0.0, count(bars)), y_domain);

    let mut out = String::new();
    svg::open(&mut out, WIDTH, HEIGHT)?;
    svg::title(
        &mut out,
        PLOT_AREA.left + PLOT_AREA.width / 2.0,
        30.0,
        &format!("Sector Contributions to Annual CO₂ Change (Last {years} Years)"),
    )?;
    svg::y_axis(&mut out, &plot, &svg::ticks(y_domain.0, y_domain.1, 6), "Change in Emissions (MtCO₂)")?;

    let label_every = bars.div_ceil(20);
    let bottom = PLOT_AREA.bottom();
    for (slot, (year, deltas)) in by_year.iter().enumerate() {
        let left = count(slot) + 0.15;
        let right = count(slot) + 0.85;
        let (mut up, mut down) = (0.0, 0.0);

        for sector in Sector::iter() {
            let delta = deltas[sector.index()];
            let (from, to) = if delta >= 0.0 {
                up += delta;
                (up - delta, up)
            } else {
                down += delta;
                (down - delta, down)
            };
            if delta != 0.0 {
                svg::rect(&mut out, plot.point(left, from), plot.point(right, to), sector_color(sector), None)?;
            }
        }

        if slot % label_every == 0 {
            let x = plot.x.map(count(slot) + 0.5);
            svg::text(&mut out, x, bottom + 18.0, Anchor::Middle, 10, &year.to_string())?;
        }
    }

    let zero = plot.y.map(0.0);
    svg::line(&mut out, (PLOT_AREA.left, zero), (PLOT_AREA.right(), zero), svg::AXIS_COLOR, 0.8)?;
    svg::text(&mut out, PLOT_AREA.left + PLOT_AREA.width / 2.0, bottom + 40.0, Anchor::Middle, 12, "Year")?;

    let labels: Vec<String> = Sector::iter().map(|s| s.to_string()).collect();
    let entries: Vec<(&str, &str)> = Sector::iter().zip(&labels).map(|(s, label)| (label.as_str(), sector_color(s))).collect();
    svg::legend(&mut out, LEGEND_ORIGIN, &entries)?;
    svg::close(&mut out)?;
    Ok(out)
}

fn lmdi_waterfall(periods: &[LmdiPeriodResult]) -> Result<Option<String>> {
    if periods.is_empty() {
        return Ok(None);
    }

    log::debug!(target: LOG_TARGET, "Rendering {LMDI_FILE} with {} panels", periods.len());

    let width = PANEL_WIDTH * count(periods.len());
    let mut out = String::new();
    svg::open(&mut out, width, HEIGHT)?;

    for (index, period) in periods.iter().enumerate() {
        let offset = PANEL_WIDTH * count(index);
        write_lmdi_panel(&mut out, period, offset)?;
    }

    svg::close(&mut out)?;
    Ok(Some(out))
}

fn write_lmdi_panel(out: &mut String, period: &LmdiPeriodResult, offset: f64) -> Result<()> {
    let bars = [
        ("Population", period.effect_population),
        ("Affluence", period.effect_affluence),
        ("Intensity", period.effect_intensity),
        ("Total", Some(period.delta_co2)),
    ];

    let area = Rect::new(PANEL_AREA.left + offset, PANEL_AREA.top, PANEL_AREA.width, PANEL_AREA.height);
    let y_domain = value_domain(bars.iter().filter_map(|(_, v)| *v));
    let plot = Plot::new(area, (0.0, count(bars.len())), y_domain);

    svg::title(out, area.left + area.width / 2.0, 30.0, &format!("LMDI Decomposition: {}", period.period))?;
    svg::y_axis(out, &plot, &svg::ticks(y_domain.0, y_domain.1, 6), "Effect on ΔCO₂ (MtCO₂)")?;

    let zero = plot.y.map(0.0);
    for (slot, (label, value)) in bars.iter().enumerate() {
        let left = count(slot) + 0.15;
        let right = count(slot) + 0.85;
        let center = plot.x.map(count(slot) + 0.5);

        match value {
            Some(v) => {
                let color = if *label == "Total" {
                    DELTA_COLOR
                } else if *v > 0.0 {
                    POSITIVE_COLOR
                } else {
                    NEGATIVE_COLOR
                };
                svg::rect(out, plot.point(left, 0.0), plot.point(right, *v), color, Some(svg::AXIS_COLOR))?;
            }
            None => svg::text(out, center, zero - 6.0, Anchor::Middle, 11, "n/a")?,
        }

        svg::text(out, center, area.bottom() + 18.0, Anchor::Middle, 11, label)?;
    }

    svg::line(out, (area.left, zero), (area.right(), zero), svg::AXIS_COLOR, 0.8)?;
    Ok(())
}
