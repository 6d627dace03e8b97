use crate::Result;
use crate::analysis::{AnalysisTables, LmdiPeriodResult, Sector};
use camino::Utf8Path;
use core::fmt::Write;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;

/// Summary of a completed run, for the terminal.
pub fn generate<W: Write>(
    tables: &AnalysisTables,
    tables_dir: &Utf8Path,
    figures_dir: &Utf8Path,
    use_colors: bool,
    writer: &mut W,
) -> Result<()> {
    let heading = "CO₂ decomposition complete";
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }

    if let Some((first, last)) = tables.year_range() {
        writeln!(writer, "  Years            : {first}–{last} ({} years)", tables.totals_by_year.len())?;
    }

    let (min, max) = tables
        .totals_by_year
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min.is_finite() && max.is_finite() {
        writeln!(writer, "  Total CO₂        : {min:.1}–{max:.1} MtCO₂")?;
    }

    let sectors: BTreeSet<Sector> = tables.sector_long.iter().map(|r| r.sector).collect();
    writeln!(writer, "  Sectors analysed : {}", sectors.len())?;
    writeln!(writer, "  LMDI periods     : {}", tables.lmdi.len())?;

    for period in &tables.lmdi {
        write_period(writer, period, use_colors)?;
    }

    writeln!(writer)?;
    writeln!(writer, "  Tables  : {tables_dir}")?;
    writeln!(writer, "  Figures : {figures_dir}")?;

    Ok(())
}

fn write_period<W: Write>(writer: &mut W, period: &LmdiPeriodResult, use_colors: bool) -> Result<()> {
    write!(writer, "    {}", period.period)?;
    for (label, value) in [
        ("population", period.effect_population),
        ("affluence", period.effect_affluence),
        ("intensity", period.effect_intensity),
        ("ΔCO₂", Some(period.delta_co2)),
    ] {
        write!(writer, "  {label} {}", format_effect(value, use_colors))?;
    }

    if period.was_adjusted() {
        write!(writer, "  (requested {}–{})", period.requested.0, period.requested.1)?;
    }

    writeln!(writer)?;
    Ok(())
}

/// Signed effect with one decimal. Increases are red and decreases green when colouring.
fn format_effect(value: Option<f64>, use_colors: bool) -> String {
    let Some(v) = value else {
        return "n/a".to_string();
    };

    let text = format!("{v:+.1}");
    if !use_colors {
        return text;
    }

    if v > 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnnualRecord, PeriodRequest, PipelineOptions, run_analysis};
    use strum::EnumCount;

    fn tables() -> AnalysisTables {
        let records: Vec<AnnualRecord> = [(2000, 100.0), (2001, 110.0), (2002, 121.0)]
            .into_iter()
            .map(|(year, total)| {
                let mut sectors = [None; Sector::COUNT];
                sectors[Sector::Coal.index()] = Some(total / 2.0);
                sectors[Sector::Oil.index()] = Some(total / 2.0);
                AnnualRecord {
                    year,
                    total_co2: total,
                    population: 100.0,
                    gdp: 1000.0,
                    sectors,
                }
            })
            .collect();

        let options = PipelineOptions {
            smoothing_window: 1,
            periods: vec![PeriodRequest::years(2000, 2002), PeriodRequest::years(1990, 2001)],
        };
        run_analysis(&records, &options).unwrap()
    }

    #[test]
    fn test_summary_without_colors() {
        let mut output = String::new();
        generate(&tables(), Utf8Path::new("out/tables"), Utf8Path::new("out/figures"), false, &mut output).unwrap();

        insta::assert_snapshot!(output, @r"
        CO₂ decomposition complete
          Years            : 2000–2002 (3 years)
          Total CO₂        : 100.0–121.0 MtCO₂
          Sectors analysed : 2
          LMDI periods     : 2
            2000–2002  population +0.0  affluence +0.0  intensity +21.0  ΔCO₂ +21.0
            2000–2001  population +0.0  affluence +0.0  intensity +10.0  ΔCO₂ +10.0  (requested 1990–2001)

          Tables  : out/tables
          Figures : out/figures
        ");
    }

    #[test]
    fn test_summary_with_colors_contains_ansi() {
        let mut output = String::new();
        generate(&tables(), Utf8Path::new("t"), Utf8Path::new("f"), true, &mut output).unwrap();
        assert!(output.contains("\u{1b}["));
    }

    #[test]
    fn test_format_effect() {
        assert_eq!(format_effect(None, false), "n/a");
        assert_eq!(format_effect(Some(-3.26), false), "-3.3");
        assert_eq!(format_effect(Some(12.0), false), "+12.0");
    }
}
