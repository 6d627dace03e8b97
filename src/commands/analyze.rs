use super::Host;
use super::common::{ColorMode, LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::analysis::{AnalysisTables, run_analysis};
use crate::data::load_world_table;
use crate::reports::{Artifact, generate_charts, generate_console, generate_tables};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{AppError, IntoAppError};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   analyze";

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Path to configuration file (default is `kaya.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Path to the CO₂ dataset, overriding the configuration
    #[arg(long, value_name = "PATH")]
    pub input: Option<Utf8PathBuf>,

    /// Output directory, overriding the configuration. Tables and figures are written to its
    /// `tables` and `figures` subdirectories
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Don't print the run summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Where a run reads from and writes to, after overrides.
#[derive(Debug)]
struct RunSettings {
    config: Config,
}

impl RunSettings {
    fn from_args(args: &AnalyzeArgs) -> Result<Self> {
        let mut config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

        if let Some(input) = &args.input {
            config.input.clone_from(input);
        }

        if let Some(output_dir) = &args.output_dir {
            config.output_dir.clone_from(output_dir);
            config.tables_dir = output_dir.join("tables");
            config.figures_dir = output_dir.join("figures");
        }

        Ok(Self { config })
    }
}

/// Run the full pipeline: load, analyze, render, then write every output.
///
/// On failure the error category and message go to the host's error stream and the host is
/// asked to exit with status 1. Nothing is written unless every output was rendered.
pub fn analyze<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    init_logging(args.log_level);

    log::info!(target: LOG_TARGET, "[1/5] Loading configuration");
    let settings = match RunSettings::from_args(args) {
        Ok(settings) => settings,
        Err(e) => {
            let message = e.to_string();
            return fail(host, "ConfigError", &message, e);
        }
    };
    let config = &settings.config;
    log::info!(target: LOG_TARGET, "  Input: {}", config.input);
    log::info!(target: LOG_TARGET, "  Tables: {}", config.tables_dir);
    log::info!(target: LOG_TARGET, "  Figures: {}", config.figures_dir);

    log::info!(target: LOG_TARGET, "[2/5] Loading and validating input data");
    let analysis = load_world_table(&config.input, &config.entity).and_then(|records| {
        log::info!(target: LOG_TARGET, "[3/5] Running analysis (sectoral metrics, smoothing, LMDI)");
        run_analysis(&records, &config.pipeline_options())
    });
    let tables = match analysis {
        Ok(tables) => tables,
        Err(e) => {
            let (kind, message) = (e.kind(), e.to_string());
            return fail(host, kind, &message, AppError::from(e));
        }
    };

    log::info!(target: LOG_TARGET, "[4/5] Rendering tables and figures");
    let (table_files, figure_files) = match render(&tables, config) {
        Ok(files) => files,
        Err(e) => {
            let message = e.to_string();
            return fail(host, "IoError", &message, e);
        }
    };

    log::info!(target: LOG_TARGET, "[5/5] Writing outputs");
    if let Err(e) = write_outputs(config, &table_files, &figure_files) {
        let message = e.to_string();
        return fail(host, "IoError", &message, e);
    }

    log::info!(target: LOG_TARGET, "Pipeline completed successfully");

    if !args.quiet {
        print_summary(host, &tables, config, args.color.use_colors())?;
    }

    Ok(())
}

fn render(tables: &AnalysisTables, config: &Config) -> Result<(Vec<Artifact>, Vec<Artifact>)> {
    let table_files = generate_tables(tables)?;
    let figure_files = generate_charts(tables, config.contribution_years)?;
    Ok((table_files, figure_files))
}

fn write_outputs(config: &Config, table_files: &[Artifact], figure_files: &[Artifact]) -> Result<()> {
    for dir in [&config.output_dir, &config.tables_dir, &config.figures_dir] {
        fs::create_dir_all(dir).into_app_err_with(|| format!("creating output directory '{dir}'"))?;
    }

    write_artifacts(&config.tables_dir, table_files)?;
    write_artifacts(&config.figures_dir, figure_files)?;
    Ok(())
}

fn write_artifacts(dir: &Utf8Path, artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).into_app_err_with(|| format!("writing '{path}'"))?;
        log::info!(target: LOG_TARGET, "  {} ({} bytes)", artifact.file_name, artifact.contents.len());
    }
    Ok(())
}

fn print_summary<H: Host>(host: &mut H, tables: &AnalysisTables, config: &Config, use_colors: bool) -> Result<()> {
    let mut summary = String::new();
    generate_console(tables, &config.tables_dir, &config.figures_dir, use_colors, &mut summary)?;
    let _ = write!(host.output(), "{summary}");
    Ok(())
}

fn fail<H: Host>(host: &mut H, kind: &str, message: &str, error: AppError) -> Result<()> {
    log::error!(target: LOG_TARGET, "{kind}: {message}");
    let _ = writeln!(host.error(), "{kind}: {message}");
    host.exit(1);
    Err(error)
}
