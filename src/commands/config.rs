use crate::Result;
use crate::analysis::smoothing::validate_window;
use crate::analysis::{PeriodRequest, PipelineOptions};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

const LOG_TARGET: &str = "    config";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up when none is given explicitly
pub const CONFIG_FILE_NAME: &str = "kaya.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the Our World in Data CO₂ dataset
    #[serde(default = "default_input")]
    pub input: Utf8PathBuf,

    /// Name of the aggregate row-group to analyze
    #[serde(default = "default_entity")]
    pub entity: String,

    /// Root output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: Utf8PathBuf,

    /// Directory receiving the CSV tables
    #[serde(default = "default_tables_dir")]
    pub tables_dir: Utf8PathBuf,

    /// Directory receiving the SVG figures
    #[serde(default = "default_figures_dir")]
    pub figures_dir: Utf8PathBuf,

    /// Centered rolling-mean window, in years
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Number of most recent years shown in the contribution chart
    #[serde(default = "default_contribution_years")]
    pub contribution_years: usize,

    /// Periods for the Kaya/LMDI decomposition
    #[serde(default = "PeriodRequest::defaults")]
    pub lmdi_periods: Vec<PeriodRequest>,
}

fn default_input() -> Utf8PathBuf {
    Utf8PathBuf::from("data/owid-co2-data.csv")
}

fn default_entity() -> String {
    "World".to_string()
}

fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("output")
}

fn default_tables_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("output/tables")
}

fn default_figures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("output/figures")
}

const fn default_smoothing_window() -> usize {
    5
}

const fn default_contribution_years() -> usize {
    20
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `kaya.toml` in `base_dir` is used when present. Relative
    /// paths in the result are resolved against the directory holding the configuration file,
    /// or `base_dir` when defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading kaya-decomp configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No {CONFIG_FILE_NAME} in '{base_dir}', using defaults");
                    let mut config = Self::default();
                    config.resolve_paths(base_dir);
                    return Ok(config);
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading kaya-decomp configuration file '{path}'")),
            }
        };

        let mut config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        let config_dir = final_path.parent().unwrap_or(base_dir);
        config.resolve_paths(config_dir);

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the smoothing window is not a positive odd number, `contribution_years`
    /// is zero, or the entity is empty
    pub fn validate(&self) -> Result<()> {
        validate_window(self.smoothing_window).into_app_err("invalid smoothing_window")?;

        if self.contribution_years == 0 {
            return Err(app_err!("contribution_years must be at least 1"));
        }

        if self.entity.trim().is_empty() {
            return Err(app_err!("entity must not be empty"));
        }

        Ok(())
    }

    /// Engine parameters carried by this configuration
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            smoothing_window: self.smoothing_window,
            periods: self.lmdi_periods.clone(),
        }
    }

    fn resolve_paths(&mut self, dir: &Utf8Path) {
        for path in [
            &mut self.input,
            &mut self.output_dir,
            &mut self.tables_dir,
            &mut self.figures_dir,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
