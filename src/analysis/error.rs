use thiserror::Error;

/// Failures raised while loading or analyzing the emissions dataset.
///
/// Undefined ratios are not errors: they surface as `None` in the output records.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input file or the requested row-group does not exist.
    #[error("{0}")]
    MissingInput(String),

    /// Required columns are absent from the input.
    #[error("input is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A value expected to be numeric could not be used as a number.
    #[error("{0}")]
    DataFormat(String),

    /// A component received an invalid parameter.
    #[error("{0}")]
    Config(String),

    /// A keyed join found no matching row.
    #[error("no total emissions recorded for year {year}")]
    Join { year: i32 },

    #[error("unable to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub(crate) fn non_numeric(column: &str, location: impl core::fmt::Display, value: &str) -> Self {
        Self::DataFormat(format!("column '{column}' at {location} holds non-numeric value '{value}'"))
    }

    /// Name of the failure category, used when reporting a failed run.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "MissingInputError",
            Self::Schema { .. } => "SchemaError",
            Self::DataFormat(_) | Self::Csv(_) => "DataFormatError",
            Self::Config(_) => "ConfigError",
            Self::Join { .. } => "JoinError",
            Self::Io(_) => "IoError",
        }
    }
}
