//! Output generation for a completed analysis.
//!
//! - **Tables**: the six derived tables as CSV, undefined values as empty fields
//! - **Charts**: five static SVG figures
//! - **Console**: a short run summary with optional ANSI colors
//!
//! Tables and charts are rendered into memory as [`Artifact`]s so nothing is written
//! unless every output could be produced.

mod charts;
mod console;
mod svg;
mod tables;

pub use charts::{contribution_file_name, generate as generate_charts, sector_color};
pub use console::generate as generate_console;
pub use tables::generate as generate_tables;

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Artifact {
    #[must_use]
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }
}
