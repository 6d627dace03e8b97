#![doc(hidden)]

//! Core library for kaya-decomp
//!
//! This library consolidates all functionality for the kaya-decomp tool, which turns the
//! Our World in Data global CO₂ series into sectoral metrics, a Kaya/LMDI decomposition,
//! and a set of static charts.
//!
//! # Module Organization
//!
//! - [`analysis`]: The decomposition and metrics engine
//! - [`data`]: Loading and validating the input dataset
//! - [`reports`]: Table export, chart rendering, and the console summary
//! - `commands`: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod analysis;
pub mod data;
pub mod reports;

mod commands;

pub use crate::commands::{Config, Host, run};
