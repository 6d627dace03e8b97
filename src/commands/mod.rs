//! Command-line interface and orchestration for kaya-decomp
//!
//! ## Commands
//!
//! - **analyze**: Load the dataset, run the engine, render every table and figure in memory,
//!   then write them out and print a summary
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and values
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. All output goes through a [`Host`] so commands can be
//! driven in-process by tests.

mod analyze;
mod common;
mod config;
mod host;
mod init;
mod run;
mod validate;

pub use analyze::{AnalyzeArgs, analyze};
pub use config::Config;
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
