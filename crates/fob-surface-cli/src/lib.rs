//! Command-line front end for `fob-surface`.
//!
//! - [`cli`] - Argument definitions
//! - [`config`] - Layered configuration (`figment`)
//! - [`commands`] - The analysis run
//! - [`output`] - Report file naming and persistence
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - `tracing` setup (stderr)
//! - [`ui`] - Console summary

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
