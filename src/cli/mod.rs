//! CLI module
//!
//! Command-line interface for the extractor.
//!
//! # Commands
//!
//! - `run` - Execute an extraction into an output directory
//! - `validate` - Check the configuration without any network activity

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
