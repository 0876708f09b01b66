//! Treequote command-line interface.
//!
//! Reads equipment, crew, loadout and project records from JSON files, runs
//! them through the pricing engine and prints the breakdowns.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod files;

pub use error::{CliError, Result};
