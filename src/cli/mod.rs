//! CLI module for the employee API
//!
//! Provides command-line interface for:
//! - init: Create the data directory and empty collection log
//! - serve: Open the store and run the HTTP server
//! - compact: Rewrite the collection log to live documents only

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{compact, init, run, run_command, serve};
pub use config::{Config, StorageBackend};
pub use errors::{CliError, CliErrorCode, CliResult};
