//! CLI argument definitions using clap
//!
//! Commands:
//! - employee-api init --config <path>
//! - employee-api serve --config <path> [--port <port>]
//! - employee-api compact --config <path>

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Employee API - CRUD service for employee records
#[derive(Parser, Debug)]
#[command(name = "employee-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty collection log
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./employees.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./employees.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Rewrite the collection log keeping only live documents
    Compact {
        /// Path to configuration file
        #[arg(long, default_value = "./employees.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_port_override() {
        let cli = Cli::try_parse_from(["employee-api", "-v", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("./employees.json"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_custom_config() {
        let cli = Cli::try_parse_from(["employee-api", "init", "--config", "/tmp/e.json"]).unwrap();
        assert!(matches!(cli.command, Command::Init { config } if config == PathBuf::from("/tmp/e.json")));
    }
}
