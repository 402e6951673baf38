//! CLI command implementations

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use super::args::{Cli, Command};
use super::config::{Config, StorageBackend};
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServer;
use crate::logging;
use crate::store::FileStore;

/// Main CLI entry point
///
/// Parses arguments, initializes logging and dispatches the command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Compact { config } => compact(&config),
    }
}

fn write_response(value: Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Create the data directory and an empty log for the configured collection
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let path = init_data_dir(&config)?;

    write_response(json!({
        "initialized": true,
        "collection": config.collection,
        "path": path.display().to_string(),
    }))
}

fn init_data_dir(config: &Config) -> CliResult<std::path::PathBuf> {
    fs::create_dir_all(&config.data_dir).map_err(|e| {
        CliError::config_error(format!(
            "Failed to create directory {}: {}",
            config.data_dir.display(),
            e
        ))
    })?;

    let store = FileStore::open(&config.data_dir, &config.collection)?;
    info!(collection = %config.collection, path = %store.path().display(), "initialized data directory");
    Ok(store.path().to_path_buf())
}

/// Open the configured store and serve HTTP until ctrl-c
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let store = config.open_store()?;
    info!(
        collection = %config.collection,
        storage = ?config.storage,
        "opened employee store"
    );

    let server = HttpServer::with_store(config.http.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::server_error(format!("HTTP server failed: {}", e)))
    })
}

/// Compact the configured collection log
pub fn compact(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    if config.storage != StorageBackend::File {
        return Err(CliError::config_error(
            "compact requires the file storage backend",
        ));
    }

    let store = FileStore::open(&config.data_dir, &config.collection)?;
    store.compact()?;

    write_response(json!({
        "compacted": true,
        "collection": config.collection,
    }))
}
