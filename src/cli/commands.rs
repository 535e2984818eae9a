//! CLI command implementations

use std::io::{self, Write};

use crate::config::CrmConfig;
use crate::gateway::StorageGateway;
use crate::http_server::health_routes::diagnose;
use crate::http_server::{AppState, HttpServer};
use crate::observability::{Event, Logger};

use super::args::{Cli, Command, ConfigArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(&config),
        Command::Check { config } => check(&config),
    }
}

/// Resolve configuration, apply the log level and open the store.
fn boot(args: &ConfigArgs) -> CliResult<(CrmConfig, AppState)> {
    Logger::set_min_severity(args.log_level);

    let config = args.to_config();
    config.validate().map_err(CliError::config_error)?;

    let port = config.server.port.to_string();
    Logger::info(
        Event::ConfigLoaded.as_str(),
        &[
            ("database_url_set", if config.database_url_set() { "true" } else { "false" }),
            ("host", config.server.host.as_str()),
            ("port", port.as_str()),
        ],
    );

    let gateway = StorageGateway::connect(config.database_url.as_deref());
    let state = AppState::new(gateway)
        .with_database_url_set(config.database_url_set())
        .with_database_name(config.database_name.clone());

    Ok((config, state))
}

/// Run the HTTP API until interrupted.
///
/// An unavailable store does not prevent startup: diagnostics report it and
/// data endpoints answer 500.
pub fn serve(args: &ConfigArgs) -> CliResult<()> {
    let (config, state) = boot(args)?;
    let server = HttpServer::new(config.server, state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the diagnostic report as JSON; fail if the store is not connected.
pub fn check(args: &ConfigArgs) -> CliResult<()> {
    let (_config, state) = boot(args)?;
    let report = diagnose(&state);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;

    if state.gateway.is_connected() {
        Ok(())
    } else {
        Err(CliError::check_failed(report.database))
    }
}
