//! Headless map driver.
//!
//! Reads one JSON command per line on stdin, writes each overlay swap as a
//! JSON line on stdout, and logs to stderr. Configuration comes from
//! `AREAMAP_*` environment variables (a `.env` file is honoured).

use std::sync::Arc;

use areamap::config::MapConfig;
use areamap::error::{ErrorCode, MapError};
use areamap::notify::LogNotifier;
use areamap::orchestrator::{MapHandle, Orchestrator, parse_command};
use areamap::provider::http::HttpAreaProvider;
use areamap::render::GeoJsonRenderer;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MapError> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let config = MapConfig::from_env()?;
    let provider = Arc::new(HttpAreaProvider::new(&config.api_endpoint, config.timeouts)?);
    let renderer = GeoJsonRenderer::new(std::io::stdout(), config.initial_viewport());

    let mut orch = Orchestrator::new(&config, Box::new(renderer), provider.clone(), Arc::new(LogNotifier));
    if let Err(e) = orch.initialize(provider.as_ref()).await {
        tracing::warn!(error = %e, code = e.error_code(), "starting without area types");
    }

    tracing::info!(endpoint = %config.api_endpoint, zoom = config.zoom, "areamap ready");

    tokio::spawn(read_commands(orch.handle()));
    orch.run().await;
    Ok(())
}

/// Forward stdin commands to the orchestrator until EOF, then ask it to stop.
async fn read_commands(handle: MapHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match parse_command(&line) {
                Ok(command) => {
                    if !handle.send(command.into()) {
                        return;
                    }
                }
                Err(e) => tracing::warn!(error = %e, code = e.error_code(), "ignoring command"),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        }
    }
    if !handle.shutdown() {
        tracing::debug!("orchestrator already stopped");
    }
}
