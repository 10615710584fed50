//! Gateway event entry point.
//!
//! Reads one JSON event per line on stdin and writes one JSON response per
//! line on stdout. Logs go to stderr.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use beacon_core::error::{BeaconError, Result};

use beacon_server::{app_state::AppState, config, event, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_stderr();

    let cfg = config::load()?;
    let state = AppState::new(cfg)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let io_err = |e: std::io::Error| BeaconError::Internal(format!("stdio: {e}"));

    while let Some(line) = lines.next_line().await.map_err(io_err)? {
        if line.trim().is_empty() {
            continue;
        }
        let resp = event::handle_json(&state, &line);
        let mut out = serde_json::to_string(&resp)
            .map_err(|e| BeaconError::Internal(format!("encode response: {e}")))?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await.map_err(io_err)?;
        stdout.flush().await.map_err(io_err)?;
    }

    tracing::debug!("stdin closed, exiting");
    Ok(())
}
