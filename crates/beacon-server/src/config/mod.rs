//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use beacon_core::error::{BeaconError, Result};

pub use schema::{AppSection, BeaconConfig, MetricsSection, ServerSection};

/// Config file read when `BEACON_CONFIG` is not set.
pub const DEFAULT_PATH: &str = "beacon.yaml";

/// Load config from `BEACON_CONFIG` (or `beacon.yaml`), falling back to
/// defaults when the file does not exist, then apply `PORT`.
pub fn load() -> Result<BeaconConfig> {
    let path = std::env::var("BEACON_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
    let cfg = match fs::read_to_string(&path) {
        Ok(s) => load_from_str(&s)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            BeaconConfig::default()
        }
        Err(e) => return Err(BeaconError::Internal(format!("read config failed: {e}"))),
    };

    let port = std::env::var("PORT").ok();
    let cfg = cfg.with_port_override(port.as_deref())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse and validate. A file holding nothing but blank lines and comments
/// means defaults.
pub fn load_from_str(s: &str) -> Result<BeaconConfig> {
    if is_blank_yaml(s) {
        return Ok(BeaconConfig::default());
    }
    let cfg: BeaconConfig = serde_yaml::from_str(s)
        .map_err(|e| BeaconError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

fn is_blank_yaml(s: &str) -> bool {
    s.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#') || l == "---"
    })
}
