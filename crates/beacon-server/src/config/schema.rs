use std::net::SocketAddr;

use serde::Deserialize;

use beacon_core::error::{BeaconError, Result};
use beacon_core::metrics::{check_bounds, DEFAULT_BUCKETS};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeaconConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            app: AppSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

fn default_version() -> u32 {
    1
}

impl BeaconConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BeaconError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.app.validate()?;
        self.metrics.validate()?;

        Ok(())
    }

    /// Replace the listen port (the `PORT` environment variable).
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        let Some(port) = port else { return Ok(self) };
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| BeaconError::BadRequest(format!("PORT must be a port number: {e}")))?;

        let mut addr = self.server.listen_addr()?;
        addr.set_port(port);
        self.server.listen = addr.to_string();
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            BeaconError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Message served by `GET /`.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Message served for `/` through the gateway event entry point.
    #[serde(default = "default_event_greeting")]
    pub event_greeting: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            event_greeting: default_event_greeting(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.greeting.trim().is_empty() {
            return Err(BeaconError::BadRequest("app.greeting must not be empty".into()));
        }
        if self.event_greeting.trim().is_empty() {
            return Err(BeaconError::BadRequest(
                "app.event_greeting must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_greeting() -> String {
    "Hello from Beacon!".into()
}
fn default_event_greeting() -> String {
    "Hello from Beacon Lambda!".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Upper bounds (seconds) of `app_request_latency_seconds`.
    #[serde(default = "default_latency_buckets")]
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            latency_buckets: default_latency_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        check_bounds("metrics.latency_buckets", &self.latency_buckets)
            .map_err(|e| BeaconError::BadRequest(e.to_string()))
    }
}

fn default_latency_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
