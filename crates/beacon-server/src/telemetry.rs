//! Tracing subscriber setup for the binaries.

use tracing_subscriber::{fmt, EnvFilter};

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

/// Log to stdout (server).
pub fn init() {
    fmt().with_env_filter(filter()).init();
}

/// Log to stderr so stdout stays free for event responses.
pub fn init_stderr() {
    fmt().with_env_filter(filter()).with_writer(std::io::stderr).init();
}
