//! Shared start-up for the `redoit` and `doneit` binaries.

use anyhow::Context;
use redoit_core::config::config_path;
use redoit_core::{AppConfig, BoardClient, Remote, UreqTransport};

/// Diagnostics go to stderr; stdout carries the status lines.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Load the config file and build a remote for its API URL and credentials.
pub fn connect() -> anyhow::Result<(AppConfig, Remote<UreqTransport>)> {
    let path = config_path();
    let config = AppConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(path = %path.display(), usernames = ?config.credentials.usernames, "loaded config");
    let remote = Remote::new(BoardClient::new(&config.api_url, &config.credentials), UreqTransport);
    Ok((config, remote))
}
