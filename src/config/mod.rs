mod file_config;

pub use file_config::FileConfig;

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

/// Environment variable holding the game server WebSocket base URL.
pub const WEBSOCKET_URL_ENV: &str = "RPG_WEBSOCKET_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:8000";

pub const DEFAULT_EVENT_LOG_LINES: usize = 10;

/// Validated WebSocket base URL of the game server, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self> {
        let base = url.trim().trim_end_matches('/');
        let host = base
            .strip_prefix("ws://")
            .or_else(|| base.strip_prefix("wss://"))
            .ok_or_else(|| anyhow!("WebSocket URL must start with ws:// or wss://: {}", url))?;
        if host.is_empty() {
            bail!("WebSocket URL has no host: {}", url);
        }
        Ok(Self {
            base: base.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Connection address for a client: `<base>/ws/<client_id>`.
    pub fn ws_url(&self, client_id: &str) -> String {
        format!("{}/ws/{}", self.base, urlencoding::encode(client_id))
    }

    /// The same host over HTTP(S), for plain REST routes.
    pub fn http_base(&self) -> String {
        if let Some(rest) = self.base.strip_prefix("wss://") {
            format!("https://{}", rest)
        } else if let Some(rest) = self.base.strip_prefix("ws://") {
            format!("http://{}", rest)
        } else {
            self.base.clone()
        }
    }
}

/// Command line values that take part in config resolution.
/// Each of them can be overridden from the TOML file.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub websocket_url: Option<String>,
    pub client_id: Option<String>,
    pub event_log_lines: usize,
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: Endpoint,
    pub client_id: String,
    /// Number of event log lines shown after each snapshot.
    pub event_log_lines: usize,
    pub history_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, an optional TOML file, and
    /// the `RPG_WEBSOCKET_URL` environment variable.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let env_url = std::env::var(WEBSOCKET_URL_ENV).ok();
        Self::resolve_with_env(cli, file_config, env_url)
    }

    /// TOML overrides CLI, CLI overrides the environment, and the environment
    /// overrides the built-in default.
    pub fn resolve_with_env(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env_url: Option<String>,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let url = file
            .websocket_url
            .or_else(|| cli.websocket_url.clone())
            .or_else(|| env_url.filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
        let endpoint = Endpoint::parse(&url)?;

        let client_id = file
            .client_id
            .or_else(|| cli.client_id.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        if client_id.trim().is_empty() {
            bail!("client_id must not be empty");
        }

        let event_log_lines = file.event_log_lines.unwrap_or(cli.event_log_lines);

        let history_file = file
            .history_file
            .map(PathBuf::from)
            .or_else(|| cli.history_file.clone());

        Ok(Self {
            endpoint,
            client_id,
            event_log_lines,
            history_file,
        })
    }
}
