//! Game server health probe.

use crate::config::Endpoint;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const HEALTHCHECK_PATH: &str = "/api/healthcheck";

const HEALTHCHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of the server's health route.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

pub struct HealthChecker {
    http_client: Client,
    url: String,
}

impl HealthChecker {
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            http_client: Client::new(),
            url: format!("{}{}", endpoint.http_base(), HEALTHCHECK_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if the game server is healthy.
    pub async fn check(&self) -> Result<HealthStatus> {
        let response = self
            .http_client
            .get(&self.url)
            .timeout(HEALTHCHECK_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Health check request to {} failed", self.url))?
            .error_for_status()?;

        response
            .json()
            .await
            .context("Health check returned an unexpected body")
    }
}
