//! HTTP client configuration module
//!
//! One `reqwest::Client` is built per run and shared by every account's
//! calendar client. No request timeouts are set; calls are bounded by the
//! transport defaults.

use crate::error::{AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub tcp_keepalive: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("gcalsync/{}", env!("CARGO_PKG_VERSION")),
            tcp_keepalive: Duration::from_secs(30),
            pool_max_idle_per_host: 2,
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> AppResult<Client> {
        ClientBuilder::new()
            .user_agent(&self.user_agent)
            .tcp_keepalive(self.tcp_keepalive)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {}", e)))
    }
}
