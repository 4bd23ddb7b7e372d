//! Shared outbound HTTP client.
//!
//! Every upstream call goes through one `reqwest::Client` so connection
//! pooling and transport timeouts are configured in a single place.

use std::time::Duration;

use crate::config::HttpConfig;

/// Build the outbound client with request and connect timeouts applied.
pub fn build_client(config: &HttpConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
}
