// src/http.rs
// Shared HTTP client for all Early API traffic

use std::time::Duration;

/// Per-request timeout for every Early API call (sign-in included)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client.
///
/// Created once at startup and handed to the transport; reqwest pools
/// connections internally.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("early-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
