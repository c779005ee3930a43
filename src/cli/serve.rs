// src/cli/serve.rs
// MCP server initialization and main loop

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::error::EarlyError;
use crate::http::create_shared_client;
use crate::mcp::EarlyServer;

/// Build the API client from loaded configuration
pub fn build_client(config: &EnvConfig) -> ApiClient {
    ApiClient::connect(
        create_shared_client(),
        config.base_url(),
        config.credentials(),
    )
}

/// Load configuration, refusing to start when it has hard errors
pub(crate) fn load_checked_config() -> Result<EnvConfig> {
    let config = EnvConfig::load();
    let validation = config.validate();
    validation.log();

    if !validation.is_valid() {
        return Err(EarlyError::Config(validation.fatal_summary()).into());
    }
    Ok(config)
}

/// Run the MCP server with stdio transport
pub async fn run_mcp_server() -> Result<()> {
    let config = load_checked_config()?;
    let api = Arc::new(build_client(&config));
    info!(base_url = api.base_url(), "Starting Early MCP server");

    let server = EarlyServer::new(api);
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_uses_configured_url() {
        let config = EnvConfig::from_lookup(|name| match name {
            "EARLY_API_URL" => Some("http://localhost:9999/api/v4/".to_string()),
            _ => None,
        });
        let api = build_client(&config);
        assert_eq!(api.base_url(), "http://localhost:9999/api/v4");
        assert!(!api.tokens().has_credentials());
    }

    #[test]
    fn test_build_client_default_url() {
        let config = EnvConfig::from_lookup(|name| match name {
            "EARLY_API_KEY" => Some("k".to_string()),
            "EARLY_API_SECRET" => Some("s".to_string()),
            _ => None,
        });
        let api = build_client(&config);
        assert_eq!(api.base_url(), crate::api::DEFAULT_BASE_URL);
        assert!(api.tokens().has_credentials());
    }
}
