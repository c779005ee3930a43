// src/cli/check.rs
// Read-only configuration and connectivity check

use anyhow::Result;

use super::serve::build_client;
use crate::config::EnvConfig;

/// Print the configuration report, then attempt a sign-in
pub async fn run_check() -> Result<()> {
    let config = EnvConfig::load();
    let validation = config.validate();
    println!("{}", validation.report(&config));

    if !validation.is_valid() {
        anyhow::bail!("configuration is invalid");
    }

    let api = build_client(&config);
    if !api.tokens().has_credentials() {
        println!("Skipping sign-in: credentials are not set.");
        return Ok(());
    }

    match api.tokens().get_token().await {
        Ok(_) => println!("Signed in to {}", api.base_url()),
        Err(e) => println!("Sign-in failed. {}", e.to_report()),
    }
    Ok(())
}
