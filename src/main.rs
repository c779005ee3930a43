// src/main.rs
// early-mcp - Early time tracking for MCP clients

use anyhow::Result;
use clap::Parser;
use early_mcp::cli::{Cli, Commands, run_check, run_mcp_server, run_tool};
use early_mcp::config::load_dotenv;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Global ~/.early/.env first, then the current directory
    load_dotenv();

    let cli = Cli::parse();

    let log_level = match &cli.command {
        Some(Commands::Serve) | None => Level::WARN, // Quiet for MCP stdio
        Some(Commands::Tool { .. }) | Some(Commands::Check) => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => run_mcp_server().await?,
        Some(Commands::Tool { name, args }) => run_tool(name, args).await?,
        Some(Commands::Check) => run_check().await?,
    }

    Ok(())
}
