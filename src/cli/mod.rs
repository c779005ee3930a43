// src/cli/mod.rs
// Command-line entry points

use clap::{Parser, Subcommand};

pub mod check;
pub mod serve;
pub mod tool;

pub use check::run_check;
pub use serve::{build_client, run_mcp_server};
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "early-mcp")]
#[command(about = "MCP server for the Early time tracking API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. early_get_tracking, early_list_time_entries)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"activity_id": "123"}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },

    /// Validate configuration and try signing in
    Check,
}
