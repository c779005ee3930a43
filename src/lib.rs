// src/lib.rs
// early-mcp - MCP server for the Early time tracking API

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod cli;
pub mod config;
pub mod duration;
pub mod error;
pub mod http;
pub mod mcp;
pub mod tools;
pub use error::{ApiError, EarlyError, Result};
