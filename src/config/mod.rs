// src/config/mod.rs
// Configuration

pub mod env;

pub use env::{ConfigIssue, ConfigValidation, EnvConfig, load_dotenv};
