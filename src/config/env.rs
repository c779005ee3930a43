// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::fmt;

use tracing::{debug, error, info, warn};
use url::Url;

use crate::api::{Credentials, DEFAULT_BASE_URL};

pub const API_KEY_VAR: &str = "EARLY_API_KEY";
pub const API_SECRET_VAR: &str = "EARLY_API_SECRET";
pub const API_URL_VAR: &str = "EARLY_API_URL";

/// A single problem found in the Early environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A credential half is unset; tool calls fail until it is provided
    MissingCredential(&'static str),
    /// The base URL uses http, so the API secret travels in clear text
    PlainHttp,
    UnsupportedScheme(String),
    InvalidUrl(String),
}

impl ConfigIssue {
    /// Fatal issues stop `serve` and `tool`; the rest are only reported
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedScheme(_) | Self::InvalidUrl(_))
    }

    pub fn variable(&self) -> &'static str {
        match self {
            Self::MissingCredential(var) => *var,
            Self::PlainHttp | Self::UnsupportedScheme(_) | Self::InvalidUrl(_) => API_URL_VAR,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential(var) => {
                write!(f, "{} is not set. Every Early tool call will fail until it is.", var)
            }
            Self::PlainHttp => write!(
                f,
                "{} uses plain http; credentials will be sent unencrypted",
                API_URL_VAR
            ),
            Self::UnsupportedScheme(scheme) => {
                write!(f, "{} has unsupported scheme '{}'", API_URL_VAR, scheme)
            }
            Self::InvalidUrl(reason) => write!(f, "{} is not a valid URL: {}", API_URL_VAR, reason),
        }
    }
}

/// Outcome of [`EnvConfig::validate`]
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigValidation {
    /// Usable for serving; missing credentials alone don't count
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ConfigIssue::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| !i.is_fatal())
    }

    /// Fatal issues joined into one line for an error message
    pub fn fatal_summary(&self) -> String {
        self.fatal()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Report for `early-mcp check`: one line per variable, then a verdict
    pub fn report(&self, config: &EnvConfig) -> String {
        let status = |var: &'static str, set: bool| {
            let problems: Vec<String> = self
                .issues
                .iter()
                .filter(|i| i.variable() == var && !matches!(i, ConfigIssue::MissingCredential(_)))
                .map(|i| format!("    ! {}", i))
                .collect();
            let head = format!("  {:<18} {}", var, if set { "set" } else { "not set" });
            std::iter::once(head).chain(problems).collect::<Vec<_>>()
        };

        let mut lines = vec!["Early API configuration".to_string()];
        lines.extend(status(API_KEY_VAR, config.api_key.is_some()));
        lines.extend(status(API_SECRET_VAR, config.api_secret.is_some()));
        lines.extend(status(API_URL_VAR, config.base_url.is_some()));
        lines.push(format!("  Base URL: {}", config.base_url()));

        let verdict = if !self.is_valid() {
            "invalid"
        } else if config.credentials().is_none() {
            "incomplete (credentials missing)"
        } else if self.issues.is_empty() {
            "ready"
        } else {
            "ready with warnings"
        };
        lines.push(format!("Status: {}", verdict));
        lines.join("\n")
    }

    /// Emit every issue through tracing
    pub fn log(&self) {
        for issue in self.fatal() {
            error!(variable = issue.variable(), "Configuration error: {}", issue);
        }
        for issue in self.warnings() {
            warn!(variable = issue.variable(), "Configuration warning: {}", issue);
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// API key (EARLY_API_KEY)
    pub api_key: Option<String>,
    /// API secret (EARLY_API_SECRET)
    pub api_secret: Option<String>,
    /// Base URL override (EARLY_API_URL)
    pub base_url: Option<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source, filtering blank values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            api_key: read(API_KEY_VAR),
            api_secret: read(API_SECRET_VAR),
            base_url: read(API_URL_VAR).map(|u| u.trim().to_string()),
        };
        debug!(
            has_key = config.api_key.is_some(),
            has_secret = config.api_secret.is_some(),
            base_url = config.base_url(),
            "Environment configuration read"
        );
        config
    }

    /// Credentials, when both halves are set
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            _ => None,
        }
    }

    /// Effective API base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Check credentials and the base URL override
    pub fn validate(&self) -> ConfigValidation {
        let mut issues = Vec::new();

        if self.api_key.is_none() {
            issues.push(ConfigIssue::MissingCredential(API_KEY_VAR));
        }
        if self.api_secret.is_none() {
            issues.push(ConfigIssue::MissingCredential(API_SECRET_VAR));
        }

        if let Some(raw) = &self.base_url {
            match Url::parse(raw) {
                Ok(url) if url.scheme() == "https" => {}
                Ok(url) if url.scheme() == "http" => issues.push(ConfigIssue::PlainHttp),
                Ok(url) => issues.push(ConfigIssue::UnsupportedScheme(url.scheme().to_string())),
                Err(e) => issues.push(ConfigIssue::InvalidUrl(e.to_string())),
            }
        }

        ConfigValidation { issues }
    }
}

/// Load `.env` files: the global `~/.early/.env` first, then the current directory
pub fn load_dotenv() {
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".early/.env"));
    }
    let _ = dotenvy::dotenv();
}
