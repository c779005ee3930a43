// src/api/mod.rs
// Early API access: transport, token cache, dispatcher and payload models

pub mod auth;
pub mod client;
pub mod models;
pub mod request;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use auth::{CachedToken, Credentials, TokenCache};
pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use request::{ApiResponse, RequestSpec, segment};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
