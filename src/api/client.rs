// src/api/client.rs
// Authenticated request dispatcher - the single point of error normalization

use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::auth::{Credentials, TokenCache};
use super::request::{ApiResponse, RequestSpec};
use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::error::ApiError;

/// Default Early API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.early.app/api/v4";

/// Dispatches authenticated calls against the Early API
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<TokenCache>,
    base_url: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: Arc<TokenCache>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Wire a reqwest-backed transport and a fresh token cache
    pub fn connect(
        http: reqwest::Client,
        base_url: &str,
        credentials: Option<Credentials>,
    ) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(http));
        let tokens = Arc::new(TokenCache::new(transport.clone(), base_url, credentials));
        Self::new(transport, tokens, base_url)
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one authenticated call.
    ///
    /// A 401 means the locally assumed token lifetime was wrong: the token
    /// is invalidated and the request repeated once with a fresh one.
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<ApiResponse, ApiError> {
        let token = self.tokens.get_token().await?;
        let mut response = self.send(&spec, &token).await?;

        if response.status == StatusCode::UNAUTHORIZED.as_u16() {
            warn!("Token rejected, refreshing and retrying once");
            self.tokens.invalidate(&token).await;
            let token = self.tokens.get_token().await?;
            response = self.send(&spec, &token).await?;
        }

        debug!(status = response.status, "Early API response");
        interpret(response)
    }

    async fn send(&self, spec: &RequestSpec, token: &str) -> Result<HttpResponse, ApiError> {
        self.transport
            .send(HttpRequest {
                method: spec.method.clone(),
                url: format!("{}{}", self.base_url, spec.path),
                bearer: Some(token.to_string()),
                body: spec.body.clone(),
            })
            .await
    }
}

/// Turn a raw exchange into a JSON value, a no-content marker, or an error
fn interpret(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let status = response.status;

    if !response.is_success() {
        return Err(ApiError::from_status(
            status,
            describe_status(status, &response.body),
        ));
    }

    if status == StatusCode::NO_CONTENT.as_u16() || response.body.trim().is_empty() {
        return Ok(ApiResponse::NoContent);
    }

    serde_json::from_str(&response.body)
        .map(ApiResponse::Json)
        .map_err(|e| ApiError::invalid_response(format!("response is not valid JSON: {}", e)))
}

/// Error text for a non-2xx response: the body's `message` field when there
/// is one, else the status code's reason phrase.
pub(crate) fn describe_status(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(|reason| format!("{} (HTTP {})", reason, status))
                .unwrap_or_else(|| format!("request failed with HTTP {}", status))
        })
}
