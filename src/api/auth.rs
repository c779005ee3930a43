// src/api/auth.rs
// Bearer token cache with expiry-aware refresh via the sign-in exchange

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::describe_status;
use super::transport::{HttpRequest, Transport};
use crate::error::{ApiError, ApiErrorKind};

/// Sign-in endpoint, relative to the API base URL
pub const SIGN_IN_PATH: &str = "/developer/sign-in";

/// Local token lifetime. The API doesn't report one, so this is a
/// conservative guess; the dispatcher refreshes early on a 401.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

pub const MISSING_CREDENTIALS: &str =
    "EARLY_API_KEY and EARLY_API_SECRET environment variables required";

/// API key/secret pair, fixed for the life of the process
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Both halves present and non-blank
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token and the instant it stops being trusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
}

/// Holds the credentials and the current token.
///
/// Constructed once per process and shared with the dispatcher. The cached
/// value is only ever replaced whole, under the write lock; concurrent
/// callers that find it stale may each sign in, the last write wins.
pub struct TokenCache {
    transport: Arc<dyn Transport>,
    base_url: String,
    credentials: Option<Credentials>,
    current: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            current: RwLock::new(None),
        }
    }

    /// Start with an already-issued token
    pub fn with_token(self, token: CachedToken) -> Self {
        Self {
            current: RwLock::new(Some(token)),
            ..self
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.as_ref().is_some_and(Credentials::is_complete)
    }

    /// Snapshot of the cached token, valid or not
    pub async fn cached(&self) -> Option<CachedToken> {
        self.current.read().await.clone()
    }

    /// Return a usable bearer token, signing in if none is cached or it expired
    pub async fn get_token(&self) -> Result<String, ApiError> {
        let credentials = match &self.credentials {
            Some(c) if c.is_complete() => c,
            _ => return Err(ApiError::unauthenticated(MISSING_CREDENTIALS)),
        };

        if let Some(cached) = self.current.read().await.as_ref()
            && cached.is_valid_at(Utc::now())
        {
            return Ok(cached.token.clone());
        }

        let fresh = self.sign_in(credentials).await?;
        let token = fresh.token.clone();
        *self.current.write().await = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token, but only if it is still `stale`. A concurrent
    /// refresh that already replaced it is left alone.
    pub async fn invalidate(&self, stale: &str) {
        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|c| c.token == stale) {
            debug!("Invalidating rejected token");
            *current = None;
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<CachedToken, ApiError> {
        let issued_at = Utc::now();
        info!("Signing in to Early API");

        let request = HttpRequest {
            method: Method::POST,
            url: format!("{}{}", self.base_url, SIGN_IN_PATH),
            bearer: None,
            body: Some(serde_json::json!({
                "apiKey": credentials.api_key,
                "apiSecret": credentials.api_secret,
            })),
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let status = response.status;
            let message = describe_status(status, &response.body);
            warn!(status, "Sign-in rejected");
            let kind = match status {
                401 | 403 => ApiErrorKind::Unauthenticated,
                other => ApiErrorKind::RemoteStatus(other),
            };
            return Err(ApiError {
                kind,
                message,
                status: Some(status),
            });
        }

        let parsed: SignInResponse = serde_json::from_str(&response.body).map_err(|e| {
            ApiError::invalid_response(format!("sign-in response has no token: {}", e))
        })?;
        if parsed.token.is_empty() {
            return Err(ApiError::invalid_response("sign-in returned an empty token"));
        }

        Ok(CachedToken {
            token: parsed.token,
            expires_at: issued_at + Duration::seconds(TOKEN_LIFETIME_SECS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use serde_json::json;

    const BASE: &str = "https://early.test/api/v4";

    fn creds() -> Option<Credentials> {
        Some(Credentials::new("key", "secret"))
    }

    fn unreachable_api() -> Arc<MockTransport> {
        MockTransport::with_sign_in(|req| panic!("unexpected request to {}", req.url))
    }

    // ============================================================================
    // Missing credentials
    // ============================================================================

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let transport = unreachable_api();
        let cases = [
            None,
            Some(Credentials::new("", "secret")),
            Some(Credentials::new("key", "")),
            Some(Credentials::new("  ", "  ")),
        ];

        for credentials in cases {
            let cache = TokenCache::new(transport.clone(), BASE, credentials);
            let err = cache.get_token().await.unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
            assert!(!cache.has_credentials());
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_checked_before_cache() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport.clone(), BASE, None).with_token(CachedToken {
            token: "still-valid".into(),
            expires_at: Utc::now() + Duration::hours(1),
        });

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
        assert_eq!(transport.calls(), 0);
    }

    // ============================================================================
    // Reuse and refresh
    // ============================================================================

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport.clone(), BASE, creds()).with_token(CachedToken {
            token: "cached".into(),
            expires_at: Utc::now() + Duration::hours(1),
        });

        assert_eq!(cache.get_token().await.unwrap(), "cached");
        assert_eq!(cache.get_token().await.unwrap(), "cached");
        assert_eq!(transport.sign_ins(), 0);
    }

    #[tokio::test]
    async fn test_first_call_signs_in_once() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport.clone(), BASE, creds());

        let before = Utc::now();
        let token = cache.get_token().await.unwrap();
        let after = Utc::now();

        assert_eq!(token, "tok-1");
        assert_eq!(transport.sign_ins(), 1);

        let cached = cache.cached().await.unwrap();
        assert!(cached.expires_at >= before + Duration::seconds(TOKEN_LIFETIME_SECS));
        assert!(cached.expires_at <= after + Duration::seconds(TOKEN_LIFETIME_SECS));

        // Second call is served from cache
        assert_eq!(cache.get_token().await.unwrap(), "tok-1");
        assert_eq!(transport.sign_ins(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_sends_credentials() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport.clone(), format!("{}/", BASE), creds());
        cache.get_token().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url, format!("{}{}", BASE, SIGN_IN_PATH));
        assert!(requests[0].bearer.is_none());
        assert_eq!(
            requests[0].body,
            Some(json!({"apiKey": "key", "apiSecret": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport.clone(), BASE, creds()).with_token(CachedToken {
            token: "old".into(),
            expires_at: Utc::now() - Duration::seconds(1),
        });

        assert_eq!(cache.get_token().await.unwrap(), "tok-1");
        assert_eq!(transport.sign_ins(), 1);
    }

    #[tokio::test]
    async fn test_token_expiring_now_is_not_used() {
        let cached = CachedToken {
            token: "edge".into(),
            expires_at: Utc::now(),
        };
        assert!(!cached.is_valid_at(cached.expires_at));
        assert!(cached.is_valid_at(cached.expires_at - Duration::milliseconds(1)));
    }

    // ============================================================================
    // Sign-in failures
    // ============================================================================

    #[tokio::test]
    async fn test_rejected_credentials_are_unauthenticated() {
        let transport =
            MockTransport::new(|_| mock::json(401, json!({"message": "Invalid API key"})));
        let cache = TokenCache::new(transport.clone(), BASE, creds());

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
        assert_eq!(err.message, "Invalid API key");
        assert_eq!(err.status, Some(401));
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_remote_status_and_not_cached() {
        let transport = MockTransport::new(|_| mock::raw(503, ""));
        let cache = TokenCache::new(transport.clone(), BASE, creds());

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::RemoteStatus(503));
        assert!(cache.cached().await.is_none());

        // No automatic retry; the next call tries again
        let _ = cache.get_token().await;
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_sign_in_404_is_not_reported_as_not_found() {
        let transport = MockTransport::new(|_| mock::raw(404, ""));
        let cache = TokenCache::new(transport, BASE, creds());
        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::RemoteStatus(404));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = MockTransport::new(|_| Err(ApiError::transport("connection refused")));
        let cache = TokenCache::new(transport, BASE, creds());
        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.message, "connection refused");
    }

    #[tokio::test]
    async fn test_missing_token_field_is_invalid_response() {
        let transport = MockTransport::new(|_| mock::json(200, json!({"ok": true})));
        let cache = TokenCache::new(transport, BASE, creds());
        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidResponse);
        assert!(cache.cached().await.is_none());
    }

    // ============================================================================
    // Invalidation
    // ============================================================================

    #[tokio::test]
    async fn test_invalidate_only_matching_token() {
        let transport = unreachable_api();
        let cache = TokenCache::new(transport, BASE, creds()).with_token(CachedToken {
            token: "current".into(),
            expires_at: Utc::now() + Duration::hours(1),
        });

        cache.invalidate("someone-else").await;
        assert!(cache.cached().await.is_some());

        cache.invalidate("current").await;
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_callers_see_whole_tokens() {
        let transport = unreachable_api();
        let cache = Arc::new(TokenCache::new(transport.clone(), BASE, creds()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_token().await })
            })
            .collect();

        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            assert!(token.starts_with("tok-"));
        }

        let cached = cache.cached().await.unwrap();
        assert!(cached.token.starts_with("tok-"));
        assert!(transport.sign_ins() >= 1);
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let debug = format!("{:?}", Credentials::new("key", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
