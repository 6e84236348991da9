//! Session token resolution and OAuth helpers.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, TopError};
use crate::traits::Authenticator;
use crate::types::AppCredentials;

/// 默认授权页地址
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://oauth.aliexpress.com/authorize";

// ============ Static tokens ============

/// Always resolves to the same, pre-issued session token.
#[derive(Clone)]
pub struct TokenAuthenticator {
    token: String,
}

impl TokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("token", &"***")
            .finish()
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn resolve_token(&self, _credentials: &AppCredentials) -> Result<String> {
        if self.token.is_empty() {
            return Err(TopError::Authentication {
                detail: "configured token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

/// Uses the session stored on [`AppCredentials`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialsAuthenticator;

#[async_trait]
impl Authenticator for CredentialsAuthenticator {
    async fn resolve_token(&self, credentials: &AppCredentials) -> Result<String> {
        credentials
            .session
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TopError::Authentication {
                detail: format!("no session configured for app key {}", credentials.app_key),
            })
    }
}

// ============ Caching ============

struct CachedToken {
    token: String,
    fetched_at: Instant,
}

/// Caches the token resolved by an inner authenticator.
///
/// The cache sits behind an async mutex held across the inner call, so
/// concurrent callers wait for a single refresh instead of racing.
pub struct CachedAuthenticator<A> {
    inner: A,
    ttl: Option<Duration>,
    cache: Mutex<Option<CachedToken>>,
}

impl<A: Authenticator> CachedAuthenticator<A> {
    /// Caches forever (until [`invalidate`](Self::invalidate)).
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            ttl: None,
            cache: Mutex::new(None),
        }
    }

    /// Re-resolves once the cached token is older than `ttl`.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Drops the cached token; the next call resolves a fresh one.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    fn is_fresh(&self, cached: &CachedToken) -> bool {
        self.ttl
            .is_none_or(|ttl| cached.fetched_at.elapsed() < ttl)
    }
}

#[async_trait]
impl<A: Authenticator> Authenticator for CachedAuthenticator<A> {
    async fn resolve_token(&self, credentials: &AppCredentials) -> Result<String> {
        let mut guard = self.cache.lock().await;

        if let Some(cached) = guard.as_ref()
            && self.is_fresh(cached)
        {
            return Ok(cached.token.clone());
        }

        log::debug!("[top] Refreshing session token for app key {}", credentials.app_key);
        let token = self.inner.resolve_token(credentials).await?;
        *guard = Some(CachedToken {
            token: token.clone(),
            fetched_at: Instant::now(),
        });
        Ok(token)
    }
}

// ============ OAuth ============

/// Builds the seller authorization URL of the OAuth code flow.
///
/// The seller is redirected back to `redirect_uri` with a `code` that can be
/// exchanged through `taobao.top.auth.token.create`.
#[derive(Debug, Clone)]
pub struct AuthorizationUriBuilder {
    base_url: String,
    app_key: String,
    redirect_uri: String,
    state: Option<String>,
    view: String,
}

impl AuthorizationUriBuilder {
    pub fn new(app_key: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_AUTHORIZATION_URL.to_string(),
            app_key: app_key.into(),
            redirect_uri: redirect_uri.into(),
            state: None,
            view: "web".to_string(),
        }
    }

    /// Opaque value echoed back on redirect.
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// `web` (default) or `wap`.
    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(&self) -> String {
        let mut query = vec![
            ("response_type", "code"),
            ("client_id", self.app_key.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(state) = &self.state {
            query.push(("state", state.as_str()));
        }
        query.push(("view", self.view.as_str()));
        query.push(("sp", "ae"));

        let encoded = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{encoded}", self.base_url)
    }
}
