//! Client orchestration: build → transport → decode.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::decoder::{ResponseDecoder, ResponseEnvelope};
use crate::error::{Result, TopError};
use crate::factory::RequestFactory;
use crate::http_client::ReqwestTransport;
use crate::sign::SignMethod;
use crate::traits::{Authenticator, TopRequest, Transport};
use crate::types::{AppCredentials, DispatchMode, TransportResponse};

/// Typed client for the open platform gateway.
///
/// Holds only immutable, shared collaborators; cloning is cheap and one
/// instance can serve any number of concurrent calls.
///
/// # Construction
///
/// ```rust,no_run
/// use top_client::{AppCredentials, TokenAuthenticator, TopClient};
///
/// let client = TopClient::builder(AppCredentials::new("app-key", "app-secret"))
///     .authenticator(TokenAuthenticator::new("session-token"))
///     .build()?;
/// # Ok::<(), top_client::TopError>(())
/// ```
#[derive(Clone)]
pub struct TopClient {
    credentials: Arc<AppCredentials>,
    factory: RequestFactory,
    transport: Arc<dyn Transport>,
    authenticator: Option<Arc<dyn Authenticator>>,
    decoder: ResponseDecoder,
}

/// Builder for [`TopClient`].
pub struct TopClientBuilder {
    credentials: AppCredentials,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl TopClientBuilder {
    fn new(credentials: AppCredentials) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            transport: None,
            authenticator: None,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Gateway endpoint (default: `https://api.taobao.com/router/rest`).
    #[must_use]
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.config.service_url = url.into();
        self
    }

    /// Signing generation (default: [`SignMethod::HmacSha256`]).
    #[must_use]
    pub fn sign_method(mut self, sign_method: SignMethod) -> Self {
        self.config.sign_method = sign_method;
        self
    }

    /// Parameter placement (default: [`DispatchMode::PostForm`]).
    #[must_use]
    pub fn dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.config.dispatch_mode = mode;
        self
    }

    /// `partner_id` system parameter (default: not sent).
    #[must_use]
    pub fn partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.config.partner_id = Some(partner_id.into());
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 0).
    ///
    /// Only applies to the built-in transport.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Use a custom transport instead of the built-in reqwest one.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Resolver used by authenticated calls without an explicit token.
    #[must_use]
    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Build the [`TopClient`] instance.
    pub fn build(self) -> Result<TopClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&self.config)?),
        };

        let factory = RequestFactory::new(
            self.config.service_url,
            self.config.sign_method,
            self.config.dispatch_mode,
        )
        .with_partner_id(self.config.partner_id);

        Ok(TopClient {
            credentials: Arc::new(self.credentials),
            factory,
            transport,
            authenticator: self.authenticator,
            decoder: ResponseDecoder,
        })
    }
}

impl TopClient {
    /// Creates a client with default settings.
    pub fn new(credentials: AppCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: AppCredentials) -> TopClientBuilder {
        TopClientBuilder::new(credentials)
    }

    pub fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }

    /// Sends an unauthenticated call.
    pub async fn send_request<R: TopRequest>(&self, request: &R) -> Result<R::Response> {
        let response = self.dispatch(request, None).await?;
        self.decoder.decode(&response.body, request.method())
    }

    /// Sends a call with a session token.
    ///
    /// `token` wins; otherwise the configured authenticator resolves one.
    /// Without either, fails before anything is sent.
    pub async fn send_authenticated_request<R: TopRequest>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> Result<R::Response> {
        let session = self.resolve_token(token).await?;
        let response = self.dispatch(request, Some(&session)).await?;
        self.decoder.decode(&response.body, request.method())
    }

    /// Dispatches and returns the classified envelope without decoding the
    /// payload into the request's response type.
    pub async fn envelope<R: TopRequest>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> Result<ResponseEnvelope> {
        let session = match token {
            Some(t) => Some(self.resolve_token(Some(t)).await?),
            None => None,
        };
        let response = self.dispatch(request, session.as_deref()).await?;
        self.decoder.envelope(&response.body, request.method())
    }

    async fn resolve_token(&self, token: Option<&str>) -> Result<String> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }

        match &self.authenticator {
            Some(authenticator) => authenticator.resolve_token(&self.credentials).await,
            None => Err(TopError::Authentication {
                detail: "authenticated call requires a token or an authenticator".to_string(),
            }),
        }
    }

    async fn dispatch<R: TopRequest>(
        &self,
        request: &R,
        session: Option<&str>,
    ) -> Result<TransportResponse> {
        let transport_request = self.factory.build(request, &self.credentials, session)?;
        let response = self.transport.send(transport_request).await.map_err(|e| {
            if e.is_expected() {
                log::warn!("[top] {}: {e}", request.method());
            } else {
                log::error!("[top] {}: {e}", request.method());
            }
            e
        })?;
        log::debug!(
            "[top] {} answered with HTTP {}",
            request.method(),
            response.status
        );
        Ok(response)
    }
}
