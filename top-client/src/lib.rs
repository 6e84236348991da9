//! # top-client
//!
//! A typed client for the Taobao Open Platform (TOP) RPC gateway, the API
//! surface behind AliExpress and Taobao seller integrations.
//!
//! Each remote method (e.g. `aliexpress.solution.feed.submit`) is a request
//! model implementing [`TopRequest`] with an associated response type. The
//! client canonicalizes and signs the request, sends it through a
//! [`Transport`] and decodes the envelope into the typed response or a
//! [`TopError::Api`].
//!
//! ## Signing
//!
//! | [`SignMethod`] | `sign_method` | Digest |
//! |----------------|---------------|--------|
//! | `Md5` | `md5` | MD5(secret + params + secret) |
//! | `HmacMd5` | `hmac` | HMAC-MD5(secret, params) |
//! | `HmacSha256` *(default)* | `hmac-sha256` | HMAC-SHA256(secret, params) |
//!
//! ## Feature Flags
//!
//! ### Models
//!
//! - **`all-models`** *(default)* — Enable every model family below.
//! - **`aliexpress`** — Category and feed models under [`models::aliexpress`].
//! - **`taobao`** — Gateway and OAuth models under [`models::taobao`].
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! top-client = { version = "0.1", default-features = false, features = ["aliexpress", "rustls"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use top_client::models::aliexpress::SolutionFeedQuery;
//! use top_client::{AppCredentials, TokenAuthenticator, TopClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TopClient::builder(AppCredentials::new("app-key", "app-secret"))
//!         .authenticator(TokenAuthenticator::new("session-token"))
//!         .build()?;
//!
//!     let response = client
//!         .send_authenticated_request(&SolutionFeedQuery::new(200_000_000_060_054_475), None)
//!         .await?;
//!
//!     if let Some(results) = &response.result_list {
//!         for item in &results.single_item_response_dto {
//!             println!("{}: {:?}", item.item_content_id, item.item_execution_result);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Models
//!
//! Methods without a bundled model are declared the same way:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use top_client::{RequestFormat, Result, TopRequest, validate};
//!
//! #[derive(Serialize)]
//! struct SolutionProductInfoGet {
//!     product_id: Option<i64>,
//!     #[serde(skip)]
//!     format: RequestFormat,
//! }
//!
//! #[derive(Deserialize)]
//! struct SolutionProductInfoGetResponse {
//!     result: serde_json::Value,
//! }
//!
//! impl TopRequest for SolutionProductInfoGet {
//!     type Response = SolutionProductInfoGetResponse;
//!
//!     fn method(&self) -> &'static str {
//!         "aliexpress.solution.product.info.get"
//!     }
//!
//!     fn format(&self) -> RequestFormat {
//!         self.format
//!     }
//!
//!     fn validate(&self) -> Result<()> {
//!         validate::required("product_id", self.product_id.as_ref())
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, TopError>`](TopError):
//!
//! - [`TopError::Validation`] — the request was rejected before dispatch
//! - [`TopError::Authentication`] — no session token could be resolved
//! - [`TopError::Network`] / [`TopError::Timeout`] — transport failure (retryable)
//! - [`TopError::Decoding`] — the body is not a recognizable envelope
//! - [`TopError::Api`] — the gateway answered with an error envelope
//!
//! The core never retries. [`ReqwestTransport`] can retry transient errors
//! when `max_retries` is set; it is `0` by default because some methods
//! (feed submission) are not idempotent.

mod auth;
mod canonical;
mod client;
mod config;
mod decoder;
mod error;
mod factory;
mod http_client;
pub mod models;
mod sign;
mod traits;
mod types;
mod utils;
pub mod validate;

// Re-export error types
pub use error::{ApiError, Result, TopError};

// Re-export client
pub use client::{TopClient, TopClientBuilder};
pub use config::{API_VERSION, ClientConfig, DEFAULT_SERVICE_URL};

// Re-export core traits
pub use traits::{Authenticator, TopRequest, Transport};

// Re-export pipeline stages
pub use canonical::{canonicalize, request_parameters};
pub use decoder::{ERROR_RESPONSE_KEY, ResponseDecoder, ResponseEnvelope, success_key};
pub use factory::RequestFactory;
pub use sign::{SIGN_KEY, SignMethod};

// Re-export authenticators and transport
pub use auth::{
    AuthorizationUriBuilder, CachedAuthenticator, CredentialsAuthenticator,
    DEFAULT_AUTHORIZATION_URL, TokenAuthenticator,
};
pub use http_client::ReqwestTransport;

// Re-export types
pub use types::{
    AppCredentials, CanonicalParameterSet, DispatchMode, FORM_CONTENT_TYPE, HttpMethod,
    RequestFormat, TransportRequest, TransportResponse,
};

// Re-export utils module
pub use utils::{datetime, embedded_json};

// Compile-time assertions: shared types must be Send + Sync for concurrent calls.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<TopClient>;
    let _ = assert_send_sync::<TopError>;
    let _ = assert_send_sync::<RequestFactory>;
    let _ = assert_send_sync::<CachedAuthenticator<TokenAuthenticator>>;
};
