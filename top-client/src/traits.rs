use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::types::{AppCredentials, RequestFormat, TransportRequest, TransportResponse};

/// A typed call to one remote method.
///
/// Every request model implements this trait; its associated
/// [`Response`](Self::Response) type is what a successful call decodes into.
/// The model's serde declaration is its wire contract: each serialized field
/// name is sent as-is.
///
/// ```rust,ignore
/// #[derive(Debug, Default, Serialize)]
/// pub struct HttpDnsGetRequest {
///     #[serde(skip)]
///     pub format: RequestFormat,
/// }
///
/// impl TopRequest for HttpDnsGetRequest {
///     type Response = HttpDnsGetResponse;
///
///     fn method(&self) -> &'static str {
///         "taobao.httpdns.get"
///     }
///
///     fn format(&self) -> RequestFormat {
///         self.format
///     }
/// }
/// ```
pub trait TopRequest: Serialize + Send + Sync {
    /// Payload found under the `<method>_response` key on success.
    type Response: DeserializeOwned + Send;

    /// Remote method name, e.g. `aliexpress.solution.feed.submit`.
    fn method(&self) -> &'static str;

    /// Requested response format. Only JSON is supported.
    fn format(&self) -> RequestFormat {
        RequestFormat::Json
    }

    /// Checks declared constraints (required fields, lengths) before the
    /// request is canonicalized.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Sends a signed request and returns the raw response.
///
/// Non-2xx statuses are valid responses: the gateway still returns a JSON
/// error envelope that must reach the decoder. Only network-level failures
/// are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Resolves the session token for authenticated calls.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve_token(&self, credentials: &AppCredentials) -> Result<String>;
}
