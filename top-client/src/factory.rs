//! Request factory: typed request → signed transport request.

use chrono::{DateTime, Utc};

use crate::canonical::canonicalize;
use crate::config::API_VERSION;
use crate::error::{Result, TopError};
use crate::sign::{SIGN_KEY, SignMethod};
use crate::traits::TopRequest;
use crate::types::{
    AppCredentials, CanonicalParameterSet, DispatchMode, FORM_CONTENT_TYPE, HttpMethod,
    RequestFormat, TransportRequest,
};
use crate::utils::datetime::format_timestamp;
use crate::utils::log_sanitizer::redact_params;

/// Builds signed [`TransportRequest`]s.
///
/// Holds only immutable settings, so one factory can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    service_url: String,
    sign_method: SignMethod,
    dispatch_mode: DispatchMode,
    partner_id: Option<String>,
}

impl RequestFactory {
    pub fn new(
        service_url: impl Into<String>,
        sign_method: SignMethod,
        dispatch_mode: DispatchMode,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            sign_method,
            dispatch_mode,
            partner_id: None,
        }
    }

    /// Sets the optional `partner_id` system parameter.
    #[must_use]
    pub fn with_partner_id(mut self, partner_id: Option<String>) -> Self {
        self.partner_id = partner_id;
        self
    }

    pub fn sign_method(&self) -> SignMethod {
        self.sign_method
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch_mode
    }

    /// Builds a request stamped with the current time.
    ///
    /// `session` is attached only for authenticated calls.
    pub fn build<R: TopRequest + ?Sized>(
        &self,
        request: &R,
        credentials: &AppCredentials,
        session: Option<&str>,
    ) -> Result<TransportRequest> {
        self.build_at(request, credentials, session, Utc::now())
    }

    /// Same as [`build`](Self::build) with an explicit timestamp.
    pub fn build_at<R: TopRequest + ?Sized>(
        &self,
        request: &R,
        credentials: &AppCredentials,
        session: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TransportRequest> {
        let params = self.signed_parameters(request, credentials, session, now)?;
        log::debug!(
            "[top] {} {} ({})",
            request.method(),
            self.service_url,
            redact_params(&params)
        );
        Ok(self.compose(params))
    }

    /// Validates, canonicalizes and signs `request`.
    pub fn signed_parameters<R: TopRequest + ?Sized>(
        &self,
        request: &R,
        credentials: &AppCredentials,
        session: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<CanonicalParameterSet> {
        let format = request.format();
        if format != RequestFormat::Json {
            return Err(TopError::validation(
                "format",
                format!("Client only supports JSON mode, got `{format}` mode"),
            ));
        }

        request.validate()?;

        let system = self.system_parameters(request.method(), credentials, session, now);
        let mut params = canonicalize(request, &system)?;

        // sign 是保留键，请求字段中同名的值不参与签名
        params.remove(SIGN_KEY);
        let signature = self.sign_method.sign(&params, &credentials.app_secret);
        params.insert(SIGN_KEY, signature);

        Ok(params)
    }

    fn system_parameters(
        &self,
        method: &str,
        credentials: &AppCredentials,
        session: Option<&str>,
        now: DateTime<Utc>,
    ) -> CanonicalParameterSet {
        let mut system = CanonicalParameterSet::new();
        system.insert("app_key", credentials.app_key.as_str());
        system.insert("method", method);
        system.insert("timestamp", format_timestamp(now));
        system.insert("format", RequestFormat::Json.as_str());
        system.insert("v", API_VERSION);
        system.insert("sign_method", self.sign_method.as_str());
        if let Some(partner_id) = &self.partner_id {
            system.insert("partner_id", partner_id.as_str());
        }
        if let Some(session) = session {
            system.insert("session", session);
        }
        system
    }

    fn compose(&self, params: CanonicalParameterSet) -> TransportRequest {
        let encoded = params.to_urlencoded();
        let query_url = if encoded.is_empty() {
            self.service_url.clone()
        } else {
            let separator = if self.service_url.contains('?') { '&' } else { '?' };
            format!("{}{separator}{encoded}", self.service_url)
        };

        match self.dispatch_mode {
            DispatchMode::PostForm => TransportRequest {
                method: HttpMethod::Post,
                url: self.service_url.clone(),
                headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
                body: encoded.into_bytes(),
                params,
            },
            DispatchMode::PostQuery => TransportRequest {
                method: HttpMethod::Post,
                url: query_url,
                headers: Vec::new(),
                body: Vec::new(),
                params,
            },
            DispatchMode::Get => TransportRequest {
                method: HttpMethod::Get,
                url: query_url,
                headers: Vec::new(),
                body: Vec::new(),
                params,
            },
        }
    }
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_SERVICE_URL,
            SignMethod::default(),
            DispatchMode::default(),
        )
    }
}
