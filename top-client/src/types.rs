use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============ Credentials ============

/// Application credentials issued by the open platform.
///
/// Owned by the client for its whole lifetime and never mutated.
/// The secret and session are redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppCredentials {
    /// Application key (`app_key` on the wire).
    pub app_key: String,
    /// Shared secret used for signing. Never sent over the wire.
    pub app_secret: String,
    /// Optional session (access token) bound to these credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl AppCredentials {
    /// Creates credentials without a session token.
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            session: None,
        }
    }

    /// Attaches a session token.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"***")
            .field("session", &self.session.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============ Request Format ============

/// Response format requested from the gateway.
///
/// The client only understands JSON; any other value is rejected before
/// dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFormat {
    /// JSON responses.
    #[default]
    Json,
    /// XML responses (unsupported).
    Xml,
}

impl RequestFormat {
    /// Wire value of the `format` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Canonical Parameters ============

/// Flat, key-sorted wire parameters used as signing input.
///
/// Keys are unique and iteration is always ascending by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalParameterSet(BTreeMap<String, String>);

impl CanonicalParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Percent-encodes the set as `k1=v1&k2=v2`, keys ascending.
    pub fn to_urlencoded(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<(String, String)> for CanonicalParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============ Transport Types ============

/// HTTP method used to reach the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// How the signed parameters travel to the gateway.
///
/// Parameters are never split: they are either all in the body or all in
/// the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// `POST` with an `application/x-www-form-urlencoded` body.
    #[default]
    PostForm,
    /// `POST` with every parameter in the query string and an empty body.
    PostQuery,
    /// `GET` with every parameter in the query string.
    Get,
}

/// Form body content type used by [`DispatchMode::PostForm`].
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

/// A fully built, signed HTTP request ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Absolute URL including the query string, if any.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Request body; empty when parameters travel in the query string.
    pub body: Vec<u8>,
    /// The signed parameters, kept for logging and inspection.
    pub params: CanonicalParameterSet,
}

impl TransportRequest {
    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response handed back by a [`Transport`](crate::Transport).
///
/// Any HTTP status is a valid response; classification happens in the
/// decoder based on the body alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
