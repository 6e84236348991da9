use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error envelope returned by the platform for a failed call.
///
/// Carries everything the gateway reports so callers can branch on
/// [`code`](Self::code) or [`sub_code`](Self::sub_code). Its `Display`
/// output is exactly the envelope's `msg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{msg}")]
pub struct ApiError {
    /// Top-level error code (numeric strings are accepted on input).
    #[serde(deserialize_with = "deserialize_code")]
    pub code: i64,
    /// Human-readable error message.
    #[serde(default)]
    pub msg: String,
    /// Business-level error code, e.g. `isv.invalid-parameter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_code: Option<String>,
    /// Business-level error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_msg: Option<String>,
    /// Gateway request id, useful when contacting platform support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// 错误码既可能是数字，也可能是数字字符串
fn deserialize_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Int(i64),
        Str(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Int(code) => Ok(code),
        Code::Str(s) => s
            .trim()
            .parse()
            .map_err(|e| Error::custom(format!("Invalid error code '{s}': {e}"))),
    }
}

/// Unified error type for every stage of the dispatch pipeline.
///
/// Nothing in this crate retries or swallows these; they surface to the
/// caller unchanged. All variants are serializable for structured error
/// reporting.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TopError {
    /// The request is malformed or unsupported and was never sent.
    #[error("Invalid parameter '{param}': {detail}")]
    Validation {
        /// Name of the offending parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to serialize the request into wire parameters.
    #[error("Serialization error: {detail}")]
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The response body is not valid JSON or does not match the expected shape.
    #[error("Decoding error: {detail}")]
    Decoding {
        /// Details about the decode failure.
        detail: String,
    },

    /// No session token could be resolved for an authenticated call.
    #[error("Authentication error: {detail}")]
    Authentication {
        /// Error details.
        detail: String,
    },

    /// The client could not be constructed from its configuration.
    #[error("Configuration error: {detail}")]
    Configuration {
        /// Error details.
        detail: String,
    },

    /// The platform answered with a well-formed error envelope.
    #[error(transparent)]
    Api(ApiError),
}

impl TopError {
    /// Shortcut for a [`Validation`](Self::Validation) error.
    pub fn validation(param: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            detail: detail.into(),
        }
    }

    /// Shortcut for a [`Decoding`](Self::Decoding) error.
    pub fn decoding(detail: impl ToString) -> Self {
        Self::Decoding {
            detail: detail.to_string(),
        }
    }

    /// 是否为瞬时错误（网络、超时），供传输层的重试策略使用。
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// 是否为预期行为（用户输入、平台业务错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Authentication { .. } | Self::Api(_)
        )
    }

    /// Returns the platform error envelope, if this is an API error.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for TopError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

/// Convenience type alias for `Result<T, TopError>`.
pub type Result<T> = std::result::Result<T, TopError>;
