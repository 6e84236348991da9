//! Taobao 基础接口

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::TopRequest;
use crate::types::RequestFormat;
use crate::utils::datetime::parse_unix_timestamp;
use crate::utils::embedded_json;
use crate::validate;

// ============ taobao.httpdns.get ============

/// Gateway HTTP DNS configuration. Takes no method parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpDnsGetRequest {
    #[serde(skip)]
    pub format: RequestFormat,
}

impl TopRequest for HttpDnsGetRequest {
    type Response = HttpDnsGetResponse;

    fn method(&self) -> &'static str {
        "taobao.httpdns.get"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpDnsGetResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub request_id: Option<String>,
}

// ============ taobao.top.auth.token.create ============

/// Exchanges the OAuth authorization `code` for a session token.
///
/// See [`AuthorizationUriBuilder`](crate::AuthorizationUriBuilder) for the
/// first leg of the flow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopAuthTokenCreate {
    pub code: String,
    pub uuid: Option<String>,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl TopAuthTokenCreate {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }
}

impl TopRequest for TopAuthTokenCreate {
    type Response = TopAuthTokenCreateResponse;

    fn method(&self) -> &'static str {
        "taobao.top.auth.token.create"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }

    fn validate(&self) -> Result<()> {
        validate::not_blank("code", Some(self.code.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopAuthTokenCreateResponse {
    /// 以 JSON 字符串形式返回
    #[serde(default, with = "embedded_json::option")]
    pub token_result: Option<TokenResult>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResult {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix 毫秒
    #[serde(default)]
    pub expire_time: Option<i64>,
    #[serde(default)]
    pub refresh_token_valid_time: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_nick: Option<String>,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub account_platform: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub sp: Option<String>,
}

impl TokenResult {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expire_time.and_then(parse_unix_timestamp)
    }

    pub fn refresh_token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.refresh_token_valid_time.and_then(parse_unix_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ResponseDecoder;

    #[test]
    fn token_result_is_embedded_json() {
        let body = br#"{"taobao_top_auth_token_create_response":{"token_result":"{\"access_token\":\"50000600c05\",\"refresh_token\":\"50001600c05\",\"expire_time\":1705305600000,\"user_id\":2206789,\"user_nick\":\"cn1521\",\"sp\":\"ae\"}","request_id":"zt0ck"}}"#;
        let response: TopAuthTokenCreateResponse = ResponseDecoder
            .decode(body, "taobao.top.auth.token.create")
            .unwrap();
        let token = response.token_result.unwrap();
        assert_eq!(token.access_token, "50000600c05");
        assert_eq!(token.user_id, Some(2_206_789));
        assert_eq!(token.sp.as_deref(), Some("ae"));
        assert_eq!(
            token.expires_at().unwrap().timestamp(),
            1_705_305_600
        );
        assert!(token.refresh_token_expires_at().is_none());
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(TopAuthTokenCreate::new("  ").validate().is_err());
        assert!(TopAuthTokenCreate::new("0_abc").validate().is_ok());
    }
}
