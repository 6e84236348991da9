//! Client configuration
//!
//! `ClientConfig` deserializes with defaults for every field, so a host
//! application can embed it in its own configuration file and only set
//! what it needs.

use serde::{Deserialize, Serialize};

use crate::sign::SignMethod;
use crate::types::DispatchMode;

/// 默认网关地址
pub const DEFAULT_SERVICE_URL: &str = "https://api.taobao.com/router/rest";
/// 协议版本
pub const API_VERSION: &str = "2.0";
/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tunable settings of a [`TopClient`](crate::TopClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway endpoint.
    pub service_url: String,
    /// Signing generation.
    pub sign_method: SignMethod,
    /// Parameter placement and HTTP method.
    pub dispatch_mode: DispatchMode,
    /// Optional `partner_id` system parameter.
    pub partner_id: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Transport-level retries for network errors and timeouts.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            sign_method: SignMethod::default(),
            dispatch_mode: DispatchMode::default(),
            partner_id: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}
