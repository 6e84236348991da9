//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use top_client::{
    AppCredentials, Result, TokenAuthenticator, TopClient, TopError, Transport, TransportRequest,
    TransportResponse,
};

pub const TEST_APP_KEY: &str = "12345678";
pub const TEST_APP_SECRET: &str = "helloworld";
pub const TEST_TOKEN: &str = "6100e23657fb0b2d0c78568e55a3031134be9a3a5d4b3a2320d3e3a1f40b6b4d";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ===== MockTransport =====

enum MockReply {
    Body { status: u16, body: Vec<u8> },
    NetworkError(String),
}

struct MockState {
    reply: MockReply,
    requests: RwLock<Vec<TransportRequest>>,
    calls: AtomicUsize,
}

/// 返回固定响应并记录每次请求的 Transport
///
/// 克隆共享同一份记录，交给客户端后仍可在测试中检查。
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    fn with_reply(reply: MockReply) -> Self {
        Self {
            state: Arc::new(MockState {
                reply,
                requests: RwLock::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn respond(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::with_reply(MockReply::Body {
            status,
            body: body.into(),
        })
    }

    /// HTTP 200 + `body`
    pub fn json(body: &str) -> Self {
        Self::respond(200, body)
    }

    pub fn network_error(detail: &str) -> Self {
        Self::with_reply(MockReply::NetworkError(detail.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<TransportRequest> {
        self.state.requests.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<TransportRequest> {
        self.state.requests.read().await.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state.requests.write().await.push(request);

        match &self.state.reply {
            MockReply::Body { status, body } => Ok(TransportResponse::new(*status, body.clone())),
            MockReply::NetworkError(detail) => Err(TopError::Network {
                detail: detail.clone(),
            }),
        }
    }
}

// ===== Fixtures =====

pub fn test_credentials() -> AppCredentials {
    AppCredentials::new(TEST_APP_KEY, TEST_APP_SECRET)
}

/// 使用 mock transport 的客户端（无 Authenticator）
pub fn mock_client(transport: &MockTransport) -> TopClient {
    TopClient::builder(test_credentials())
        .transport(transport.clone())
        .build()
        .expect("client with injected transport always builds")
}

/// 使用 mock transport 和固定 token 的客户端
pub fn mock_authenticated_client(transport: &MockTransport) -> TopClient {
    TopClient::builder(test_credentials())
        .transport(transport.clone())
        .authenticator(TokenAuthenticator::new(TEST_TOKEN))
        .build()
        .expect("client with injected transport always builds")
}

/// 真实网关测试上下文
pub struct LiveContext {
    pub client: TopClient,
    pub session: String,
}

impl LiveContext {
    /// 从 `TOP_APP_KEY` / `TOP_APP_SECRET` / `TOP_SESSION` 创建
    pub fn from_env() -> Option<Self> {
        let app_key = env::var("TOP_APP_KEY").ok()?;
        let app_secret = env::var("TOP_APP_SECRET").ok()?;
        let session = env::var("TOP_SESSION").ok()?;

        let client = TopClient::builder(AppCredentials::new(app_key, app_secret))
            .authenticator(TokenAuthenticator::new(session.clone()))
            .max_retries(2)
            .build()
            .ok()?;

        Some(Self { client, session })
    }
}
