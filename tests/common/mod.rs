#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use ttl_shortener::config::ShortenerSettings;
use ttl_shortener::domain::entities::QuotaDecision;
use ttl_shortener::domain::repositories::{KeyValueStore, StoreError, StoreResult};
use ttl_shortener::infrastructure::store::MemoryStore;
use ttl_shortener::routes::router;
use ttl_shortener::state::AppState;

pub const DOMAIN: &str = "short.ly";
pub const CLIENT_IP: &str = "127.0.0.1";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

pub struct TestStores {
    pub links: Arc<MemoryStore>,
    pub quotas: Arc<MemoryStore>,
}

pub fn create_test_state() -> (AppState, TestStores) {
    create_test_state_with(ShortenerSettings::new(DOMAIN), false)
}

pub fn create_test_state_with(
    settings: ShortenerSettings,
    behind_proxy: bool,
) -> (AppState, TestStores) {
    let links = Arc::new(MemoryStore::new());
    let quotas = Arc::new(MemoryStore::new());

    let state = AppState::new(links.clone(), quotas.clone(), &settings, behind_proxy);

    (state, TestStores { links, quotas })
}

/// Full router with every request arriving from `addr`.
pub fn test_server_from(state: AppState, addr: &str) -> TestServer {
    let addr: SocketAddr = addr.parse().unwrap();
    let app: Router = router(state).layer(MockConnectInfoLayer { addr });

    TestServer::new(app).unwrap()
}

pub fn test_server(state: AppState) -> TestServer {
    test_server_from(state, CLIENT_ADDR)
}

/// Code part of a `short` response field.
pub fn code_of(short: &serde_json::Value) -> String {
    short
        .as_str()
        .unwrap()
        .strip_prefix(&format!("{}/", DOMAIN))
        .unwrap()
        .to_string()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// A store whose backend is unreachable.
pub struct UnreachableStore;

fn refused() -> StoreError {
    StoreError::Connection("connection refused".to_string())
}

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(refused())
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<bool> {
        Err(refused())
    }

    async fn incr(&self, _key: &str) -> StoreResult<i64> {
        Err(refused())
    }

    async fn ttl(&self, _key: &str) -> StoreResult<Option<Duration>> {
        Err(refused())
    }

    async fn consume_quota(
        &self,
        _key: &str,
        _quota: i64,
        _window: Duration,
    ) -> StoreResult<QuotaDecision> {
        Err(refused())
    }

    async fn refund_quota(&self, _key: &str) -> StoreResult<()> {
        Err(refused())
    }

    async fn ping(&self) -> bool {
        false
    }
}
