//! Test server harness.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use doppel::{DuplicateDetector, HttpCorpusFetcher, ModelResolver, ProviderRegistry};
use doppel_server::gateway::auth::TokenService;
use doppel_server::gateway::rate_limit::RateLimits;
use doppel_server::gateway::{HandlerState, create_router_with_state};

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
const JWT_SECRET: &str = "harness-secret";

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub threshold: f64,
    /// Served as JSON by the companion corpus server at `/{name}`.
    pub corpora: BTreeMap<String, Value>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            corpora: BTreeMap::new(),
        }
    }
}

impl TestServerConfig {
    pub fn with_corpus(mut self, name: &str, body: Value) -> Self {
        self.corpora.insert(name.to_string(), body);
        self
    }
}

/// A running gateway plus the static corpus server it fetches from.
pub struct TestServer {
    pub addr: SocketAddr,
    pub corpus_addr: SocketAddr,
    _handles: Vec<JoinHandle<()>>,
    shutdown_txs: Vec<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn corpus_url(&self, name: &str) -> String {
        format!("http://{}/{}", self.corpus_addr, name)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for tx in self.shutdown_txs.drain(..) {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

fn corpus_router(corpora: BTreeMap<String, Value>) -> Router {
    let mut router = Router::new().route(
        "/broken.json",
        get(|| async { (StatusCode::OK, "{ this is not json") }),
    );
    for (name, body) in corpora {
        router = router.route(
            &format!("/{}", name),
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
    }
    router
}

async fn serve(
    router: Router,
    handles: &mut Vec<JoinHandle<()>>,
    shutdown_txs: &mut Vec<oneshot::Sender<()>>,
) -> Result<SocketAddr, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();

    handles.push(tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    }));
    shutdown_txs.push(tx);

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(addr)
}

/// Spawns the gateway with stub providers and a real HTTP corpus fetcher.
///
/// The stub embedder maps identical text to identical unit vectors, so
/// records whose normalized text equals the query score `1.0` and unrelated
/// records score near zero.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let mut handles = Vec::new();
    let mut shutdown_txs = Vec::new();

    let corpus_addr = serve(corpus_router(config.corpora), &mut handles, &mut shutdown_txs).await?;

    let models: BTreeMap<String, String> = [
        ("GEMINI_EMBEDDING_MODEL", "stub-embedding"),
        ("OPENAI_EMBEDDING_MODEL", "stub-embedding"),
        ("GEMINI_REASONING_MODEL", "stub-reasoning"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let fetcher = HttpCorpusFetcher::new(Duration::from_secs(5))
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let detector = DuplicateDetector::new(
        ModelResolver::new(models),
        Arc::new(ProviderRegistry::stub()),
        Arc::new(fetcher),
        config.threshold,
    );

    let tokens = TokenService::new(JWT_SECRET, Duration::from_secs(3600))
        .with_admin(ADMIN_USER, ADMIN_PASSWORD);
    let state = HandlerState::new(Arc::new(detector), Arc::new(tokens))
        .with_limits(RateLimits::default());

    let addr = serve(create_router_with_state(state), &mut handles, &mut shutdown_txs).await?;

    Ok(TestServer {
        addr,
        corpus_addr,
        _handles: handles,
        shutdown_txs,
    })
}
