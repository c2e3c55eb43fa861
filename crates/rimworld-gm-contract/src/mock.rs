//! In-process stand-in for the game-side HTTP API
//!
//! Reproduces the documented status codes and error envelopes with no
//! simulation behind them. Error branches fire only on explicit signals:
//! - `GET /health?error=not_ready` -> 503 MOD_NOT_READY
//! - `GET /state?error=no_colony` -> 409 NO_COLONY_LOADED
//! - `POST /event` with `event_type` = [`UNRECOGNIZED_EVENT_TYPE`] -> 400 INVALID_EVENT
//! - a route listed in [`MockConfig`] faults -> that route's error branch for every request

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rimworld_gm_core::{
    ApiErrorCode, ApiErrorResponse, Colony, EventAccepted, GmError, HealthReport, HealthStatus,
    MessageAccepted, Resources, Result, StatusSnapshot, Threats,
};
use serde_json::Value;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// `event_type` the mock treats as unknown to the game
pub const UNRECOGNIZED_EVENT_TYPE: &str = "invalid_event";

/// How long `stop` waits for in-flight connections before aborting
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Mock routes that can be forced onto their error branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockRoute {
    Health,
    State,
    Event,
    Message,
}

impl MockRoute {
    pub const ALL: [MockRoute; 4] = [
        MockRoute::Health,
        MockRoute::State,
        MockRoute::Event,
        MockRoute::Message,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MockRoute::Health => "health",
            MockRoute::State => "state",
            MockRoute::Event => "event",
            MockRoute::Message => "message",
        }
    }
}

impl FromStr for MockRoute {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MockRoute::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown route '{}', expected one of: health, state, event, message",
                    s
                )
            })
    }
}

/// Fixed behaviour of a mock instance, set before it starts
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    faults: HashSet<MockRoute>,
}

impl MockConfig {
    pub fn with_fault(mut self, route: MockRoute) -> Self {
        self.faults.insert(route);
        self
    }

    pub fn is_faulted(&self, route: MockRoute) -> bool {
        self.faults.contains(&route)
    }
}

/// Query pairs, decoded without rejecting repeated or unknown keys
type QueryPairs = Query<Vec<(String, String)>>;

/// True when `error` appears exactly once with the given value
fn signals(pairs: &[(String, String)], value: &str) -> bool {
    let mut errors = pairs.iter().filter(|(key, _)| key == "error");
    matches!((errors.next(), errors.next()), (Some((_, v)), None) if v == value)
}

type SharedConfig = Arc<MockConfig>;

fn router(config: SharedConfig) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/state", get(state).fallback(not_found))
        .route("/event", post(event).fallback(not_found))
        .route("/message", post(message).fallback(not_found))
        .fallback(not_found)
        .with_state(config)
}

fn api_error(code: ApiErrorCode, message: &str) -> Response {
    let envelope = ApiErrorResponse::new(code, message);
    let status =
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}

/// Parse a request body; empty reads as `{}`
fn parse_body(bytes: &[u8]) -> std::result::Result<Value, Response> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(bytes)
        .map_err(|_| api_error(ApiErrorCode::InvalidRequest, "body is not valid JSON"))
}

/// Non-empty string field, or `None`
fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

async fn health(State(config): State<SharedConfig>, Query(query): QueryPairs) -> Response {
    if config.is_faulted(MockRoute::Health) || signals(&query, "not_ready") {
        return api_error(ApiErrorCode::ModNotReady, "mock not ready");
    }

    Json(HealthReport {
        status: HealthStatus::Ok,
        game_running: true,
        colony_loaded: true,
        mod_version: "0.1.0".into(),
        queue_depth: 0,
        uptime_seconds: 12,
    })
    .into_response()
}

async fn state(State(config): State<SharedConfig>, Query(query): QueryPairs) -> Response {
    if config.is_faulted(MockRoute::State) || signals(&query, "no_colony") {
        return api_error(ApiErrorCode::NoColonyLoaded, "no colony");
    }

    Json(StatusSnapshot {
        colony: Colony {
            name: "Mock".into(),
            wealth: 1.0,
            day: 1,
            season: "Spring".into(),
            quadrum: "Aprimay".into(),
        },
        colonists: Vec::new(),
        resources: Resources {
            silver: 0,
            food: 0,
            medicine: 0,
            components: 0,
        },
        threats: Threats {
            active_raids: 0,
            nearby_enemies: false,
            toxic_fallout: false,
        },
    })
    .into_response()
}

async fn event(State(config): State<SharedConfig>, body: Bytes) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    let Some(event_type) = text_field(&body, "event_type") else {
        return api_error(ApiErrorCode::InvalidRequest, "event_type required");
    };
    if config.is_faulted(MockRoute::Event) || event_type == UNRECOGNIZED_EVENT_TYPE {
        return api_error(ApiErrorCode::InvalidEvent, "invalid");
    }

    debug!("Mock accepted event {}", event_type);
    Json(EventAccepted {
        success: true,
        message: "ok".into(),
        event_id: "evt_mock".into(),
    })
    .into_response()
}

async fn message(State(config): State<SharedConfig>, body: Bytes) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    if config.is_faulted(MockRoute::Message) || text_field(&body, "text").is_none() {
        return api_error(ApiErrorCode::InvalidRequest, "text required");
    }

    Json(MessageAccepted { success: true }).into_response()
}

async fn not_found() -> Response {
    api_error(ApiErrorCode::NotFound, "mock route not found")
}

/// A running mock bound to an ephemeral local port.
///
/// Shutdown is signalled by `stop` or, failing that, on drop.
pub struct MockRemoteServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl MockRemoteServer {
    /// Bind `127.0.0.1:0` and start serving on a background task
    pub async fn start(config: MockConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| GmError::ServerError(format!("Failed to bind mock server: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| GmError::ServerError(format!("Failed to read mock address: {}", e)))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::new(config));
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("Mock server listening on {}", addr);
        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Stop serving. Safe to call more than once.
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        let Some(mut task) = self.task.take() else {
            return;
        };

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
            Ok(Ok(Ok(()))) => info!("Mock server on {} stopped", self.addr),
            Ok(Ok(Err(e))) => warn!("Mock server exited with error: {}", e),
            Ok(Err(e)) => warn!("Mock server task failed: {}", e),
            Err(_) => {
                warn!(
                    "Mock server did not stop within {:?}, aborting",
                    SHUTDOWN_GRACE
                );
                task.abort();
            }
        }
    }
}

impl Drop for MockRemoteServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
