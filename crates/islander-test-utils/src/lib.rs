//! Shared test utilities for islander integration tests.
//!
//! Provides in-process stand-ins for the two external services: a planner
//! backend (`POST /api/plan`) and a Nominatim-style geocoder
//! (`GET /search`). Each fake binds an ephemeral port on 127.0.0.1, answers
//! with whatever the test's handler returns, and records every request.
//!
//! The server task is aborted when the [`FakeService`] is dropped.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Canned answer for one request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    /// `200 OK` with a JSON body.
    pub fn json(value: Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// `200 OK` with a raw (possibly malformed) body.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// An error status with an empty JSON object as body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the response back for `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as the fake saw it.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    /// The planner prompt, or the geocoder `q` parameter.
    pub key: String,
    /// Query-string parameters.
    pub params: HashMap<String, String>,
}

type Handler = dyn Fn(&str) -> Reply + Send + Sync;

struct Shared {
    handler: Box<Handler>,
    log: Mutex<Vec<Recorded>>,
}

/// A running fake service.
pub struct FakeService {
    addr: SocketAddr,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl FakeService {
    /// `http://127.0.0.1:<port>`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the geocoder search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url())
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.log.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.shared.log.lock().unwrap().len()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start a fake planner. `handler` maps the received prompt to a reply.
pub async fn spawn_planner(handler: impl Fn(&str) -> Reply + Send + Sync + 'static) -> FakeService {
    let router = Router::new().route("/api/plan", post(plan_handler));
    spawn(router, Box::new(handler)).await
}

/// Start a fake planner that always answers `{"text": text}`.
pub async fn spawn_planner_replying(text: &str) -> FakeService {
    let text = text.to_string();
    spawn_planner(move |_| Reply::json(serde_json::json!({ "text": text }))).await
}

/// Start a fake geocoder. `handler` maps the received `q` to a reply.
pub async fn spawn_geocoder(handler: impl Fn(&str) -> Reply + Send + Sync + 'static) -> FakeService {
    let router = Router::new().route("/search", get(search_handler));
    spawn(router, Box::new(handler)).await
}

/// A Nominatim-shaped body with `n` results named `<prefix> <i>`.
pub fn nominatim_results(prefix: &str, n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "place_id": i,
                "lat": format!("{:.4}", 11.0 + i as f64 * 0.1),
                "lon": format!("{:.4}", 92.0 + i as f64 * 0.1),
                "display_name": format!("{prefix} {i}, South Andaman, Andaman and Nicobar Islands, India"),
            })
        })
        .collect();
    Value::Array(items)
}

async fn spawn(router: Router<Arc<Shared>>, handler: Box<Handler>) -> FakeService {
    let shared = Arc::new(Shared {
        handler,
        log: Mutex::new(Vec::new()),
    });
    let app = router.with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake service");
    let addr = listener.local_addr().expect("fake service has no address");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("fake service crashed");
    });

    FakeService { addr, shared, task }
}

async fn plan_handler(State(shared): State<Arc<Shared>>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body).to_string();
    let prompt = serde_json::from_str::<Value>(&raw)
        .ok()
        .and_then(|v| v.get("prompt").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(raw);
    answer(&shared, prompt, HashMap::new()).await
}

async fn search_handler(
    State(shared): State<Arc<Shared>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    answer(&shared, q, params).await
}

async fn answer(shared: &Shared, key: String, params: HashMap<String, String>) -> Response {
    let reply = (shared.handler)(&key);
    shared.log.lock().unwrap().push(Recorded { key, params });
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [("content-type", "application/json")],
        reply.body,
    )
        .into_response()
}
