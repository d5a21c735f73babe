//! Push transport - HTTP with a server-sent event stream per session
//!
//! A client opens `GET /sse` to receive a session: the first event on the
//! stream is `endpoint`, carrying the URL to POST calls to. Each call posted
//! to `POST /call?session=<id>` is dispatched in its own task and the
//! response envelope is pushed onto that session's stream as a `result`
//! event, correlated by the request id. `GET /tools` serves the catalog.
//!
//! A client that disconnects mid-call does not abort the in-flight action;
//! the result is simply discarded when the stream is gone.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::{RwLock, mpsc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::dispatch::Dispatcher;
use crate::core::envelope::{CallRequest, CallResponse};

/// Buffered results per session before backpressure kicks in.
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Shared state of the push transport: the dispatcher and the open sessions.
pub struct PushState {
    dispatcher: Arc<Dispatcher>,
    sessions: RwLock<HashMap<String, mpsc::Sender<CallResponse>>>,
}

impl PushState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new session and return its id and result receiver. The
    /// session unregisters itself once the receiving stream is dropped.
    pub async fn open_session(self: &Arc<Self>) -> (String, mpsc::Receiver<CallResponse>) {
        let session = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        self.sessions
            .write()
            .await
            .insert(session.clone(), sender.clone());

        let state = Arc::clone(self);
        let id = session.clone();
        tokio::spawn(async move {
            sender.closed().await;
            state.sessions.write().await.remove(&id);
            tracing::debug!(session = %id, "session closed");
        });

        tracing::debug!(session = %session, "session opened");
        (session, receiver)
    }

    /// Dispatch a call for a session in its own task. Returns false when the
    /// session is unknown; the call is not dispatched in that case.
    pub async fn submit(&self, session: &str, request: CallRequest) -> bool {
        let sender = self.sessions.read().await.get(session).cloned();
        let Some(sender) = sender else {
            return false;
        };

        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let response = dispatcher.dispatch(request).await;
            if sender.send(response).await.is_err() {
                tracing::debug!("session stream closed before result delivery");
            }
        });
        true
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn result_event(response: CallResponse) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&response).unwrap_or_else(|err| {
        format!(r#"{{"id":null,"ok":false,"result":null,"error":"failed to encode response: {err}"}}"#)
    });
    Ok(Event::default().event("result").data(data))
}

async fn open_stream(
    State(state): State<Arc<PushState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session, receiver) = state.open_session().await;

    let endpoint: Result<Event, Infallible> = Ok(Event::default()
        .event("endpoint")
        .data(format!("/call?session={session}")));

    let results = futures::stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|response| (response, receiver))
    })
    .map(result_event);

    let stream = futures::stream::once(async move { endpoint }).chain(results);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session: String,
}

async fn submit_call(
    State(state): State<Arc<PushState>>,
    Query(query): Query<SessionQuery>,
    Json(request): Json<CallRequest>,
) -> (StatusCode, Json<Value>) {
    let id = request.id.clone();

    if state.submit(&query.session, request).await {
        (StatusCode::ACCEPTED, Json(json!({"status": "accepted", "id": id})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "unknown session", "session": query.session})),
        )
    }
}

async fn list_tools(State(state): State<Arc<PushState>>) -> Json<Value> {
    Json(state.dispatcher.catalog_payload())
}

/// Build the push transport router.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    let state = Arc::new(PushState::new(dispatcher));
    Router::new()
        .route("/sse", get(open_stream))
        .route("/call", post(submit_call))
        .route("/tools", get(list_tools))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the push transport until the process exits. A bind failure is
/// fatal.
pub async fn serve(dispatcher: Arc<Dispatcher>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(dispatcher);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "push transport listening");
    axum::serve(listener, app).await?;
    Ok(())
}
