//! SSE transport: long-lived event stream plus companion message channel
//!
//! `GET /sse` opens one session and owns its outbound channel; companion
//! `POST /messages` requests are routed through the dispatch core and their
//! responses pushed onto that channel. Sessions live in a shared map keyed
//! by a session id carried in the companion request's query string.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Outbound channels of live event-stream sessions. Mutated only under the
/// lock; one writer task per session.
#[derive(Debug, Default)]
pub struct SseSessions {
    channels: Mutex<HashMap<Uuid, mpsc::Sender<String>>>,
}

impl SseSessions {
    fn register(&self, session_id: Uuid, sender: mpsc::Sender<String>) {
        self.channels
            .lock()
            .expect("session registry poisoned")
            .insert(session_id, sender);
    }

    fn remove(&self, session_id: &Uuid) {
        self.channels
            .lock()
            .expect("session registry poisoned")
            .remove(session_id);
    }

    fn sender(&self, session_id: &Uuid) -> Option<mpsc::Sender<String>> {
        self.channels
            .lock()
            .expect("session registry poisoned")
            .get(session_id)
            .cloned()
    }
}

/// Clears the session map entry when the event stream is dropped, whatever
/// the reason for the disconnect.
struct SessionGuard {
    sessions: Arc<SseSessions>,
    session_id: Uuid,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.session_id);
        info!(session_id = %self.session_id, "sse session closed");
    }
}

pub async fn sse_connect(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
    state.sse_sessions.register(session_id, sender);
    info!(session_id = %session_id, "sse session opened");

    let guard = SessionGuard {
        sessions: state.sse_sessions.clone(),
        session_id,
    };

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={session_id}"));
    let responses =
        ReceiverStream::new(receiver).map(|message| Event::default().event("message").data(message));

    let stream = stream::once(std::future::ready(endpoint))
        .chain(responses)
        .map(move |event| {
            // the guard lives exactly as long as the stream
            let _ = &guard;
            Ok(event)
        });

    Sse::new(stream)
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub session_id: Option<String>,
}

pub async fn sse_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
    body: Bytes,
) -> Response {
    let session_id = query
        .session_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok());
    let Some(sender) = session_id.and_then(|id| state.sse_sessions.sender(&id)) else {
        return AppError::NoActiveSession.into_response();
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Could not parse message" })),
            )
                .into_response()
        }
    };

    if let Some(response) = handle_json_rpc_value(&state, payload).await {
        if sender.send(response.to_string()).await.is_err() {
            // the stream closed between lookup and send; the session is gone
            if let Some(id) = session_id {
                state.sse_sessions.remove(&id);
            }
            return AppError::NoActiveSession.into_response();
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
