//! Test fixtures for integration tests.
//!
//! `StubEndpoint` stands in for the Apps Script web app: every request is a
//! JSON POST naming a function, and replies are scripted per function.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use lantern_client::{
    domain::{LightType, Submission},
    ui::{ClientView, Notice, QueueRow},
};
use serde_json::Value;
use tokio::{net::TcpListener, task::JoinHandle};

/// Scripted reply for one call.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    /// Body sent as-is with 200
    Raw(String),
}

#[derive(Debug, Default)]
struct StubState {
    /// Replies per function; the last one repeats
    replies: HashMap<String, VecDeque<Reply>>,
    /// Received request envelopes, in order
    requests: Vec<Value>,
}

type SharedState = Arc<Mutex<StubState>>;

/// In-process RPC endpoint bound to an ephemeral port.
pub struct StubEndpoint {
    url: String,
    state: SharedState,
    handle: JoinHandle<()>,
}

impl StubEndpoint {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub endpoint");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let state = SharedState::default();
        let app = Router::new()
            .route("/exec", post(handle_rpc))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub endpoint failed");
        });

        Self {
            url: format!("http://{addr}/exec"),
            state,
            handle,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Queue a reply for `function`.
    pub fn reply(&self, function: &str, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state
            .replies
            .entry(function.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Replace whatever is queued for `function` with a single reply.
    pub fn set_reply(&self, function: &str, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state
            .replies
            .insert(function.to_string(), VecDeque::from([reply]));
    }

    /// Parameters of every call made to `function`.
    pub fn calls(&self, function: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .requests
            .iter()
            .filter(|request| request["function"] == function)
            .map(|request| request["parameters"].clone())
            .collect()
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_rpc(State(state): State<SharedState>, Json(request): Json<Value>) -> Response {
    let function = request["function"].as_str().unwrap_or_default().to_string();

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(request);
        match state.replies.get_mut(&function) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    match reply {
        Some(Reply::Json(body)) => Json(body).into_response(),
        Some(Reply::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Reply::Raw(body)) => (StatusCode::OK, body).into_response(),
        None => (StatusCode::NOT_FOUND, format!("unknown function {function}")).into_response(),
    }
}

/// What a `ClientView` was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Queue(Vec<QueueRow>),
    ApplicationForm,
    WaitingArea,
    Submission(Submission),
    LightType(LightType),
    Alert(Notice),
}

/// View that records instead of drawing.
#[derive(Debug, Default)]
pub struct CapturingView {
    shown: Mutex<Vec<Shown>>,
}

impl CapturingView {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn last_queue(&self) -> Option<Vec<QueueRow>> {
        self.shown().into_iter().rev().find_map(|shown| match shown {
            Shown::Queue(rows) => Some(rows),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<Notice> {
        self.shown()
            .into_iter()
            .filter_map(|shown| match shown {
                Shown::Alert(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn push(&self, shown: Shown) {
        self.shown.lock().unwrap().push(shown);
    }
}

impl ClientView for CapturingView {
    fn render_queue(&self, rows: &[QueueRow]) {
        self.push(Shown::Queue(rows.to_vec()));
    }

    fn show_application_form(&self) {
        self.push(Shown::ApplicationForm);
    }

    fn show_waiting_area(&self) {
        self.push(Shown::WaitingArea);
    }

    fn show_submission(&self, submission: &Submission) {
        self.push(Shown::Submission(submission.clone()));
    }

    fn show_light_type(&self, light_type: &LightType) {
        self.push(Shown::LightType(light_type.clone()));
    }

    fn alert(&self, notice: Notice) {
        self.push(Shown::Alert(notice));
    }
}
