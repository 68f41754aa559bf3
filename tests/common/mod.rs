//! Shared test harness: an in-memory transport with canned responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use hub_client::error::{HubApiError, Result};
use hub_client::{HubClient, Transport};

/// One request observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

enum Canned {
    Json(Value),
    Empty,
    Error(HubApiError),
}

#[derive(Default)]
struct State {
    responses: VecDeque<Canned>,
    calls: Vec<RecordedCall>,
}

/// Transport that replays a FIFO queue of canned responses and records every
/// request. Clones share the same queue and call log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, value: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Canned::Json(value));
    }

    pub fn push_empty(&self) {
        self.state.lock().unwrap().responses.push_back(Canned::Empty);
    }

    pub fn push_error(&self, error: HubApiError) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Canned::Error(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body: body.cloned(),
        });
        match state.responses.pop_front() {
            Some(Canned::Json(value)) => Ok(Some(value)),
            Some(Canned::Empty) | None => Ok(None),
            Some(Canned::Error(error)) => Err(error),
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>> {
        self.record("GET", path, query, None)
    }

    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Option<Value>> {
        self.record("POST", path, query, body)
    }

    fn post_file(
        &self,
        path: &str,
        query: &[(String, String)],
        _field: &str,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<Option<Value>> {
        let marker = serde_json::json!({ "file": filename });
        self.record("POST_FILE", path, query, Some(&marker))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.record("PATCH", path, &[], Some(body))
    }

    fn delete(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>> {
        self.record("DELETE", path, query, None)
    }
}

/// Client backed by a fresh mock transport; the returned handle can seed
/// responses and inspect the requests the client made.
pub fn client() -> (HubClient, MockTransport) {
    let transport = MockTransport::new();
    let client = HubClient::from_transport(Box::new(transport.clone()));
    (client, transport)
}
