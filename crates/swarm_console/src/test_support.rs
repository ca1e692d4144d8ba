use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use crate::client::{ConsoleTransport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Transport answering from per-path queues; unscripted paths fail with an http error.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<String, TransportError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn push(&self, path: &str, response: Result<String, TransportError>) {
        self.responses
            .lock()
            .expect("responses lock")
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_ok(&self, path: &str, body: impl Into<String>) {
        self.push(path, Ok(body.into()));
    }

    pub fn push_down(&self, path: &str) {
        self.push(
            path,
            Err(TransportError::Http {
                message: "connection refused".to_string(),
            }),
        );
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<String, TransportError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .expect("responses lock")
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(TransportError::Http {
                    message: format!("unscripted {method} {path}"),
                })
            })
    }
}

impl ConsoleTransport for ScriptedTransport {
    fn get(&self, path: &str) -> Result<String, TransportError> {
        self.answer("GET", path, None)
    }

    fn post(&self, path: &str, body: Option<&Value>) -> Result<String, TransportError> {
        self.answer("POST", path, body)
    }
}

pub(crate) fn game_state_json(status: &str) -> String {
    format!(
        r#"{{
            "system_status": "{status}",
            "daily_budget": {{"max": 10.0, "spent": 1.0, "unit": "USD"}},
            "party": [{{"id": "live-agent", "name": "Live", "class": "Warrior",
                        "stats": {{"hp": 80, "mana": 30, "success_rate": "90%"}},
                        "current_action": "Coding", "location": "repo-live"}}],
            "active_quests": [],
            "repositories": [{{"id": "repo-live", "name": "Swarm", "swarm": ["live-agent"]}}]
        }}"#
    )
}

pub(crate) fn graph_json() -> String {
    r#"{"elements": {
        "nodes": [
            {"data": {"id": "live-1", "label": "Live One", "type": "agent", "active": true}},
            {"data": {"id": "live-2", "label": "Live Two", "type": "store"}}
        ],
        "edges": [{"data": {"id": "e1", "source": "live-1", "target": "live-2"}}]
    }}"#
    .to_string()
}
