//! Shared test fixtures: an in-memory provider keyed by request path.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use stat_xplore::transport::{Transport, TransportResponse};
use stat_xplore::{Result, StatXploreClient, StatXploreError};

enum Canned {
    Response(TransportResponse),
    Fail(String),
}

/// Serves canned responses and records every request it sees.
/// Paths with no canned response answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Canned>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, response: TransportResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Canned::Response(response));
        self
    }

    pub fn json(self, path: &str, body: Value) -> Self {
        self.respond(path, TransportResponse::new(200, body.to_string()))
    }

    /// Requests to `path` fail without a response.
    pub fn fail(self, path: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Canned::Fail(message.to_string()));
        self
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.gets.lock().unwrap().iter().filter(|p| *p == path).count()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    fn lookup(&self, path: &str) -> Result<TransportResponse> {
        match self.routes.lock().unwrap().get(path) {
            Some(Canned::Response(r)) => Ok(r.clone()),
            Some(Canned::Fail(msg)) => Err(StatXploreError::Transport(anyhow::anyhow!(
                "{}: {}",
                path,
                msg
            ))),
            None => Ok(TransportResponse::new(404, format!("no route for {}", path))),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<TransportResponse> {
        self.gets.lock().unwrap().push(path.to_string());
        self.lookup(path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse> {
        self.posts
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        self.lookup(path)
    }
}

pub fn client_over(mock: MockTransport) -> (StatXploreClient, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    let client = StatXploreClient::new(mock.clone());
    (client, mock)
}

pub fn folder(id: &str, label: &str, children: Option<Vec<Value>>) -> Value {
    let mut node = json!({
        "id": id,
        "label": label,
        "location": format!("https://stat-xplore.test/schema/{}", id),
        "type": "FOLDER",
    });
    if let Some(children) = children {
        node["children"] = Value::Array(children);
    }
    node
}

pub fn database(id: &str, label: &str) -> Value {
    json!({
        "id": id,
        "label": label,
        "location": format!("https://stat-xplore.test/schema/{}", id),
        "type": "DATABASE",
    })
}

/// A minimal provider table response: one field, one measure, one cube.
pub fn table_response(database: &str, measure: &str) -> Value {
    json!({
        "query": {"database": database},
        "database": {"id": database, "label": "Universal Credit"},
        "measures": [{"uri": measure, "label": "People on UC"}],
        "fields": [{
            "uri": "str:field:UC_Monthly:F_UC_DATE:DATE_NAME",
            "label": "Month",
            "items": [
                {"type": "RecodeItem", "labels": ["January 2024"], "uris": ["str:value:UC_Monthly:F_UC_DATE:DATE_NAME:C_UC_DATE:202401"]},
                {"type": "RecodeItem", "labels": ["February 2024"], "uris": ["str:value:UC_Monthly:F_UC_DATE:DATE_NAME:C_UC_DATE:202402"]}
            ]
        }],
        "cubes": {
            measure: {"values": [1200.0, 1250.0], "precision": 0}
        }
    })
}
