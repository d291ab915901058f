// Shared test helpers
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use soilgraph::node_source::{NodeSource, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Packet on `2024-{month}-{day}` at noon UTC carrying `fields`.
pub fn packet(month: u32, day: u32, fields: Value) -> Value {
    let mut p = fields;
    p["timestamp"] = json!(format!("2024-{:02}-{:02}T12:00:00Z", month, day));
    p
}

/// Node in the store's shape: `{ "Packets": { "p0": .., "p1": .. } }`.
pub fn node(packets: Vec<Value>) -> Value {
    let map: serde_json::Map<String, Value> = packets
        .into_iter()
        .enumerate()
        .map(|(i, p)| (format!("p{}", i), p))
        .collect();
    json!({ "Packets": map })
}

pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// In-memory node source keyed by user id. Unknown users get `null`, like the store.
#[derive(Default)]
pub struct StaticSource {
    users: HashMap<String, Value>,
    fail_with_status: Option<u16>,
    pub requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn with_user(mut self, user: &str, nodes: Value) -> Self {
        self.users.insert(user.to_string(), nodes);
        self
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }
}

#[async_trait]
impl NodeSource for StaticSource {
    async fn fetch_nodes(&self, user: &str) -> Result<Value, SourceError> {
        self.requests.lock().unwrap().push(user.to_string());
        if let Some(status) = self.fail_with_status {
            return Err(SourceError::Status(status));
        }
        Ok(self.users.get(user).cloned().unwrap_or(Value::Null))
    }
}
