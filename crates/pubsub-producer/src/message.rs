//! Message payload construction.
//!
//! Messages are plain JSON objects. Generated messages follow the
//! `{event_id, event_type, timestamp, data}` shape; user supplied ones pass
//! through untouched apart from `event_id` and `timestamp`, which are filled in
//! only when absent.

use crate::error::PublishError;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;
use uuid::Uuid;

/// Event type used when none is given.
pub const DEFAULT_EVENT_TYPE: &str = "test";

/// Name this tool identifies itself with in payloads and attributes.
pub const PUBLISHER_NAME: &str = "test-publisher";

/// A single JSON message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Message(Map<String, Value>);

impl Message {
    /// Build a demonstration message with a fresh id and the current time.
    pub fn generated(event_type: &str) -> Self {
        let mut body = Map::new();
        body.insert("event_id".to_string(), Value::String(new_event_id()));
        body.insert(
            "event_type".to_string(),
            Value::String(event_type.to_string()),
        );
        body.insert("timestamp".to_string(), Value::String(now_rfc3339()));
        body.insert(
            "data".to_string(),
            json!({
                "message": "Hello from publisher!",
                "source": PUBLISHER_NAME,
            }),
        );
        Self(body)
    }

    /// Parse one JSON object given on the command line.
    pub fn parse_inline(text: &str) -> Result<Self, PublishError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| PublishError::parse("--message", e))?;
        Self::from_value(value, "--message")
    }

    /// Wrap a decoded JSON value, filling in `event_id` and `timestamp`.
    ///
    /// `origin` names where the value came from and is only used in errors.
    pub fn from_value(value: Value, origin: &str) -> Result<Self, PublishError> {
        match value {
            Value::Object(map) => {
                let mut message = Self(map);
                message.fill_defaults();
                Ok(message)
            }
            other => Err(PublishError::parse(
                origin,
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
        }
    }

    /// Insert `event_id` and `timestamp` if the body does not carry them.
    pub fn fill_defaults(&mut self) {
        self.0
            .entry("event_id")
            .or_insert_with(|| Value::String(new_event_id()));
        self.0
            .entry("timestamp")
            .or_insert_with(|| Value::String(now_rfc3339()));
    }

    pub fn event_id(&self) -> Option<&str> {
        self.0.get("event_id").and_then(Value::as_str)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.0.get("event_type").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize the body to UTF-8 JSON, keeping key order and number text.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PublishError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn stamp_sequence(&mut self, sequence: usize, total: usize) {
        let data = self
            .0
            .entry("data")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(data) = data {
            data.insert("sequence".to_string(), json!(sequence));
            data.insert("total".to_string(), json!(total));
        }
    }
}

/// Lazily generate `count` messages numbered `1..=count`.
///
/// Each message is built, and timestamped, only when the iterator reaches it.
pub fn build_batch(
    event_type: &str,
    count: usize,
) -> impl ExactSizeIterator<Item = Message> + '_ {
    (0..count).map(move |i| {
        let mut message = Message::generated(event_type);
        message.stamp_sequence(i + 1, count);
        message
    })
}

/// Load messages from a JSON file holding either one object or an array of them.
pub fn load_from_file(path: &Path) -> Result<Vec<Message>, PublishError> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| PublishError::parse(&origin, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| PublishError::parse(&origin, e))?;

    let values = match value {
        Value::Array(items) => items,
        single => vec![single],
    };

    let messages = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| Message::from_value(value, &format!("{origin}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Loaded {} message(s) from {origin}", messages.len());
    Ok(messages)
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
