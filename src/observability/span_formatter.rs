//! Compact JSON rendering of finished spans.
//!
//! Each span becomes one flat JSON object, written as a single line:
//!
//! ```json
//! {"service":"campus-discovery","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"handle_event","start_unix_nano":1700000000000000000,"duration_us":412,
//!  "attributes":{"event_type":"route_changed"},"status":"unset"}
//! ```

use std::time::{Duration, SystemTime};

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Serialize)]
pub struct SpanRecord {
    pub service: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start_unix_nano: u128,
    pub duration_us: u128,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, JsonValue>,
    pub status: String,
}

impl SpanRecord {
    pub fn from_span(service: &str, span: &SpanData) -> Self {
        let parent_span_id = (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));
        let duration = span.end_time.duration_since(span.start_time).unwrap_or(Duration::ZERO);

        Self {
            service: service.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id,
            name: span.name.to_string(),
            start_unix_nano: unix_nanos(span.start_time),
            duration_us: duration.as_micros(),
            attributes: attributes(&span.attributes),
            status: status_label(&span.status),
        }
    }
}

fn unix_nanos(time: SystemTime) -> u128 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
}

/// Flattens OpenTelemetry attributes into a JSON object keyed by attribute name.
pub fn attributes(values: &[KeyValue]) -> Map<String, JsonValue> {
    values
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

/// Converts one attribute value to its natural JSON form.
pub fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::from(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => JsonValue::from(*f),
        Value::String(s) => JsonValue::from(s.as_str()),
        _ => JsonValue::from(value.to_string()),
    }
}

fn status_label(status: &Status) -> String {
    match status {
        Status::Unset => "unset".to_string(),
        Status::Ok => "ok".to_string(),
        Status::Error { description } => format!("error: {description}"),
    }
}
