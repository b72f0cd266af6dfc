//! Event payload normalization.
//!
//! The platform returns events either wrapped in a list object
//! (`{"items": [...]}`) or as a bare list. Both become a flat list of
//! [`EventRecord`]s carrying only the fields a reader needs.

use crate::error::MalformedEventsError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Fields consulted, in order, when an event has no `timestamp`
const TIMESTAMP_FALLBACKS: [&str; 3] = ["lastTimestamp", "eventTime", "firstTimestamp"];

/// Object an event is about. Used for filtering, never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvolvedObject {
    /// Resource kind, e.g. `Deployment`
    pub kind: String,
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
}

/// Normalized event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// `Normal` or `Warning`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Machine-readable reason
    pub reason: String,
    /// Human-readable message
    pub message: String,
    /// Occurrence time as reported
    pub timestamp: String,
    /// Subject of the event
    #[serde(skip)]
    pub involved_object: InvolvedObject,
}

impl EventRecord {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let timestamp = match field(obj, "timestamp") {
            ts if !ts.is_empty() => ts,
            _ => TIMESTAMP_FALLBACKS
                .iter()
                .map(|key| field(obj, key))
                .find(|ts| !ts.is_empty())
                .unwrap_or_default(),
        };
        let involved_object = obj
            .get("involvedObject")
            .and_then(Value::as_object)
            .map(|inv| InvolvedObject {
                kind: field(inv, "kind"),
                name: field(inv, "name"),
                namespace: field(inv, "namespace"),
            })
            .unwrap_or_default();
        Self {
            event_type: field(obj, "type"),
            reason: field(obj, "reason"),
            message: field(obj, "message"),
            timestamp,
            involved_object,
        }
    }
}

/// Text of a field: strings as is, other values as JSON, absent or null
/// as empty
fn field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Outcome of one shape recognizer
enum Recognized {
    Events(Vec<EventRecord>),
    Malformed,
    NoMatch,
}

type Recognizer = fn(&Value) -> Recognized;

/// Tried in order; the first match wins
const RECOGNIZERS: [Recognizer; 2] = [wrapped_list, direct_list];

/// `{"items": [...]}`; `null` items mean no events
fn wrapped_list(raw: &Value) -> Recognized {
    match raw.as_object().and_then(|obj| obj.get("items")) {
        Some(Value::Null) => Recognized::Events(Vec::new()),
        Some(Value::Array(items)) => records(items),
        Some(_) => Recognized::Malformed,
        None => Recognized::NoMatch,
    }
}

/// `[...]`
fn direct_list(raw: &Value) -> Recognized {
    match raw {
        Value::Array(items) => records(items),
        _ => Recognized::NoMatch,
    }
}

fn records(items: &[Value]) -> Recognized {
    items
        .iter()
        .map(|item| match item {
            Value::Object(obj) => Some(EventRecord::from_object(obj)),
            Value::Null => Some(EventRecord::default()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map_or(Recognized::Malformed, Recognized::Events)
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "list containing non-object entries".to_string(),
        Value::Object(obj) if obj.is_empty() => "empty object".to_string(),
        Value::Object(obj) if obj.contains_key("items") => {
            "object whose items is not a list of objects".to_string()
        }
        Value::Object(obj) => format!(
            "object with keys [{}]",
            obj.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Normalize a raw event payload.
///
/// # Errors
///
/// Returns [`MalformedEventsError`] when the payload is neither a wrapped
/// nor a bare list of objects, including `{}` and `null`.
pub fn normalize_events(raw: &Value) -> Result<Vec<EventRecord>, MalformedEventsError> {
    for recognize in RECOGNIZERS {
        match recognize(raw) {
            Recognized::Events(events) => return Ok(events),
            Recognized::Malformed => break,
            Recognized::NoMatch => {}
        }
    }
    Err(MalformedEventsError {
        found: describe(raw),
    })
}

/// Normalize event payload text.
///
/// # Errors
///
/// Returns [`MalformedEventsError`] for text that is not JSON or has an
/// unrecognized shape.
pub fn normalize_events_str(text: &str) -> Result<Vec<EventRecord>, MalformedEventsError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| MalformedEventsError {
        found: format!("invalid JSON ({e})"),
    })?;
    normalize_events(&raw)
}

/// Restricts events to one involved object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Required kind, matched case-insensitively
    pub kind: Option<String>,
    /// Required name
    pub name: Option<String>,
}

impl EventFilter {
    /// Filter from optional arguments; empty strings mean "any"
    #[must_use]
    pub fn new(kind: Option<&str>, name: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            kind: non_empty(kind),
            name: non_empty(name),
        }
    }

    /// Whether any constraint is set
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind.is_some() || self.name.is_some()
    }

    /// Whether `event` passes
    #[must_use]
    pub fn matches(&self, event: &EventRecord) -> bool {
        let inv = &event.involved_object;
        self.kind
            .as_deref()
            .is_none_or(|kind| inv.kind.eq_ignore_ascii_case(kind))
            && self.name.as_deref().is_none_or(|name| inv.name == name)
    }

    /// Keep matching events, preserving order
    #[must_use]
    pub fn apply(&self, events: Vec<EventRecord>) -> Vec<EventRecord> {
        if !self.is_active() {
            return events;
        }
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(reason: &str, kind: &str, name: &str) -> Value {
        json!({
            "type": "Normal",
            "reason": reason,
            "message": format!("{reason} happened"),
            "lastTimestamp": "2026-01-01T00:00:00Z",
            "involvedObject": {"kind": kind, "name": name, "namespace": "default"},
            "metadata": {"uid": "abc"}
        })
    }

    #[test]
    fn test_wrapped_list() {
        let raw = json!({"items": [{"type": "Normal", "reason": "Synced", "message": "ok"}]});
        let events = normalize_events(&raw).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "Normal");
        assert_eq!(events[0].reason, "Synced");
        assert_eq!(events[0].timestamp, "");
    }

    #[test]
    fn test_direct_list() {
        let raw = json!([event("Pulled", "Pod", "web-1"), event("Started", "Pod", "web-1")]);
        let events = normalize_events(&raw).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].reason, "Started");
        assert_eq!(events[1].timestamp, "2026-01-01T00:00:00Z");
        assert_eq!(events[1].involved_object.kind, "Pod");
    }

    #[test]
    fn test_empty_wrapped() {
        assert!(normalize_events(&json!({"items": []})).unwrap().is_empty());
        assert!(normalize_events(&json!({"items": null})).unwrap().is_empty());
        assert!(normalize_events(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_malformed() {
        let err = normalize_events(&json!({})).unwrap_err();
        assert_eq!(err.found, "empty object");
        assert!(normalize_events(&Value::Null).is_err());
        assert!(normalize_events(&json!("events")).is_err());
        assert!(normalize_events(&json!({"items": "x"})).is_err());
        assert!(normalize_events(&json!([1, 2])).is_err());
        assert!(normalize_events(&json!({"kind": "EventList"})).is_err());
    }

    #[test]
    fn test_null_entries_are_empty_records() {
        let events = normalize_events(&json!([null, {"type": "Normal"}])).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], EventRecord::default());
        assert_eq!(events[1].event_type, "Normal");

        let wrapped = normalize_events(&json!({"items": [null]})).unwrap();
        assert_eq!(wrapped, vec![EventRecord::default()]);
    }

    #[test]
    fn test_projection_and_serialization() {
        let raw = json!([{"type": "Warning", "reason": "BackOff", "message": 42,
                          "timestamp": "t0", "eventTime": "t1", "count": 3}]);
        let events = normalize_events(&raw).unwrap();
        assert_eq!(events[0].message, "42");
        assert_eq!(events[0].timestamp, "t0");
        let value = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(
            value,
            json!({"type": "Warning", "reason": "BackOff", "message": "42", "timestamp": "t0"})
        );
    }

    #[test]
    fn test_timestamp_fallback_order() {
        let raw = json!([{"eventTime": "e", "firstTimestamp": "f"}, {"firstTimestamp": "f"}]);
        let events = normalize_events(&raw).unwrap();
        assert_eq!(events[0].timestamp, "e");
        assert_eq!(events[1].timestamp, "f");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_events_str(r#"{"items": []}"#).unwrap().len(), 0);
        let err = normalize_events_str("not json").unwrap_err();
        assert!(err.found.starts_with("invalid JSON"));
    }

    #[test]
    fn test_filter() {
        let raw = json!([
            event("A", "Pod", "web-1"),
            event("B", "Deployment", "web"),
            event("C", "Pod", "web-2"),
        ]);
        let events = normalize_events(&raw).unwrap();

        let inactive = EventFilter::new(Some(""), None);
        assert!(!inactive.is_active());
        assert_eq!(inactive.apply(events.clone()).len(), 3);

        let by_kind = EventFilter::new(Some("pod"), None);
        let reasons: Vec<_> = by_kind
            .apply(events.clone())
            .into_iter()
            .map(|e| e.reason)
            .collect();
        assert_eq!(reasons, vec!["A", "C"]);

        let by_both = EventFilter::new(Some("Pod"), Some("web-2"));
        assert_eq!(by_both.apply(events)[0].reason, "C");
    }
}
