use serde_json::Value;
use thiserror::Error;

use crumbscope_types::{Breadcrumb, BreadcrumbLevel, EventSnapshot};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an event object or a breadcrumb array, found {0}")]
    Shape(&'static str),
}

/// Breadcrumbs and snapshot extracted from one event payload
#[derive(Clone, Debug, Default)]
pub struct ParsedEvent {
    pub breadcrumbs: Vec<Breadcrumb>,
    pub snapshot: EventSnapshot,
    /// Records that could not be read as breadcrumbs
    pub skipped: usize,
}

/// Parser for event payloads.
///
/// Understands the API event shape (`entries[].type == "breadcrumbs"`), the
/// ingest shape (`breadcrumbs.values` or a bare `breadcrumbs` array), and a
/// bare array of breadcrumbs.
pub struct EventParser;

impl EventParser {
    pub fn parse(json: &str) -> Result<ParsedEvent, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::parse_value(&value)
    }

    pub fn parse_value(value: &Value) -> Result<ParsedEvent, ParseError> {
        match value {
            Value::Array(items) => {
                let (breadcrumbs, skipped) = Self::read_crumbs(items);
                Ok(ParsedEvent {
                    breadcrumbs,
                    snapshot: EventSnapshot::default(),
                    skipped,
                })
            }
            Value::Object(_) => {
                let (breadcrumbs, skipped) = Self::find_crumb_values(value)
                    .map(|items| Self::read_crumbs(items))
                    .unwrap_or_default();
                Ok(ParsedEvent {
                    breadcrumbs,
                    snapshot: Self::snapshot(value),
                    skipped,
                })
            }
            Value::Null => Err(ParseError::Shape("null")),
            Value::Bool(_) => Err(ParseError::Shape("a boolean")),
            Value::Number(_) => Err(ParseError::Shape("a number")),
            Value::String(_) => Err(ParseError::Shape("a string")),
        }
    }

    fn find_crumb_values(event: &Value) -> Option<&Vec<Value>> {
        if let Some(entries) = event.get("entries").and_then(Value::as_array) {
            let entry = entries
                .iter()
                .find(|e| e.get("type").and_then(Value::as_str) == Some("breadcrumbs"));
            if let Some(values) = entry
                .and_then(|e| e.pointer("/data/values"))
                .and_then(Value::as_array)
            {
                return Some(values);
            }
        }

        match event.get("breadcrumbs")? {
            Value::Array(values) => Some(values),
            other => other.get("values").and_then(Value::as_array),
        }
    }

    fn read_crumbs(items: &[Value]) -> (Vec<Breadcrumb>, usize) {
        let mut crumbs = Vec::with_capacity(items.len());
        let mut skipped = 0;

        for (i, item) in items.iter().enumerate() {
            match serde_json::from_value::<Breadcrumb>(item.clone()) {
                Ok(crumb) => crumbs.push(crumb),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping unreadable breadcrumb");
                    skipped += 1;
                }
            }
        }

        (crumbs, skipped)
    }

    fn snapshot(event: &Value) -> EventSnapshot {
        let text = |key: &str| event.get(key).and_then(Value::as_str).map(str::to_string);

        let level = text("level")
            .or_else(|| Self::tag(event, "level"))
            .map(|l| BreadcrumbLevel::from_str(&l))
            .unwrap_or_default();

        let date_created = text("dateCreated").or_else(|| match event.get("timestamp") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => n.as_f64().and_then(|secs| {
                chrono::DateTime::<chrono::Utc>::from_timestamp_millis((secs * 1000.0).round() as i64)
                    .map(|ts| ts.to_rfc3339())
            }),
            _ => None,
        });

        let exception = Self::exception_summary(event);
        let message = exception.clone().or_else(|| {
            text("message")
                .filter(|m| !m.is_empty())
                .or_else(|| {
                    event
                        .pointer("/logentry/formatted")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
        });

        EventSnapshot {
            event_id: text("eventID").or_else(|| text("event_id")).or_else(|| text("id")),
            title: text("title"),
            message,
            level,
            date_created,
            is_exception: exception.is_some(),
        }
    }

    fn tag(event: &Value, key: &str) -> Option<String> {
        event
            .get("tags")?
            .as_array()?
            .iter()
            .find(|t| t.get("key").and_then(Value::as_str) == Some(key))
            .and_then(|t| t.get("value").and_then(Value::as_str))
            .map(str::to_string)
    }

    /// `Type: value` of the last exception in the chain
    fn exception_summary(event: &Value) -> Option<String> {
        let values = event
            .get("entries")
            .and_then(Value::as_array)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|e| e.get("type").and_then(Value::as_str) == Some("exception"))
            })
            .and_then(|e| e.pointer("/data/values"))
            .or_else(|| event.pointer("/exception/values"))
            .and_then(Value::as_array)?;

        let last = values.last()?;
        let ty = last.get("type").and_then(Value::as_str);
        let value = last.get("value").and_then(Value::as_str);

        match (ty, value) {
            (Some(t), Some(v)) => Some(format!("{}: {}", t, v)),
            (Some(t), None) => Some(t.to_string()),
            (None, Some(v)) => Some(v.to_string()),
            (None, None) => None,
        }
    }
}
