//! Loosely-typed venue records.
//!
//! Records arrive as arbitrary JSON. Accessors never fail: a missing,
//! null, empty or mistyped field reads as `None` and the caller picks a
//! default.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record as received from the venue's query API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn fields(&self) -> Fields<'_> {
        Fields(&self.0)
    }

    /// Fields of the sub-object under `key` when present, otherwise the
    /// record's own fields. Some sources wrap the payload one level deep.
    pub fn unwrap_nested(&self, key: &str) -> Fields<'_> {
        match self.0.get(key) {
            Some(inner @ Value::Object(_)) => Fields(inner),
            _ => Fields(&self.0),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Read-only view over a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(&'a Value);

impl<'a> Fields<'a> {
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// String or number field as text. Empty strings count as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First present field among `keys`, in order.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Truthiness of a field: `true`, a non-zero number or a non-empty string.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Instant from epoch milliseconds (number or numeric string) or an
    /// RFC 3339 string.
    pub fn instant(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            Value::Number(n) => from_epoch_millis(n.as_f64()?),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(ms) = s.parse::<f64>() {
                    return from_epoch_millis(ms);
                }
                DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
            }
            _ => None,
        }
    }

    /// Canonical bytes of the viewed object (keys sorted), used for content IDs.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }
}

fn from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms.round() as i64).single()
}
