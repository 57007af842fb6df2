use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One structured log entry, keyed by field name in arrival order.
///
/// The record carries no schema: every reserved key (`level`, `time`, `msg`,
/// `req`, ...) may be missing or hold an unexpected type, and the typed
/// accessors below return `None` in that case instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build the record used for a line that is not a JSON object.
    ///
    /// The raw text becomes both `msg` and `message`, the level is info and
    /// the time is `now_ms`.
    pub fn from_text(line: &str, now_ms: i64) -> Self {
        let mut fields = Map::new();
        fields.insert("level".to_string(), Value::from(30));
        fields.insert("time".to_string(), Value::from(now_ms));
        fields.insert("tags".to_string(), Value::from(vec!["info"]));
        fields.insert("msg".to_string(), Value::from(line));
        fields.insert("message".to_string(), Value::from(line));
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Like [`get`](Self::get), but treats an explicit `null` as absent.
    pub fn get_present(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Integral severity code. `30` and `30.0` both count; anything else
    /// (strings, fractions, missing) is `None`.
    pub fn level(&self) -> Option<i64> {
        let value = self.fields.get("level")?;
        if let Some(code) = value.as_i64() {
            return Some(code);
        }
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    }

    pub fn time(&self) -> Option<&Value> {
        self.get_present("time")
    }

    pub fn pid(&self) -> Option<i64> {
        self.fields.get("pid").and_then(Value::as_i64)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.fields.get("hostname").and_then(Value::as_str)
    }

    pub fn req(&self) -> Option<&Value> {
        self.get_present("req")
    }

    pub fn res(&self) -> Option<&Value> {
        self.get_present("res")
    }

    pub fn response_time(&self) -> Option<&Value> {
        self.get_present("responseTime")
    }

    pub fn tags(&self) -> Option<&Value> {
        self.fields.get("tags")
    }

    /// Resolve the display message: `key`, then `msg`, then `message`,
    /// skipping entries that are missing or `null`.
    pub fn message(&self, key: &str) -> Option<&Value> {
        self.get_present(key)
            .or_else(|| self.get_present("msg"))
            .or_else(|| self.get_present("message"))
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

/// Turn one input line into a record. Never fails.
///
/// A line holding a JSON object is passed through untouched. Anything else
/// (free text, stack traces, truncated JSON, or JSON that is not an object)
/// becomes an info-level record whose message is the raw line.
pub fn parse(line: &str) -> LogRecord {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(fields)) => LogRecord::from_map(fields),
        _ => LogRecord::from_text(line, Utc::now().timestamp_millis()),
    }
}
