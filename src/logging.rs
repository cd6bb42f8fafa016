//! Structured JSONL logging. One JSON object per line on stdout, with a
//! monotonic sequence number so events stay ordered across interleaved
//! modules. Every degrade path in the pipeline emits an event here, which is
//! what keeps the "never hard-fail" contract observable.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static MIN_LEVEL: OnceLock<Level> = OnceLock::new();

fn min_level() -> Level {
    *MIN_LEVEL.get_or_init(Level::from_env)
}

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

pub fn ts_now() -> String {
    Utc::now().to_rfc3339()
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

pub fn v_bool(b: bool) -> Value {
    Value::Bool(b)
}

pub fn obj(fields: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.to_string(), value.clone());
    }
    map
}

pub fn json_log_at(level: Level, module: &str, fields: Map<String, Value>) {
    if level < min_level() {
        return;
    }
    let mut record = Map::new();
    record.insert("ts".to_string(), Value::String(ts_now()));
    record.insert("seq".to_string(), Value::from(next_seq()));
    record.insert("level".to_string(), Value::String(level.as_str().to_string()));
    record.insert("module".to_string(), Value::String(module.to_string()));
    for (key, value) in fields {
        record.insert(key, value);
    }
    println!("{}", Value::Object(record));
}

pub fn json_log(module: &str, fields: Map<String, Value>) {
    json_log_at(Level::Info, module, fields);
}

pub fn json_warn(module: &str, fields: Map<String, Value>) {
    json_log_at(Level::Warn, module, fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_preserves_fields() {
        let map = obj(&[("a", v_str("x")), ("b", v_num(2.0)), ("c", v_bool(true))]);
        assert_eq!(map.len(), 3);
        assert_eq!(map["a"], Value::String("x".to_string()));
        assert_eq!(map["c"], Value::Bool(true));
    }

    #[test]
    fn test_v_num_non_finite_is_null() {
        assert_eq!(v_num(f64::NAN), Value::Null);
        assert_eq!(v_num(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_seq_monotonic() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }
}
