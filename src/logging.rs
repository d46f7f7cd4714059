use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
                LogLevel::Warn => 2,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

/// Emits one JSON line for `event` if `level` clears `min_level`.
pub fn log_event(min_level: LogLevel, level: LogLevel, event: &str, fields: Value) {
    if let Some(line) = format_event(min_level, level, now_unix_millis(), event, fields) {
        write_line(level, &line);
    }
}

fn format_event(
    min_level: LogLevel,
    level: LogLevel,
    ts: u64,
    event: &str,
    fields: Value,
) -> Option<String> {
    if level < min_level {
        return None;
    }

    let mut payload = Map::new();
    payload.insert("ts".to_string(), Value::Number(Number::from(ts)));
    payload.insert("level".to_string(), Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), Value::String(event.to_string()));

    if let Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    Some(Value::Object(payload).to_string())
}

#[cfg(target_arch = "wasm32")]
fn now_unix_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: LogLevel, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        LogLevel::Warn => web_sys::console::warn_1(&line),
        LogLevel::Debug | LogLevel::Info => web_sys::console::log_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: LogLevel, line: &str) {
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_below_minimum_level_are_dropped() {
        let line = format_event(LogLevel::Info, LogLevel::Debug, 1, "noise", json!({}));
        assert!(line.is_none());
    }

    #[test]
    fn event_fields_are_merged_into_one_object() {
        let line = format_event(
            LogLevel::Info,
            LogLevel::Warn,
            1_700_000_000_000,
            "contact_delivery_failed",
            json!({ "status": 400 }),
        )
        .expect("warn clears info");

        let parsed: Value = serde_json::from_str(&line).expect("valid JSON line");
        assert_eq!(parsed["event"], "contact_delivery_failed");
        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["status"], 400);
        assert_eq!(parsed["ts"], 1_700_000_000_000u64);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
    }
}
