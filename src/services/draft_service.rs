use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::models::{
    CanvasSize, DraftError, DraftRecord, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH,
    DEFAULT_TITLE,
};

/// Prefix for server generated draft identifiers
const DRAFT_ID_PREFIX: &str = "d_";

/// Generate a fresh identifier: `d_` followed by 32 lowercase hex digits.
pub fn generate_draft_id() -> String {
    format!("{}{}", DRAFT_ID_PREFIX, Uuid::new_v4().simple())
}

/// Current server time in epoch milliseconds (UTC)
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a raw request body into a JSON object.
pub fn parse_draft_payload(body: &[u8]) -> Result<Map<String, Value>, DraftError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(DraftError::Validation("Invalid JSON".to_string())),
    }
}

/// Turn an inbound draft document into the canonical stored record.
///
/// `now` is used for `updatedAt` when the payload does not carry an integer
/// timestamp. A missing or empty `id` yields a freshly generated one. Only an
/// uncoercible canvas dimension is rejected.
pub fn normalize_draft(payload: &Map<String, Value>, now: i64) -> Result<DraftRecord, DraftError> {
    let id = resolve_id(payload.get("id")).unwrap_or_else(generate_draft_id);

    let title = match payload.get("title") {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::String(DEFAULT_TITLE.to_string()),
    };

    let updated_at = match payload.get("updatedAt") {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.clone(),
        _ => Number::from(now),
    };

    let template = payload.get("template").cloned().unwrap_or(Value::Null);

    let empty = Map::new();
    let canvas = match payload.get("canvasSize") {
        Some(Value::Object(map)) => map,
        _ => &empty,
    };
    let canvas_size = CanvasSize {
        w: coerce_dimension(canvas.get("w"), DEFAULT_CANVAS_WIDTH, "canvasSize.w")?,
        h: coerce_dimension(canvas.get("h"), DEFAULT_CANVAS_HEIGHT, "canvasSize.h")?,
    };

    let data = match payload.get("data") {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::Object(Map::new()),
    };

    Ok(DraftRecord {
        id,
        title,
        updated_at,
        template,
        canvas_size,
        data,
    })
}

/// Strings are used as given; any other truthy value is keyed by its JSON text.
fn resolve_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(v) if is_truthy(v) => Some(v.to_string()),
        _ => None,
    }
}

/// Falsy values are null, false, zero, and empty strings, arrays or objects.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Integer conversion for a canvas dimension; falsy input takes `default`.
fn coerce_dimension(value: Option<&Value>, default: i64, field: &str) -> Result<i64, DraftError> {
    let invalid = || DraftError::Validation(format!("Invalid {}", field));
    let value = match value {
        Some(v) if is_truthy(v) => v,
        _ => return Ok(default),
    };

    match value {
        Value::Bool(_) => Ok(1),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
