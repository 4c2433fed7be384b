//! JSON normalization path.
//!
//! The model is asked for a bare JSON array of objects, but the keys come
//! back in whatever spelling it felt like ("mapsLink", "Maps Link",
//! "maps_link", Turkish names). Keys are matched case-insensitively against
//! per-column synonym lists and values are coerced to strings; anything
//! missing or null becomes the `N/A` sentinel.

use crate::record::{Business, Field, NOT_AVAILABLE};
use localfind_core::{AppError, AppResult};
use serde_json::Value;

/// Find the outermost `[...]` slice, so arrays embedded in prose still
/// parse. Returns `None` when no bracket pair exists.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse a JSON array slice into business records.
///
/// Array elements that are not objects are skipped with a warning; an
/// element with no recognizable keys still yields an all-sentinel record,
/// preserving the model's record count.
pub fn parse_json_records(slice: &str) -> AppResult<Vec<Business>> {
    let value: Value = serde_json::from_str(slice)
        .map_err(|e| AppError::Malformed(format!("Invalid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(AppError::Malformed(
            "Reply was valid JSON but not a list of businesses".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Value::Object(map) = item else {
            tracing::warn!("Skipping non-object array element at index {}", index);
            continue;
        };

        let mut record = Business::default();
        for (key, value) in map {
            let Some(field) = Field::from_json_key(key) else {
                tracing::debug!("Ignoring unrecognized key '{}'", key);
                continue;
            };
            record.set(field, coerce_value(value));
        }
        records.push(record);
    }

    Ok(records)
}

/// Coerce a JSON value to a cell string. Nulls, empty strings, and nested
/// structures all collapse to the sentinel.
fn coerce_value(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => NOT_AVAILABLE.to_string(),
    }
}
