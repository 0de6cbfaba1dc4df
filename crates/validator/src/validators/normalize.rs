//! Object key normalization
//!
//! External payloads rarely agree on key spelling (`"Mail-To"`,
//! `"mail to"`, `"mail_to"`). [`normalize_keys`] rewrites every object key
//! to `snake_case`-ish form so later steps can rely on one spelling.

use crate::foundation::{BoxError, Context};
use crate::validators::leaf::{Leaf, Refinement, Verdict};
use serde_json::{Map, Value};

/// Normalizes one key: trimmed, lowercased, `-` and spaces replaced by `_`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| if matches!(c, '-' | ' ') { '_' } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns a copy of `value` with every object key normalized, recursively
/// through nested objects and arrays. On a key collision the later entry
/// wins.
///
/// # Examples
///
/// ```rust
/// use refined::validators::normalize_keys;
/// use serde_json::json;
///
/// let raw = json!({"Mail-To": "101000", "Error Details": [{"Error-Code": 1}]});
/// assert_eq!(
///     normalize_keys(&raw),
///     json!({"mail_to": "101000", "error_details": [{"error_code": 1}]})
/// );
/// ```
#[must_use]
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (normalize_key(key), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(normalize_keys).collect()),
        other => other.clone(),
    }
}

/// Pipe step that accepts any value and outputs it with normalized keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeKeys;

impl Refinement for NormalizeKeys {
    fn refine(&self, value: &Value, _ctx: &mut Context) -> Result<Verdict, BoxError> {
        Ok(Verdict::AcceptAs(normalize_keys(value)))
    }
}

/// Key-normalizing step.
#[must_use]
pub fn normalize_keys_step() -> Leaf<NormalizeKeys> {
    Leaf::new(NormalizeKeys)
}
