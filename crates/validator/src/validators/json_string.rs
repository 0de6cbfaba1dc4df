//! JSON string validator.
//!
//! Parses a string as JSON. The parsed document is the validator's output
//! and is also recorded under `parsed` in the context, so a following Pipe
//! step receives structured data instead of text.

use crate::foundation::{BoxError, Context, ValidationError};
use crate::validators::leaf::{Leaf, Refinement, Verdict};
use serde_json::Value;

// ============================================================================
// JSON VALIDATOR
// ============================================================================

/// Default maximum nesting depth for JSON validation (DoS protection)
const DEFAULT_MAX_DEPTH: usize = 128;

/// Validates and parses JSON strings.
///
/// Syntax errors are raised by the parser and reported by the wrapping
/// [`Leaf`] as an exception reason.
///
/// # Security
///
/// By default, the validator rejects documents nested deeper than 128
/// levels. Use [`max_depth`](Self::max_depth) to adjust this limit.
///
/// # Examples
///
/// ```
/// use refined::foundation::Validator;
/// use refined::validators::{Json, Leaf};
/// use serde_json::json;
///
/// let validator = Leaf::new(Json::new());
///
/// let outcome = validator.call(&json!(r#"{"name": "John"}"#)).unwrap();
/// assert_eq!(outcome.unpack().unwrap(), &json!({"name": "John"}));
/// assert!(validator.call(&json!("123")).unwrap().is_valid());
///
/// // Invalid
/// assert!(validator.call(&json!(r#"{"name": "John"#)).unwrap().is_invalid());
/// assert!(validator.call(&json!("undefined")).unwrap().is_invalid());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Json {
    allow_primitives: bool,
    max_depth: usize,
}

impl Json {
    /// Creates a new JSON validator with default settings.
    ///
    /// Default settings:
    /// - `allow_primitives`: true (allows strings, numbers, booleans, null)
    /// - `max_depth`: 128
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_primitives: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Require JSON to be an object or array (no primitives).
    #[must_use = "builder methods must be chained or built"]
    pub fn objects_only(mut self) -> Self {
        self.allow_primitives = false;
        self
    }

    /// Set maximum nesting depth.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for Json {
    fn default() -> Self {
        Self::new()
    }
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

impl Refinement for Json {
    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError> {
        let Value::String(input) = value else {
            return Ok(Verdict::Reject(ValidationError::new(
                "json_not_a_string",
                "JSON input must be a string",
            )));
        };

        let parsed: Value = serde_json::from_str(input)?;

        if !self.allow_primitives && !(parsed.is_object() || parsed.is_array()) {
            return Ok(Verdict::Reject(ValidationError::new(
                "primitives_not_allowed",
                "JSON must be an object or array",
            )));
        }

        if depth(&parsed) > self.max_depth {
            return Ok(Verdict::Reject(
                ValidationError::new(
                    "json_too_deep",
                    format!("JSON nesting exceeds maximum depth of {}", self.max_depth),
                )
                .with_param("max_depth", self.max_depth.to_string()),
            ));
        }

        ctx.insert("parsed", parsed.clone());
        Ok(Verdict::AcceptAs(parsed))
    }
}

/// JSON validator with default settings.
#[must_use]
pub fn json() -> Leaf<Json> {
    Leaf::new(Json::new())
}

// ============================================================================
// TESTS
// ============================================================================
