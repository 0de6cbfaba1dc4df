//! Error reasons and per-validator error records
//!
//! A failed match never carries a bare string. Every reason is a structured
//! [`ValidationError`] (code, message, optional field path, parameters and
//! nested reasons), and reasons are grouped under the identity of the
//! validator that produced them in an [`ErrorRecord`].
//!
//! All string fields use `Cow<'static, str>` so the common case of static
//! codes and tags does not allocate.

use serde::Serialize;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Boxed error returned by leaf logic and inter-step callbacks.
///
/// These are caught at the validator boundary and never escape a match.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// What kind of reason a [`ValidationError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Free-form human readable message.
    #[default]
    Message,
    /// Symbolic tag such as `no_matches`; code and message are the tag.
    Tag,
    /// An error raised inside leaf logic and caught at the boundary.
    Exception,
    /// Keyed reason carrying parameters (e.g. `undef_weight` on `weight`).
    Structured,
}

/// A single reason why a value did not satisfy a validator.
///
/// # Examples
///
/// ```rust
/// use refined::foundation::ValidationError;
///
/// let error = ValidationError::structured("undef_weight")
///     .with_field("weight")
///     .with_param("unit", "g");
///
/// assert_eq!(error.code, "undef_weight");
/// assert_eq!(error.param("unit"), Some("g"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Reason discriminator.
    pub kind: ErrorKind,

    /// Error code for programmatic handling.
    ///
    /// Examples: "message", "no_matches", "exception", "undef_weight"
    pub code: Cow<'static, str>,

    /// Human-readable message.
    pub message: Cow<'static, str>,

    /// Optional field path the reason refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Cow<'static, str>>,

    /// Ordered key-value parameters (typically 0-3).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,

    /// Nested reasons, e.g. the source chain of a caught exception.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ValidationError>,
}

impl ValidationError {
    /// Creates a reason with an explicit code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: ErrorKind::Message,
            code: code.into(),
            message: message.into(),
            field: None,
            params: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Creates a plain message reason (code `message`).
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("message", message)
    }

    /// Creates a symbolic tag reason; the tag doubles as code and message.
    pub fn tag(tag: impl Into<Cow<'static, str>>) -> Self {
        let tag = tag.into();
        Self {
            kind: ErrorKind::Tag,
            ..Self::new(tag.clone(), tag)
        }
    }

    /// Creates a keyed reason meant to carry parameters.
    pub fn structured(key: impl Into<Cow<'static, str>>) -> Self {
        let key = key.into();
        Self {
            kind: ErrorKind::Structured,
            ..Self::new(key.clone(), key)
        }
    }

    /// Wraps a caught error. Its `source()` chain becomes nested reasons.
    pub fn exception(error: &(dyn StdError + 'static)) -> Self {
        let mut nested = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            nested.push(Self {
                kind: ErrorKind::Exception,
                ..Self::new("exception", cause.to_string())
            });
            source = cause.source();
        }

        Self {
            kind: ErrorKind::Exception,
            nested,
            ..Self::new("exception", error.to_string())
        }
    }

    /// Sets the field path for this reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to the reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Returns true if this reason wraps a caught exception.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.kind == ErrorKind::Exception
    }

    /// Returns true if this reason is the symbolic `tag`.
    #[must_use]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.kind == ErrorKind::Tag && self.code == tag
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        for (i, error) in self.nested.iter().enumerate() {
            write!(f, "\n    {}. {}", i + 1, error)?;
        }

        Ok(())
    }
}

impl StdError for ValidationError {}

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        Self::message(message)
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

// ============================================================================
// ERROR RECORD
// ============================================================================

/// Reasons reported by one validator, keyed by its identity.
///
/// Records are only produced through [`Validator::failure`] and the
/// combinators' aggregate failures.
///
/// [`Validator::failure`]: crate::foundation::Validator::failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Identity of the validator that reported the reasons.
    pub validator: String,
    /// Reasons in the order they were reported.
    pub errors: Vec<ValidationError>,
}

impl ErrorRecord {
    /// Creates a record holding a single reason.
    pub fn new(validator: impl Into<String>, error: ValidationError) -> Self {
        Self {
            validator: validator.into(),
            errors: vec![error],
        }
    }

    /// Iterates over the messages of all reasons in this record.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_ref())
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.validator)?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_tag_uses_tag_as_code_and_message() {
        let error = ValidationError::tag("no_matches");
        assert_eq!(error.kind, ErrorKind::Tag);
        assert_eq!(error.code, "no_matches");
        assert_eq!(error.message, "no_matches");
        assert!(error.is_tag("no_matches"));
    }

    #[test]
    fn test_exception_keeps_source_chain() {
        let outer = Outer(std::io::Error::other("disk on fire"));
        let error = ValidationError::exception(&outer);

        assert!(error.is_exception());
        assert_eq!(error.message, "outer failure");
        assert_eq!(error.nested.len(), 1);
        assert_eq!(error.nested[0].message, "disk on fire");
    }

    #[test]
    fn test_message_from_str() {
        let error: ValidationError = "Not an email".into();
        assert_eq!(error.code, "message");
        assert_eq!(error.kind, ErrorKind::Message);
    }

    #[test]
    fn test_display_with_field_and_params() {
        let error = ValidationError::structured("undef_weight")
            .with_field("weight")
            .with_param("min", "1");
        assert_eq!(
            error.to_string(),
            "[weight] undef_weight: undef_weight (params: [min=1])"
        );
    }

    #[test]
    fn test_record_messages() {
        let record = ErrorRecord::new("Email", ValidationError::message("Not an email"));
        assert_eq!(record.messages().collect::<Vec<_>>(), vec!["Not an email"]);
    }
}
