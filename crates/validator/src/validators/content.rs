//! String content validators
//!
//! Validators for checking string content and patterns. Non-string values
//! are checked through their JSON text, so `111` is treated as `"111"`.

use std::sync::LazyLock;

use crate::foundation::{BoxError, Context, ValidationError};
use crate::validators::leaf::{Leaf, Refinement, Verdict, text};
use serde_json::Value;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$").unwrap()
});

// ============================================================================
// EMAIL VALIDATOR
// ============================================================================

/// Validates email format and records the address under `email` in the
/// context.
#[derive(Debug, Clone)]
pub struct Email {
    pattern: regex::Regex,
}

impl Email {
    /// Creates the validator with the default pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: EMAIL_REGEX.clone(),
        }
    }

    /// Uses a custom pattern instead of the default one.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` does not compile.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: regex::Regex::new(pattern)?,
        })
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

impl Refinement for Email {
    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError> {
        let input = text(value);
        if !self.pattern.is_match(&input) {
            return Ok(Verdict::Reject(ValidationError::message("Not an email")));
        }
        ctx.insert("email", &*input);
        Ok(Verdict::Accept)
    }
}

/// Email validator with the default pattern.
#[must_use]
pub fn email() -> Leaf<Email> {
    Leaf::new(Email::new())
}

// ============================================================================
// ASCII VALIDATOR
// ============================================================================

/// Validates that a non-empty string is plain ASCII and records it under
/// `ascii_string` in the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Refinement for Ascii {
    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError> {
        let input = text(value);
        if input.is_empty() || !input.is_ascii() {
            return Ok(Verdict::Reject(ValidationError::message("Not ASCII")));
        }
        ctx.insert("ascii_string", &*input);
        Ok(Verdict::Accept)
    }
}

/// ASCII validator.
#[must_use]
pub fn ascii() -> Leaf<Ascii> {
    Leaf::new(Ascii)
}

// ============================================================================
// TESTS
// ============================================================================
