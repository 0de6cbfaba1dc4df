//! Core validation types and traits
//!
//! This module contains the fundamental building blocks of the validation system:
//!
//! - **Traits**: [`Validator`], [`ValidatorExt`]
//! - **Results**: [`Outcome`], [`Matched`], [`Failure`]
//! - **Diagnostics**: [`Context`], [`ErrorRecord`], [`ValidationError`]
//! - **Instances**: [`Refined`]
//!
//! # Architecture
//!
//! ## 1. Values are JSON
//!
//! Every validator accepts a [`serde_json::Value`]. Leaves narrow it (a
//! string that looks like an email, a string that parses as JSON) and may
//! hand a transformed output to the next validator.
//!
//! ## 2. Failures are data
//!
//! A failed match is an [`Outcome::Failed`] returned through `Ok`. The `Err`
//! side of `match_value` is reserved for misuse, see
//! [`ContractError`].
//!
//! ## 3. One context per call tree
//!
//! A root call creates a [`Context`]; every nested match reads and writes it
//! through `&mut Context`. Alternations evaluate members in child contexts
//! and merge the winner back, so a rejected member cannot leave entries
//! behind, while its error records are still reported.
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let outcome = email().call(&json!("admin@example.com")).unwrap();
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.context().get_str("email"), Some("admin@example.com"));
//! ```

pub mod context;
pub mod error;
pub mod outcome;
pub mod refined;
pub mod traits;

pub use crate::combinators::error::ContractError;
pub use context::{Context, ContextBuilder, StepKey};
pub use error::{BoxError, ErrorKind, ErrorRecord, ValidationError};
pub use outcome::{Failure, FailureDetail, FailureShape, Matched, Outcome};
pub use refined::{MatchStatus, Refined};
pub use traits::{Kind, SharedValidator, Validator, ValidatorExt};

// ============================================================================
// UTILITIES
// ============================================================================

/// Matches `value` against `validator` with a fresh context and returns the
/// designated output.
///
/// Use [`Validator::call`] directly when the context snapshot is needed.
///
/// # Examples
///
/// ```rust
/// use refined::foundation::validate_value;
/// use refined::prelude::*;
/// use serde_json::json;
///
/// let output = validate_value(&phone(), &json!("8 (999) 123-33-12")).unwrap();
/// assert_eq!(output, json!("89991233312"));
/// ```
pub fn validate_value(
    validator: &dyn Validator,
    value: &serde_json::Value,
) -> Result<serde_json::Value, ValidationFailure> {
    let outcome = validator.call(value)?;
    match outcome {
        Outcome::Matched(m) => Ok(m.output().clone()),
        Outcome::Failed(f) => Err(ValidationFailure::Invalid(Box::new(f))),
    }
}

/// Error side of [`validate_value`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    /// The value did not satisfy the validator.
    #[error("{} is invalid: {}", .0.validator(), .0.messages().join(", "))]
    Invalid(Box<Failure>),
    /// The validator was misused.
    #[error(transparent)]
    Contract(#[from] ContractError),
}
