//! Prelude module for convenient imports.
//!
//! Provides a single `use refined::prelude::*;` import that brings in the
//! core traits, outcome types, built-in validators and combinators.
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let login = sum_of([email().shared(), phone().shared()]).unwrap();
//! let outcome = login.call(&json!("admin@example.com")).unwrap();
//! assert_eq!(outcome.validator(), "Email");
//! ```

// ============================================================================
// FOUNDATION: Core traits, outcomes, context
// ============================================================================

pub use crate::foundation::{
    BoxError, Context, ContextBuilder, ErrorRecord, Failure, FailureDetail, FailureShape, Kind,
    MatchStatus, Matched, Outcome, Refined, SharedValidator, StepKey, ValidationError,
    ValidationFailure, Validator, ValidatorExt, validate_value,
};

// ============================================================================
// VALIDATORS: All built-in validators
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::validators::*;

// ============================================================================
// COMBINATORS: Composition functions and types
// ============================================================================

pub use crate::combinators::{
    BoundContract, Contract, ContractError, INPUT_STEP, INVALID_ATTRIBUTES, NO_MATCHES,
    OUTPUT_STEP, Pipe, Sum, Tuple, contract_of, pipe_of, sum_of, tuple_of,
};
