//! The validator contract
//!
//! Every leaf and every combinator implements [`Validator`]. Descriptors are
//! immutable once built and are shared behind [`SharedValidator`]
//! (`Arc<dyn Validator>`), so one descriptor can serve any number of
//! concurrent calls; all per-call state lives in the [`Context`] and the
//! returned [`Outcome`].

use crate::combinators::error::ContractError;
use crate::combinators::{Pipe, Sum, Tuple};
use crate::foundation::context::Context;
use crate::foundation::error::ValidationError;
use crate::foundation::outcome::{Failure, Matched, Outcome};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A validator descriptor shared between compositions and callers.
pub type SharedValidator = Arc<dyn Validator>;

// ============================================================================
// VALIDATOR KIND
// ============================================================================

/// Explicit tag of what a validator is, used instead of runtime type
/// inspection (e.g. to flatten `A | (B | C)`).
#[derive(Debug, Clone, Copy)]
pub enum Kind<'a> {
    /// A leaf validator.
    Leaf,
    /// An alternation.
    Sum(&'a Sum),
    /// A sequence.
    Pipe(&'a Pipe),
    /// A product.
    Tuple(&'a Tuple),
}

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// The capability interface of every validator.
///
/// Implementors provide a name and [`match_value`](Self::match_value);
/// `failure`, `matched`, `unpack` and `call` are provided.
///
/// Leaf logic that may fail unexpectedly should be written as a
/// [`Refinement`](crate::validators::Refinement) and wrapped in a
/// [`Leaf`](crate::validators::Leaf), which converts returned errors into
/// failed outcomes at the validator boundary.
///
/// # Examples
///
/// ```rust
/// use refined::foundation::{Context, Outcome, Validator};
/// use refined::combinators::ContractError;
/// use serde_json::{Value, json};
/// use std::borrow::Cow;
///
/// #[derive(Debug)]
/// struct Positive;
///
/// impl Validator for Positive {
///     fn name(&self) -> Cow<'_, str> {
///         Cow::Borrowed("Positive")
///     }
///
///     fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
///         if value.as_f64().is_some_and(|n| n > 0.0) {
///             Ok(self.matched(value, value.clone(), ctx))
///         } else {
///             Ok(self.failure("not positive".into(), ctx))
///         }
///     }
/// }
///
/// assert!(Positive.call(&json!(3)).unwrap().is_valid());
/// assert!(Positive.call(&json!(-3)).unwrap().is_invalid());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Identity of this validator, used to tag its error records.
    fn name(&self) -> Cow<'_, str>;

    /// Evaluates `value`, reading and writing `ctx`.
    ///
    /// Validation failures come back as `Ok(Outcome::Failed(..))`; `Err` is
    /// reserved for misuse such as a Tuple arity mismatch.
    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError>;

    /// What kind of validator this is.
    fn kind(&self) -> Kind<'_> {
        Kind::Leaf
    }

    /// Designated output of a successful outcome.
    fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        outcome.unpack().cloned()
    }

    /// Appends `error` under this validator's identity to `ctx` and returns a
    /// failure carrying the current context snapshot.
    fn failure(&self, error: ValidationError, ctx: &mut Context) -> Outcome {
        Failure::report(&self.name(), error, ctx)
    }

    /// Builds a successful outcome carrying the current context snapshot.
    fn matched(&self, value: &Value, output: Value, ctx: &Context) -> Outcome {
        Outcome::Matched(Matched::new(
            self.name().into_owned(),
            value.clone(),
            output,
            ctx.clone(),
        ))
    }

    /// Matches `value` against a fresh root context.
    fn call(&self, value: &Value) -> Result<Outcome, ContractError> {
        let mut ctx = Context::new();
        self.match_value(value, &mut ctx)
    }
}

// ============================================================================
// VALIDATOR EXTENSION TRAIT
// ============================================================================

/// Fluent composition for every sized validator.
///
/// ```rust
/// use refined::prelude::*;
/// use serde_json::json;
///
/// let login = email().or(phone());
/// let outcome = login.call(&json!("admin@example.com")).unwrap();
/// assert!(outcome.is_valid());
/// ```
pub trait ValidatorExt: Validator + Sized + 'static {
    /// Alternation with `other`; nested sums are flattened.
    fn or<V: Validator + 'static>(self, other: V) -> Sum {
        Sum::pair(Arc::new(self), Arc::new(other))
    }

    /// Sequence: `other` validates this validator's output.
    fn and_then<V: Validator + 'static>(self, other: V) -> Pipe {
        Pipe::pair(Arc::new(self), Arc::new(other))
    }

    /// Moves the descriptor behind an `Arc`.
    fn shared(self) -> SharedValidator {
        Arc::new(self)
    }
}

impl<T: Validator + 'static> ValidatorExt for T {}
