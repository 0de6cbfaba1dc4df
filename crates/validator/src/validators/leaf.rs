//! Leaf validators
//!
//! Leaf logic is written as a [`Refinement`]: a check that returns a
//! [`Verdict`] or an error. [`Leaf`] turns any refinement into a
//! [`Validator`], and it is the boundary where errors raised by the check
//! become failed outcomes instead of escaping the match.
//!
//! # Examples
//!
//! ```rust
//! use refined::foundation::{BoxError, Context, Validator};
//! use refined::validators::{Leaf, Refinement, Verdict};
//! use serde_json::{Value, json};
//!
//! #[derive(Debug)]
//! struct Weight;
//!
//! impl Refinement for Weight {
//!     fn refine(&self, value: &Value, _ctx: &mut Context) -> Result<Verdict, BoxError> {
//!         let grams: f64 = value.as_str().ok_or("weight must be a string")?.parse()?;
//!         Ok(Verdict::AcceptAs(json!(grams)))
//!     }
//! }
//!
//! let weight = Leaf::new(Weight);
//! assert_eq!(weight.call(&json!("1.5")).unwrap().unpack().unwrap(), &json!(1.5));
//!
//! // The parse error is caught and reported as a failure.
//! let outcome = weight.call(&json!("heavy")).unwrap();
//! assert!(outcome.errors()[0].errors[0].is_exception());
//! ```

use crate::combinators::ContractError;
use crate::foundation::{BoxError, Context, Outcome, ValidationError, Validator};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// VERDICT
// ============================================================================

/// Result of a single leaf check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The value is valid and is its own output.
    Accept,
    /// The value is valid; the output is the given (transformed) value.
    AcceptAs(Value),
    /// The value is invalid for the given reason.
    Reject(ValidationError),
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Accept
        } else {
            Self::Reject(ValidationError::tag("invalid"))
        }
    }
}

// ============================================================================
// REFINEMENT
// ============================================================================

/// The check behind a leaf validator.
pub trait Refinement: Send + Sync + fmt::Debug {
    /// Identity of the leaf; defaults to the type's own name.
    fn name(&self) -> Cow<'_, str> {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        Cow::Borrowed(path.rsplit("::").next().unwrap_or(path))
    }

    /// Checks `value`. Returning `Err` is allowed: the wrapping [`Leaf`]
    /// reports it as an exception reason.
    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError>;
}

// ============================================================================
// LEAF
// ============================================================================

/// Adapter turning a [`Refinement`] into a [`Validator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Leaf<R> {
    refinement: R,
}

impl<R: Refinement> Leaf<R> {
    /// Wraps `refinement`.
    pub fn new(refinement: R) -> Self {
        Self { refinement }
    }

    /// The wrapped check.
    pub fn refinement(&self) -> &R {
        &self.refinement
    }
}

impl<R: Refinement> Validator for Leaf<R> {
    fn name(&self) -> Cow<'_, str> {
        self.refinement.name()
    }

    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
        match self.refinement.refine(value, ctx) {
            Ok(Verdict::Accept) => Ok(self.matched(value, value.clone(), ctx)),
            Ok(Verdict::AcceptAs(output)) => Ok(self.matched(value, output, ctx)),
            Ok(Verdict::Reject(reason)) => Ok(self.failure(reason, ctx)),
            Err(error) => {
                tracing::debug!(validator = %self.name(), %error, "leaf raised an error");
                Ok(self.failure(ValidationError::exception(&*error), ctx))
            }
        }
    }
}

/// String view of a value: strings as they are, anything else as JSON text.
pub(crate) fn text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

// ============================================================================
// CLOSURE REFINEMENT
// ============================================================================

/// Refinement backed by a closure; see [`from_fn`].
pub struct FnRefinement<F, V> {
    name: Cow<'static, str>,
    check: F,
    _verdict: PhantomData<fn() -> V>,
}

impl<F, V> fmt::Debug for FnRefinement<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRefinement")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F, V> Refinement for FnRefinement<F, V>
where
    F: Fn(&Value, &mut Context) -> Result<V, BoxError> + Send + Sync,
    V: Into<Verdict>,
{
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError> {
        (self.check)(value, ctx).map(Into::into)
    }
}

/// Creates a named leaf from a closure returning a `bool` or a [`Verdict`].
///
/// # Examples
///
/// ```rust
/// use refined::prelude::*;
/// use serde_json::json;
///
/// let even = from_fn("Even", |value, _| Ok(value.as_i64().is_some_and(|n| n % 2 == 0)));
/// assert!(even.call(&json!(4)).unwrap().is_valid());
/// assert!(even.call(&json!(3)).unwrap().is_invalid());
/// ```
pub fn from_fn<F, V>(name: impl Into<Cow<'static, str>>, check: F) -> Leaf<FnRefinement<F, V>>
where
    F: Fn(&Value, &mut Context) -> Result<V, BoxError> + Send + Sync,
    V: Into<Verdict>,
{
    Leaf::new(FnRefinement {
        name: name.into(),
        check,
        _verdict: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Exploding;

    impl Refinement for Exploding {
        fn refine(&self, _value: &Value, _ctx: &mut Context) -> Result<Verdict, BoxError> {
            Err("boom".into())
        }
    }

    #[derive(Debug)]
    struct Tagged<T>(PhantomData<T>);

    impl<T: Send + Sync + fmt::Debug> Refinement for Tagged<T> {
        fn refine(&self, _value: &Value, _ctx: &mut Context) -> Result<Verdict, BoxError> {
            Ok(Verdict::Accept)
        }
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert_eq!(Leaf::new(Exploding).name(), "Exploding");
    }

    #[test]
    fn test_default_name_drops_generic_parameters() {
        let leaf = Leaf::new(Tagged::<std::collections::BTreeMap<String, Exploding>>(PhantomData));
        assert_eq!(leaf.name(), "Tagged");
    }

    #[test]
    fn test_error_is_caught_at_boundary() {
        let mut ctx = Context::new();
        let outcome = Leaf::new(Exploding).match_value(&json!(1), &mut ctx).unwrap();

        assert!(outcome.is_invalid());
        let reason = &outcome.errors()[0].errors[0];
        assert!(reason.is_exception());
        assert_eq!(reason.message, "boom");
        assert_eq!(ctx.errors().len(), 1);
    }

    #[test]
    fn test_accept_as_sets_output() {
        let upper = from_fn("Upper", |value, _| {
            Ok(Verdict::AcceptAs(json!(text(value).to_uppercase())))
        });
        let outcome = upper.call(&json!("abc")).unwrap();
        assert_eq!(outcome.unpack().unwrap(), &json!("ABC"));
        assert_eq!(outcome.as_matched().unwrap().value(), &json!("abc"));
    }

    #[test]
    fn test_bool_rejection_is_tagged() {
        let never = from_fn("Never", |_, _| Ok(false));
        let outcome = never.call(&json!(null)).unwrap();
        assert!(outcome.as_failure().unwrap().has_tag("invalid"));
        assert_eq!(outcome.validator(), "Never");
    }

    #[test]
    fn test_text_view() {
        assert_eq!(text(&json!("abc")), "abc");
        assert_eq!(text(&json!(111)), "111");
    }
}
