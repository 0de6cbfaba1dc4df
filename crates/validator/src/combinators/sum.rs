//! Sum combinator - alternation of validators
//!
//! This module provides the [`Sum`] combinator: a value is valid if at least
//! one member accepts it, and the first member in declaration order wins.
//!
//! Unlike a short-circuiting OR, every member is evaluated, each in its own
//! child context. The error records of every member end up in the outer
//! context, so a caller can see why the losing alternatives rejected the
//! value even when the Sum as a whole matched.
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let login = sum_of([email().shared(), phone().shared()]).unwrap();
//!
//! let outcome = login.call(&json!("admin@example.com")).unwrap();
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.validator(), "Email");
//!
//! // The phone check still left its failure record behind.
//! assert_eq!(outcome.context().errors()[0].validator, "Phone");
//! ```

use crate::combinators::error::ContractError;
use crate::foundation::{
    Context, ErrorRecord, Failure, Kind, Outcome, SharedValidator, ValidationError, Validator,
};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Tag appended by a Sum when no member matched.
pub const NO_MATCHES: &str = "no_matches";

/// Alternation over an ordered, deduplicated list of validators.
///
/// Nested sums are flattened on construction, so `A | (B | C)` holds the
/// members `[A, B, C]`. A member that appears twice (the same shared
/// descriptor) is kept at its first position only.
#[derive(Debug, Clone)]
pub struct Sum {
    members: Vec<SharedValidator>,
    name: Option<Cow<'static, str>>,
}

impl Sum {
    /// Creates a Sum from its members.
    ///
    /// # Errors
    ///
    /// [`ContractError::EmptyComposition`] if `members` is empty.
    pub fn new(members: impl IntoIterator<Item = SharedValidator>) -> Result<Self, ContractError> {
        let sum = Self::flattened(members);
        if sum.members.is_empty() {
            return Err(ContractError::empty("Sum"));
        }
        Ok(sum)
    }

    pub(crate) fn pair(left: SharedValidator, right: SharedValidator) -> Self {
        Self::flattened([left, right])
    }

    /// Keeps `members` exactly as given: no flattening, no deduplication.
    /// Positions must stay aligned with a parallel list (see `Contract`).
    pub(crate) fn ordered(members: Vec<SharedValidator>) -> Self {
        Self {
            members,
            name: None,
        }
    }

    fn flattened(members: impl IntoIterator<Item = SharedValidator>) -> Self {
        let mut flat: Vec<SharedValidator> = Vec::new();
        for member in members {
            let nested = match member.kind() {
                Kind::Sum(inner) => Some(inner.members.clone()),
                _ => None,
            };
            let expanded = nested.unwrap_or_else(|| vec![member]);
            for candidate in expanded {
                if !flat.iter().any(|known| same_descriptor(known, &candidate)) {
                    flat.push(candidate);
                }
            }
        }
        Self {
            members: flat,
            name: None,
        }
    }

    /// Overrides the identity used to tag this Sum's own error record.
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[SharedValidator] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a Sum built through [`Sum::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Evaluates every member and returns the position of the winner along
    /// with the Sum's outcome.
    pub(crate) fn select(
        &self,
        value: &Value,
        ctx: &mut Context,
    ) -> Result<(Option<usize>, Outcome), ContractError> {
        let mut winner: Option<(usize, Outcome, Context)> = None;
        let mut last_context: Option<Context> = None;
        let mut failures: Vec<ErrorRecord> = Vec::new();

        for (index, member) in self.members.iter().enumerate() {
            tracing::trace!(sum = %self.name(), member = %member.name(), index, "evaluating alternative");

            let mut child = ctx.fork();
            let outcome = member.match_value(value, &mut child)?;
            ctx.extend_errors(child.errors().iter().cloned());

            if outcome.is_valid() {
                if winner.is_none() {
                    winner = Some((index, outcome, child));
                }
            } else {
                failures.extend(outcome.errors().iter().cloned());
                last_context = Some(child);
            }
        }

        if let Some((index, outcome, child)) = winner {
            ctx.absorb(child);
            return Ok((Some(index), outcome.with_context(ctx.clone()).with_branch(index)));
        }

        if let Some(child) = last_context {
            ctx.absorb(child);
        }

        let name = self.name();
        tracing::debug!(sum = %name, alternatives = self.members.len(), "no alternative matched");

        let sentinel = ErrorRecord::new(name.clone(), ValidationError::tag(NO_MATCHES));
        ctx.push_error(sentinel.clone());
        failures.push(sentinel);

        Ok((
            None,
            Outcome::Failed(Failure::new(name.into_owned(), failures, ctx.clone())),
        ))
    }
}

fn same_descriptor(left: &SharedValidator, right: &SharedValidator) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
}

impl Validator for Sum {
    fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => {
                let members: Vec<_> = self.members.iter().map(|m| m.name()).collect();
                Cow::Owned(format!("Sum({})", members.join(",")))
            }
        }
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Sum(self)
    }

    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
        self.select(value, ctx).map(|(_, outcome)| outcome)
    }

    /// Delegates to the member that won, so a member with a custom `unpack`
    /// keeps it inside the Sum.
    fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        match outcome.split_branch() {
            Some((index, inner)) => match self.members.get(index) {
                Some(member) => member.unpack(&inner),
                None => Err(ContractError::unpack_on_invalid(self.name())),
            },
            None => outcome.unpack().cloned(),
        }
    }
}

/// Creates a [`Sum`] from a list of validators.
///
/// # Examples
///
/// ```rust
/// use refined::prelude::*;
/// use serde_json::json;
///
/// let login = sum_of([email().shared(), phone().shared()]).unwrap();
/// assert!(login.call(&json!("not a login")).unwrap().is_invalid());
/// ```
pub fn sum_of(
    members: impl IntoIterator<Item = SharedValidator>,
) -> Result<Sum, ContractError> {
    Sum::new(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidatorExt;
    use crate::validators::{anything, ascii, email, from_fn, phone};
    use serde_json::json;

    #[test]
    fn test_first_valid_member_wins() {
        let first = from_fn("First", |_, _| Ok(true));
        let second = from_fn("Second", |_, _| Ok(true));
        let sum = first.or(second);

        let outcome = sum.call(&json!(1)).unwrap();
        assert_eq!(outcome.validator(), "First");
        assert_eq!(sum.select(&json!(1), &mut Context::new()).unwrap().0, Some(0));
    }

    #[test]
    fn test_failure_collects_every_member_plus_sentinel() {
        let sum = email().or(phone());
        let mut ctx = Context::new();
        let outcome = sum.match_value(&json!("not a login"), &mut ctx).unwrap();

        let validators: Vec<_> = outcome.errors().iter().map(|r| r.validator.as_str()).collect();
        assert_eq!(validators, ["Email", "Phone", "Sum(Email,Phone)"]);
        assert!(outcome.as_failure().unwrap().has_tag(NO_MATCHES));
        assert_eq!(ctx.errors(), outcome.errors());
    }

    #[test]
    fn test_nested_sums_are_flattened() {
        let sum = email().or(phone().or(ascii()));
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.name(), "Sum(Email,Phone,Ascii)");
    }

    #[test]
    fn test_duplicate_descriptor_is_kept_once() {
        let shared = email().shared();
        let sum = Sum::new([shared.clone(), phone().shared(), shared]).unwrap();
        assert_eq!(sum.len(), 2);
    }

    #[test]
    fn test_empty_sum_is_rejected() {
        let err = Sum::new(Vec::new()).unwrap_err();
        assert_eq!(err, ContractError::empty("Sum"));
    }

    #[test]
    fn test_losing_alternative_entries_do_not_leak() {
        let marking = from_fn("Marking", |_, ctx| {
            ctx.insert("marked", true);
            Ok(false)
        });
        let sum = marking.or(anything());

        let mut ctx = Context::new();
        let outcome = sum.match_value(&json!("x"), &mut ctx).unwrap();
        assert!(outcome.is_valid());
        assert!(!ctx.contains("marked"));
        assert_eq!(ctx.errors().len(), 1);
    }

    #[test]
    fn test_last_member_context_is_merged_on_failure() {
        let sum = from_fn("Left", |_, ctx| {
            ctx.insert("left", 1);
            Ok(false)
        })
        .or(from_fn("Right", |_, ctx| {
            ctx.insert("right", 2);
            Ok(false)
        }));

        let mut ctx = Context::new();
        sum.match_value(&json!(null), &mut ctx).unwrap();
        assert!(ctx.contains("right"));
        assert!(!ctx.contains("left"));
    }

    #[test]
    fn test_named_sum_tags_sentinel() {
        let sum = email().or(phone()).named("Login");
        let outcome = sum.call(&json!(42)).unwrap();
        assert_eq!(outcome.errors().last().unwrap().validator, "Login");
    }

    #[test]
    fn test_unpack_dispatches_by_position_not_name() {
        let raw = from_fn("Login", |_, _| Ok(true));
        let digits = from_fn("Login", |value: &Value, _: &mut Context| {
            Ok(value.as_str().is_some_and(|s| s.chars().all(|c| c.is_ascii_digit())))
        })
        .and_then(phone());

        let sum = Sum::new([digits.shared(), raw.shared()]).unwrap();
        let outcome = sum.call(&json!("89991233312")).unwrap();
        assert_eq!(outcome.as_matched().unwrap().branches(), [0]);
        assert_eq!(sum.unpack(&outcome).unwrap(), json!("89991233312"));

        let fallback = sum.call(&json!("admin")).unwrap();
        assert_eq!(fallback.as_matched().unwrap().branches(), [1]);
        assert_eq!(sum.unpack(&fallback).unwrap(), json!("admin"));
    }

    #[test]
    fn test_unpack_uses_winner_output() {
        let sum = email().or(phone());
        let outcome = sum.call(&json!("8 (999) 123-33-12")).unwrap();
        assert_eq!(sum.unpack(&outcome).unwrap(), json!("89991233312"));
    }
}
