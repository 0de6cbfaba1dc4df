//! Pipe combinator - sequence of validators
//!
//! A [`Pipe`] feeds the output of each step into the next one and stops at
//! the first step that fails. The raw value fed into every step that ran is
//! kept in the context under the step's name (or its index), which makes it
//! easy to see how far a value got and what it looked like on the way. A
//! Pipe nested in a step records its own steps under that step's key, so
//! `"2.0"` is the first inner step of outer step `2`.
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let registration = pipe_of(
//!     [
//!         json().shared(),
//!         tuple_of([("email", email().shared()), ("password", ascii().shared())])
//!             .unwrap()
//!             .shared(),
//!     ],
//!     &["parse", "validate"],
//! )
//! .unwrap();
//!
//! let outcome = registration.call(&json!("<xml>")).unwrap();
//! assert!(outcome.is_invalid());
//! assert_eq!(outcome.context().steps().len(), 1);
//! assert_eq!(outcome.context().step("parse"), Some(&json!("<xml>")));
//! ```

use crate::combinators::error::ContractError;
use crate::foundation::{
    BoxError, Context, FailureDetail, FailureShape, Kind, Outcome, SharedValidator,
    StepKey, ValidationError, Validator,
};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Callback deriving the value fed into the next step from a step's output.
pub(crate) type Transform<'a> = &'a mut dyn FnMut(&Value) -> Result<Value, BoxError>;

/// Ordered sequence of validators; short-circuits on the first failure.
#[derive(Debug, Clone)]
pub struct Pipe {
    steps: Vec<SharedValidator>,
    names: Vec<Cow<'static, str>>,
    name: Option<Cow<'static, str>>,
    shape: FailureShape,
}

impl Pipe {
    /// Creates an unnamed Pipe; steps are addressed by index.
    ///
    /// # Errors
    ///
    /// [`ContractError::EmptyComposition`] if `steps` is empty.
    pub fn new(steps: impl IntoIterator<Item = SharedValidator>) -> Result<Self, ContractError> {
        let steps: Vec<_> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(ContractError::empty("Pipe"));
        }
        Ok(Self {
            steps,
            names: Vec::new(),
            name: None,
            shape: FailureShape::Plain,
        })
    }

    pub(crate) fn pair(first: SharedValidator, second: SharedValidator) -> Self {
        Self {
            steps: vec![first, second],
            names: Vec::new(),
            name: None,
            shape: FailureShape::Plain,
        }
    }

    /// Two named steps; the names must differ.
    pub(crate) fn labelled(
        first: (&'static str, SharedValidator),
        second: (&'static str, SharedValidator),
    ) -> Self {
        Self {
            steps: vec![first.1, second.1],
            names: vec![Cow::Borrowed(first.0), Cow::Borrowed(second.0)],
            name: None,
            shape: FailureShape::Plain,
        }
    }

    /// Names every step.
    ///
    /// # Errors
    ///
    /// [`ContractError::NameCountMismatch`] if the number of names differs
    /// from the number of steps, [`ContractError::DuplicateName`] if a name
    /// repeats.
    pub fn with_names<N>(mut self, names: impl IntoIterator<Item = N>) -> Result<Self, ContractError>
    where
        N: Into<Cow<'static, str>>,
    {
        let names: Vec<Cow<'static, str>> = names.into_iter().map(Into::into).collect();
        if names.len() != self.steps.len() {
            return Err(ContractError::NameCountMismatch {
                expected: self.steps.len(),
                given: names.len(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for name in &names {
            if !seen.insert(&**name) {
                return Err(ContractError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        self.names = names;
        Ok(self)
    }

    /// Overrides the identity of this Pipe.
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Selects the failure projection. [`FailureShape::Steps`] marks which
    /// step failed; any other shape returns the step's failure unchanged.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_failure_shape(mut self, shape: FailureShape) -> Self {
        self.shape = shape;
        self
    }

    /// Appends a step, returning a new descriptor. Unnamed pipes are
    /// extended in place; a named pipe becomes the first step of a new one.
    #[must_use]
    pub fn and_then<V: Validator + 'static>(self, next: V) -> Self {
        if self.names.is_empty() && self.name.is_none() {
            let mut steps = self.steps;
            steps.push(Arc::new(next));
            Self { steps, ..self }
        } else {
            Self::pair(Arc::new(self), Arc::new(next))
        }
    }

    /// Steps in order.
    #[must_use]
    pub fn steps(&self) -> &[SharedValidator] {
        &self.steps
    }

    /// Step names; empty for an unnamed Pipe.
    #[must_use]
    pub fn names(&self) -> &[Cow<'static, str>] {
        &self.names
    }

    /// Key under which step `index` is recorded in the context.
    #[must_use]
    pub fn step_key(&self, index: usize) -> StepKey {
        self.names
            .get(index)
            .map_or(StepKey::Index(index), |name| StepKey::Name(name.clone()))
    }

    /// Runs the steps, calling `transform` on the output of every
    /// non-terminal step to derive the value fed into the next one.
    ///
    /// An error returned by `transform` fails the Pipe with an exception
    /// reason; it is never propagated.
    pub fn match_with<F>(
        &self,
        value: &Value,
        ctx: &mut Context,
        mut transform: F,
    ) -> Result<Outcome, ContractError>
    where
        F: FnMut(&Value) -> Result<Value, BoxError>,
    {
        self.run(value, ctx, Some(&mut transform))
    }

    pub(crate) fn run(
        &self,
        value: &Value,
        ctx: &mut Context,
        mut transform: Option<Transform<'_>>,
    ) -> Result<Outcome, ContractError> {
        let last_index = self.steps.len().saturating_sub(1);
        let mut next = value.clone();
        let mut last = None;

        for (index, step) in self.steps.iter().enumerate() {
            let local = self.step_key(index);
            let key = ctx.record_step(local.clone(), next.clone());
            tracing::trace!(pipe = %self.name(), step = %key, validator = %step.name(), "running step");

            ctx.push_trail(&step.name());
            let outcome = ctx.scoped(local.to_string(), |ctx| step.match_value(&next, ctx))?;

            if outcome.is_invalid() {
                tracing::debug!(pipe = %self.name(), step = %key, "step failed, pipe stops");
                return Ok(self.project_failure(outcome, key));
            }

            next = step.unpack(&outcome)?;
            if index < last_index
                && let Some(transform) = transform.as_deref_mut()
            {
                next = match transform(&next) {
                    Ok(value) => value,
                    Err(error) => {
                        tracing::debug!(pipe = %self.name(), step = %key, %error, "transform failed");
                        return Ok(self.failure(ValidationError::exception(&*error), ctx));
                    }
                };
            }
            last = Some(outcome);
        }

        last.ok_or(ContractError::empty("Pipe"))
    }

    fn project_failure(&self, outcome: Outcome, key: StepKey) -> Outcome {
        match (self.shape, outcome) {
            (FailureShape::Steps, Outcome::Failed(failure)) => {
                Outcome::Failed(failure.with_detail(FailureDetail::Step(key)))
            }
            (_, outcome) => outcome,
        }
    }
}

impl Validator for Pipe {
    fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => {
                let steps: Vec<_> = self.steps.iter().map(|s| s.name()).collect();
                Cow::Owned(format!("Pipe({})", steps.join(",")))
            }
        }
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Pipe(self)
    }

    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
        self.run(value, ctx, None)
    }

    /// A successful Pipe's outcome is its last step's, so the last step
    /// decides what it unpacks to.
    fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        match self.steps.last() {
            Some(step) => step.unpack(outcome),
            None => outcome.unpack().cloned(),
        }
    }
}

/// Creates a [`Pipe`]; `names` is either empty or one name per step.
///
/// # Errors
///
/// See [`Pipe::new`] and [`Pipe::with_names`].
pub fn pipe_of(
    steps: impl IntoIterator<Item = SharedValidator>,
    names: &[&'static str],
) -> Result<Pipe, ContractError> {
    let pipe = Pipe::new(steps)?;
    if names.is_empty() {
        Ok(pipe)
    } else {
        pipe.with_names(names.iter().copied())
    }
}
