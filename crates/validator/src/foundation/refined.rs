//! Memoized validator instances
//!
//! A [`Refined`] binds one descriptor to one raw value. The first call to
//! [`Refined::outcome`] runs the match; every later call returns the cached
//! outcome without evaluating anything again.

use crate::combinators::error::ContractError;
use crate::foundation::context::Context;
use crate::foundation::outcome::Outcome;
use crate::foundation::traits::SharedValidator;
use serde_json::Value;

/// Evaluation state of a [`Refined`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Not evaluated yet.
    Pending,
    /// Evaluated and valid.
    Matched,
    /// Evaluated and invalid.
    Failed,
}

/// A value paired with the validator that judges it.
///
/// # Examples
///
/// ```rust
/// use refined::foundation::{MatchStatus, Refined};
/// use refined::prelude::*;
/// use serde_json::json;
///
/// let mut refined = Refined::new(ascii().shared(), json!("plain text"));
/// assert_eq!(refined.status(), MatchStatus::Pending);
///
/// assert!(refined.is_valid().unwrap());
/// assert_eq!(refined.status(), MatchStatus::Matched);
/// assert_eq!(refined.unpack().unwrap(), json!("plain text"));
/// ```
#[derive(Debug, Clone)]
pub struct Refined {
    validator: SharedValidator,
    value: Value,
    context: Context,
    outcome: Option<Outcome>,
}

impl Refined {
    /// Binds `value` to `validator` with a fresh root context.
    pub fn new(validator: SharedValidator, value: impl Into<Value>) -> Self {
        Self {
            validator,
            value: value.into(),
            context: Context::new(),
            outcome: None,
        }
    }

    /// Starts from a pre-populated context instead of an empty one.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// The raw value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Context as left by the match (or as supplied, while pending).
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Current evaluation state.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        match &self.outcome {
            None => MatchStatus::Pending,
            Some(outcome) if outcome.is_valid() => MatchStatus::Matched,
            Some(_) => MatchStatus::Failed,
        }
    }

    /// Runs the match once and returns the cached outcome afterwards.
    pub fn outcome(&mut self) -> Result<&Outcome, ContractError> {
        let outcome = match self.outcome.take() {
            Some(outcome) => outcome,
            None => self.validator.match_value(&self.value, &mut self.context)?,
        };
        Ok(self.outcome.insert(outcome))
    }

    /// True if the value satisfies the validator.
    pub fn is_valid(&mut self) -> Result<bool, ContractError> {
        Ok(self.outcome()?.is_valid())
    }

    /// Designated output of the validator.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnpackOnInvalid`] when the value did not match.
    pub fn unpack(&mut self) -> Result<Value, ContractError> {
        let validator = self.validator.clone();
        validator.unpack(self.outcome()?)
    }

    /// Consumes the instance, returning the outcome.
    pub fn into_outcome(mut self) -> Result<Outcome, ContractError> {
        self.outcome()?;
        self.outcome
            .ok_or_else(|| ContractError::unpack_on_invalid(self.validator.name()))
    }
}
