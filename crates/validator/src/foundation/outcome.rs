//! The two-variant result of every match
//!
//! An [`Outcome`] is either [`Matched`] (the raw value, the validator's
//! designated output and a context snapshot) or [`Failure`] (the error
//! records the validator produced plus a context snapshot). Which extra
//! projection a failure carries is decided by the producing descriptor's
//! [`FailureShape`].

use crate::combinators::error::ContractError;
use crate::foundation::context::{Context, StepKey};
use crate::foundation::error::{ErrorRecord, ValidationError};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

// ============================================================================
// FAILURE SHAPE
// ============================================================================

/// Failure-projection strategy, chosen on the descriptor at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureShape {
    /// Errors and context only.
    #[default]
    Plain,
    /// Also keep the outcomes of the failing Tuple attributes.
    Attributes,
    /// Also keep the key of the Pipe step that failed.
    Steps,
}

/// Extra projection carried by a [`Failure`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureDetail {
    /// Nothing beyond the error records.
    #[default]
    Plain,
    /// Outcomes of the failing attributes only, in declaration order.
    Attributes(IndexMap<String, Outcome>),
    /// The step that short-circuited the Pipe.
    Step(StepKey),
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of matching a value against a validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The value satisfied the validator.
    Matched(Matched),
    /// The value did not satisfy the validator.
    Failed(Failure),
}

impl Outcome {
    /// True for [`Outcome::Matched`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// True for [`Outcome::Failed`].
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Identity of the validator that produced this outcome.
    #[must_use]
    pub fn validator(&self) -> &str {
        match self {
            Self::Matched(m) => &m.validator,
            Self::Failed(f) => &f.validator,
        }
    }

    /// Context snapshot taken when the outcome was produced.
    #[must_use]
    pub fn context(&self) -> &Context {
        match self {
            Self::Matched(m) => &m.context,
            Self::Failed(f) => &f.context,
        }
    }

    /// Error records of a failure; empty for a match.
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        match self {
            Self::Matched(_) => &[],
            Self::Failed(f) => &f.errors,
        }
    }

    /// Designated output of a successful match.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnpackOnInvalid`] when called on a failure.
    pub fn unpack(&self) -> Result<&Value, ContractError> {
        match self {
            Self::Matched(m) => Ok(&m.output),
            Self::Failed(f) => Err(ContractError::unpack_on_invalid(&f.validator)),
        }
    }

    /// Returns the match, if any.
    #[must_use]
    pub fn as_matched(&self) -> Option<&Matched> {
        match self {
            Self::Matched(m) => Some(m),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Matched(_) => None,
            Self::Failed(f) => Some(f),
        }
    }

    /// Replaces the context snapshot.
    pub(crate) fn with_context(mut self, context: Context) -> Self {
        match &mut self {
            Self::Matched(m) => m.context = context,
            Self::Failed(f) => f.context = context,
        }
        self
    }

    /// Drops the context snapshot, keeping validator, errors and detail.
    pub(crate) fn detached(self) -> Self {
        self.with_context(Context::default())
    }

    /// Marks a match as produced by alternative `index`; failures are
    /// returned unchanged.
    pub(crate) fn with_branch(mut self, index: usize) -> Self {
        if let Self::Matched(m) = &mut self {
            m.branches.push(index);
        }
        self
    }

    /// Pops the outermost branch: the alternative chosen by the composition
    /// that produced this outcome, and the outcome as that alternative
    /// produced it. A single entry is left in place; no member below it
    /// reads the path.
    pub(crate) fn split_branch(&self) -> Option<(usize, Cow<'_, Self>)> {
        let Self::Matched(m) = self else {
            return None;
        };
        let (&index, rest) = m.branches.split_last()?;
        if rest.is_empty() {
            return Some((index, Cow::Borrowed(self)));
        }
        let mut inner = m.clone();
        inner.branches.pop();
        Some((index, Cow::Owned(Self::Matched(inner))))
    }
}

// ============================================================================
// MATCHED
// ============================================================================

/// A successful match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matched {
    validator: String,
    value: Value,
    output: Value,
    context: Context,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    branches: Vec<usize>,
}

impl Matched {
    pub(crate) fn new(validator: String, value: Value, output: Value, context: Context) -> Self {
        Self {
            validator,
            value,
            output,
            context,
            branches: Vec::new(),
        }
    }

    /// Identity of the validator that matched.
    #[must_use]
    pub fn validator(&self) -> &str {
        &self.validator
    }

    /// The raw value that was matched.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The designated output (the raw value unless the validator
    /// transformed it).
    #[must_use]
    pub fn output(&self) -> &Value {
        &self.output
    }

    /// Context snapshot.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Positions of the alternatives chosen on the way to this match,
    /// innermost first.
    #[must_use]
    pub fn branches(&self) -> &[usize] {
        &self.branches
    }
}

// ============================================================================
// FAILURE
// ============================================================================

/// A failed match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    validator: String,
    errors: Vec<ErrorRecord>,
    context: Context,
    #[serde(skip_serializing_if = "is_plain")]
    detail: FailureDetail,
}

fn is_plain(detail: &FailureDetail) -> bool {
    matches!(detail, FailureDetail::Plain)
}

impl Failure {
    pub(crate) fn new(validator: String, errors: Vec<ErrorRecord>, context: Context) -> Self {
        Self {
            validator,
            errors,
            context,
            detail: FailureDetail::Plain,
        }
    }

    /// Records `error` under `validator` in `ctx` and builds the failure
    /// carrying the current context snapshot.
    pub(crate) fn report(validator: &str, error: ValidationError, ctx: &mut Context) -> Outcome {
        let record = ErrorRecord::new(validator, error);
        ctx.push_error(record.clone());
        Outcome::Failed(Self::new(validator.to_owned(), vec![record], ctx.clone()))
    }

    pub(crate) fn with_detail(mut self, detail: FailureDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Identity of the validator that failed.
    #[must_use]
    pub fn validator(&self) -> &str {
        &self.validator
    }

    /// Error records, one per reporting validator call.
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Context snapshot.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Projection selected by the descriptor's [`FailureShape`].
    #[must_use]
    pub fn detail(&self) -> &FailureDetail {
        &self.detail
    }

    /// All reason messages in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().flat_map(ErrorRecord::messages).collect()
    }

    /// Reasons merged per validator identity, in first-seen order.
    #[must_use]
    pub fn errors_by_validator(&self) -> IndexMap<&str, Vec<&ValidationError>> {
        let mut merged: IndexMap<&str, Vec<&ValidationError>> = IndexMap::new();
        for record in &self.errors {
            merged
                .entry(record.validator.as_str())
                .or_default()
                .extend(record.errors.iter());
        }
        merged
    }

    /// True if any reason anywhere in the failure is the symbolic `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.errors
            .iter()
            .flat_map(|r| r.errors.iter())
            .any(|e| e.is_tag(tag))
    }

    /// Outcomes of the failing Tuple attributes; empty unless the failure
    /// has the [`FailureShape::Attributes`] projection.
    #[must_use]
    pub fn attribute_errors(&self) -> IndexMap<&str, &Outcome> {
        match &self.detail {
            FailureDetail::Attributes(attributes) => attributes
                .iter()
                .map(|(name, outcome)| (name.as_str(), outcome))
                .collect(),
            _ => IndexMap::new(),
        }
    }

    /// Failing attributes mapped to their JSON error projection. Valid
    /// attributes never appear.
    #[must_use]
    pub fn unpack_attributes(&self) -> IndexMap<String, Value> {
        self.attribute_errors()
            .into_iter()
            .map(|(name, outcome)| {
                let projection = outcome.as_failure().map_or(Value::Null, Self::to_value);
                (name.to_owned(), projection)
            })
            .collect()
    }

    /// Step that short-circuited a Pipe, when the failure carries the
    /// [`FailureShape::Steps`] projection.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepKey> {
        match &self.detail {
            FailureDetail::Step(key) => Some(key),
            _ => None,
        }
    }

    /// Raw value that was fed into the failed Pipe step.
    #[must_use]
    pub fn failed_step_input(&self) -> Option<&Value> {
        self.failed_step()
            .and_then(|key| self.context.steps().get(key))
    }

    /// JSON projection: `{ validator: [message, ..], .. }`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        for (validator, reasons) in self.errors_by_validator() {
            let messages = reasons
                .into_iter()
                .map(|e| Value::String(e.message.to_string()))
                .collect();
            object.insert(validator.to_owned(), Value::Array(messages));
        }
        Value::Object(object)
    }
}
