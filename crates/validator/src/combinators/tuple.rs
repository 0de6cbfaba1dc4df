//! Tuple combinator - product of named validators
//!
//! A [`Tuple`] validates a record: every attribute has its own validator,
//! every attribute is evaluated (no short-circuit) and a failure reports
//! all failing attributes at once.
//!
//! Each attribute's outcome is recorded in the context under the attribute
//! name (prefixed with the enclosing attribute's name when Tuples nest).
//! Recorded outcomes are detached: they keep validator, errors and detail
//! but not a context snapshot, since the shared context already holds it.
//!
//! Values are accepted positionally (a JSON array, matched by declaration
//! order) or by name (a JSON object). Supplying the wrong number of values
//! is misuse and returns [`ContractError::Arity`] instead of a failed
//! outcome.
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let registration =
//!     tuple_of([("email", email().shared()), ("password", ascii().shared())]).unwrap();
//!
//! let outcome = registration
//!     .call(&json!({"email": "admin@example.com", "password": "Пароль"}))
//!     .unwrap();
//!
//! let failure = outcome.as_failure().unwrap();
//! assert_eq!(failure.attribute_errors().len(), 1);
//! assert!(failure.unpack_attributes().contains_key("password"));
//! assert!(!failure.unpack_attributes().contains_key("email"));
//! ```

use crate::combinators::error::ContractError;
use crate::foundation::{
    Context, ErrorRecord, Failure, FailureDetail, FailureShape, Kind, Outcome, SharedValidator,
    ValidationError, Validator,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;

/// Tag appended by a Tuple when at least one attribute failed.
pub const INVALID_ATTRIBUTES: &str = "invalid_attributes";

/// Record of named attribute validators.
#[derive(Debug, Clone)]
pub struct Tuple {
    attributes: Vec<(Cow<'static, str>, SharedValidator)>,
    name: Option<Cow<'static, str>>,
    shape: FailureShape,
}

impl Tuple {
    /// Creates a Tuple from `(name, validator)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// [`ContractError::EmptyComposition`] without attributes,
    /// [`ContractError::DuplicateName`] if a name repeats.
    pub fn new<N>(
        attributes: impl IntoIterator<Item = (N, SharedValidator)>,
    ) -> Result<Self, ContractError>
    where
        N: Into<Cow<'static, str>>,
    {
        let attributes: Vec<(Cow<'static, str>, SharedValidator)> = attributes
            .into_iter()
            .map(|(name, validator)| (name.into(), validator))
            .collect();

        if attributes.is_empty() {
            return Err(ContractError::empty("Tuple"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (name, _) in &attributes {
            if !seen.insert(&**name) {
                return Err(ContractError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        Ok(Self {
            attributes,
            name: None,
            shape: FailureShape::Attributes,
        })
    }

    /// Overrides the identity of this Tuple.
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Selects the failure projection. The default,
    /// [`FailureShape::Attributes`], keeps the failing attributes' outcomes
    /// on the failure; any other shape keeps only the error records.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_failure_shape(mut self, shape: FailureShape) -> Self {
        self.shape = shape;
        self
    }

    /// Attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_ref())
    }

    /// Validator of one attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&SharedValidator> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, validator)| validator)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Always false for a Tuple built through [`Tuple::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Name-keyed view of a successful Tuple's output.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnpackOnInvalid`] if `outcome` is a failure.
    pub fn unpack_named(&self, outcome: &Outcome) -> Result<IndexMap<String, Value>, ContractError> {
        let Value::Array(outputs) = self.unpack(outcome)? else {
            return Err(ContractError::unpack_on_invalid(self.name()));
        };
        Ok(self
            .attribute_names()
            .map(str::to_owned)
            .zip(outputs)
            .collect())
    }

    /// Pairs every attribute with its value.
    fn values<'v>(&self, value: &'v Value) -> Result<Vec<&'v Value>, ContractError> {
        let given = match value {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            other => {
                return Err(ContractError::NotACollection {
                    validator: self.name().into_owned(),
                    found: json_type(other),
                });
            }
        };
        if given != self.attributes.len() {
            return Err(ContractError::arity(self.name(), self.attributes.len(), given));
        }

        match value {
            Value::Array(items) => Ok(items.iter().collect()),
            Value::Object(map) => self
                .attributes
                .iter()
                .map(|(name, _)| {
                    map.get(&**name)
                        .ok_or_else(|| ContractError::missing_attribute(self.name(), &**name))
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Validator for Tuple {
    fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => {
                let names: Vec<_> = self.attribute_names().collect();
                Cow::Owned(format!("Tuple({})", names.join(",")))
            }
        }
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Tuple(self)
    }

    /// Outputs of every attribute, in declaration order.
    ///
    /// A failed Tuple has no output: unpacking it is
    /// [`ContractError::UnpackOnInvalid`]. The failing-attribute map lives
    /// on the failure instead, see [`Failure::unpack_attributes`].
    fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        outcome.unpack().cloned()
    }

    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
        let values = self.values(value)?;

        let mut outputs = Vec::with_capacity(self.attributes.len());
        let mut failing: IndexMap<String, Outcome> = IndexMap::new();

        for ((name, validator), attribute_value) in self.attributes.iter().zip(values) {
            tracing::trace!(tuple = %self.name(), attribute = %name, validator = %validator.name(), "evaluating attribute");

            let outcome =
                ctx.scoped(name.to_string(), |ctx| validator.match_value(attribute_value, ctx))?;
            ctx.record_attribute(name, outcome.clone());

            if outcome.is_valid() {
                outputs.push(validator.unpack(&outcome)?);
            } else {
                failing.insert(name.to_string(), outcome.detached());
            }
        }

        if failing.is_empty() {
            return Ok(self.matched(value, Value::Array(outputs), ctx));
        }

        let name = self.name();
        tracing::debug!(tuple = %name, failing = failing.len(), "attributes failed");

        let mut errors: Vec<ErrorRecord> = failing
            .values()
            .flat_map(|outcome| outcome.errors().iter().cloned())
            .collect();
        let aggregate = ErrorRecord::new(name.clone(), ValidationError::tag(INVALID_ATTRIBUTES));
        ctx.push_error(aggregate.clone());
        errors.push(aggregate);

        let failure = Failure::new(name.into_owned(), errors, ctx.clone());
        let failure = match self.shape {
            FailureShape::Attributes => failure.with_detail(FailureDetail::Attributes(failing)),
            FailureShape::Plain | FailureShape::Steps => failure,
        };
        Ok(Outcome::Failed(failure))
    }
}

/// Creates a [`Tuple`] from `(name, validator)` pairs.
///
/// # Errors
///
/// See [`Tuple::new`].
pub fn tuple_of<N>(
    attributes: impl IntoIterator<Item = (N, SharedValidator)>,
) -> Result<Tuple, ContractError>
where
    N: Into<Cow<'static, str>>,
{
    Tuple::new(attributes)
}
