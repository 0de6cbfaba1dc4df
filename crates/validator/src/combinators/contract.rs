//! Contract - validated input, external call, validated output
//!
//! A [`Contract`] checks a request with an input validator, hands the
//! unpacked input to a caller-supplied callback (typically an HTTP call or a
//! lookup) and checks whatever the callback returned with an output
//! validator. The two steps are recorded in the context as `input` and
//! `output`.
//!
//! Several `(input, output)` associations may be declared. The input step is
//! then the alternation of all inputs, and the response is checked against
//! the output validator declared together with the input alternative that
//! matched (the first one in declaration order).
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let contract = Contract::new(email().shared(), json().shared());
//!
//! let outcome = contract
//!     .call(&json!("admin@example.com"), |email| {
//!         Ok(json!(format!(r#"{{"user": {email}}}"#)))
//!     })
//!     .unwrap();
//!
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.unpack().unwrap(), &json!({"user": "admin@example.com"}));
//! assert_eq!(outcome.context().step("input"), Some(&json!("admin@example.com")));
//! ```

use crate::combinators::error::ContractError;
use crate::combinators::{Pipe, Sum};
use crate::foundation::{
    BoxError, Context, Failure, Outcome, SharedValidator, StepKey, ValidationError, Validator,
};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Step name of the input validator.
pub const INPUT_STEP: &str = "input";
/// Step name of the output validator.
pub const OUTPUT_STEP: &str = "output";

#[derive(Debug, Clone)]
enum Route {
    /// One association: a plain two-step Pipe.
    Single(Pipe),
    /// Several associations; `outputs[i]` belongs to `inputs.members()[i]`.
    Paired {
        inputs: Sum,
        outputs: Vec<SharedValidator>,
    },
}

/// Input/output binding around an external call.
///
/// A Contract needs a callback for every call, so it is not a
/// [`Validator`] by itself; [`Contract::bind`] fixes the callback and
/// returns one.
#[derive(Debug, Clone)]
pub struct Contract {
    route: Route,
    name: Option<Cow<'static, str>>,
}

impl Contract {
    /// Binds one input validator to one output validator.
    #[must_use]
    pub fn new(input: SharedValidator, output: SharedValidator) -> Self {
        let name = describe(&input, &output);
        let pipe = Pipe::labelled((INPUT_STEP, input), (OUTPUT_STEP, output))
            .named(format!("Contract({name})"));
        Self {
            route: Route::Single(pipe),
            name: None,
        }
    }

    /// Binds several `(input, output)` associations.
    ///
    /// # Errors
    ///
    /// [`ContractError::EmptyComposition`] if no association is given.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (SharedValidator, SharedValidator)>,
    ) -> Result<Self, ContractError> {
        let (inputs, mut outputs): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        match inputs.len() {
            0 => Err(ContractError::empty("Contract")),
            1 => {
                let input = inputs.into_iter().next().ok_or(ContractError::empty("Contract"))?;
                let output = outputs.pop().ok_or(ContractError::empty("Contract"))?;
                Ok(Self::new(input, output))
            }
            _ => Ok(Self {
                route: Route::Paired {
                    inputs: Sum::ordered(inputs),
                    outputs,
                },
                name: None,
            }),
        }
    }

    /// Overrides the identity of this Contract.
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        self.route = match self.route {
            Route::Single(pipe) => Route::Single(pipe.named(name.clone())),
            paired @ Route::Paired { .. } => paired,
        };
        self.name = Some(name);
        self
    }

    /// Identity used for errors raised by the callback.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        if let Some(name) = &self.name {
            return Cow::Borrowed(name);
        }
        match &self.route {
            Route::Single(pipe) => pipe.name(),
            Route::Paired { inputs, outputs } => {
                let pairs: Vec<String> = inputs
                    .members()
                    .iter()
                    .zip(outputs)
                    .map(|(input, output)| describe(input, output))
                    .collect();
                Cow::Owned(format!("Contract({})", pairs.join(", ")))
            }
        }
    }

    /// Runs the contract against a fresh root context.
    pub fn call<F>(&self, value: &Value, callback: F) -> Result<Outcome, ContractError>
    where
        F: FnMut(&Value) -> Result<Value, BoxError>,
    {
        self.match_with(value, &mut Context::new(), callback)
    }

    /// Validates `value` as input, passes the unpacked input to `callback`
    /// and validates its result as output.
    ///
    /// An input failure is returned as is and `callback` is not invoked. A
    /// callback error becomes a failure tagged with this contract's name.
    pub fn match_with<F>(
        &self,
        value: &Value,
        ctx: &mut Context,
        mut callback: F,
    ) -> Result<Outcome, ContractError>
    where
        F: FnMut(&Value) -> Result<Value, BoxError>,
    {
        match &self.route {
            Route::Single(pipe) => pipe.match_with(value, ctx, &mut callback),
            Route::Paired { inputs, outputs } => {
                self.match_paired(inputs, outputs, value, ctx, &mut callback)
            }
        }
    }

    fn match_paired(
        &self,
        inputs: &Sum,
        outputs: &[SharedValidator],
        value: &Value,
        ctx: &mut Context,
        callback: &mut dyn FnMut(&Value) -> Result<Value, BoxError>,
    ) -> Result<Outcome, ContractError> {
        ctx.record_step(StepKey::name(INPUT_STEP), value.clone());
        ctx.push_trail(&inputs.name());

        let (winner, outcome) =
            ctx.scoped(INPUT_STEP.to_owned(), |ctx| inputs.select(value, ctx))?;
        let Some(index) = winner else {
            tracing::debug!(contract = %self.name(), "input rejected");
            return Ok(outcome);
        };
        let (Some(input), Some(output)) = (inputs.members().get(index), outputs.get(index)) else {
            return Err(ContractError::empty("Contract"));
        };
        tracing::trace!(contract = %self.name(), input = %input.name(), output = %output.name(), "input matched");

        let request = inputs.unpack(&outcome)?;
        let response = match callback(&request) {
            Ok(response) => response,
            Err(error) => return Ok(self.callback_failure(&error, ctx)),
        };

        ctx.record_step(StepKey::name(OUTPUT_STEP), response.clone());
        ctx.push_trail(&output.name());
        let outcome =
            ctx.scoped(OUTPUT_STEP.to_owned(), |ctx| output.match_value(&response, ctx))?;
        Ok(outcome.with_branch(index))
    }

    fn callback_failure(&self, error: &BoxError, ctx: &mut Context) -> Outcome {
        tracing::debug!(contract = %self.name(), %error, "callback failed");
        Failure::report(&self.name(), ValidationError::exception(&**error), ctx)
    }

    /// Designated output of a successful outcome: whatever the output
    /// validator that produced it unpacks to.
    pub fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        match &self.route {
            Route::Single(pipe) => pipe.unpack(outcome),
            Route::Paired { outputs, .. } => match outcome.split_branch() {
                Some((index, inner)) => match outputs.get(index) {
                    Some(output) => output.unpack(&inner),
                    None => Err(ContractError::unpack_on_invalid(self.name())),
                },
                None => outcome.unpack().cloned(),
            },
        }
    }

    /// Fixes the callback, turning the contract into a [`Validator`] that
    /// can be nested in other compositions.
    pub fn bind<F>(self, callback: F) -> BoundContract<F>
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync,
    {
        BoundContract {
            contract: self,
            callback,
        }
    }
}

fn describe(input: &SharedValidator, output: &SharedValidator) -> String {
    format!("{} => {}", input.name(), output.name())
}

/// A [`Contract`] with its callback fixed.
pub struct BoundContract<F> {
    contract: Contract,
    callback: F,
}

impl<F> fmt::Debug for BoundContract<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundContract")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl<F> Validator for BoundContract<F>
where
    F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync,
{
    fn name(&self) -> Cow<'_, str> {
        self.contract.name()
    }

    fn match_value(&self, value: &Value, ctx: &mut Context) -> Result<Outcome, ContractError> {
        self.contract.match_with(value, ctx, &self.callback)
    }

    fn unpack(&self, outcome: &Outcome) -> Result<Value, ContractError> {
        self.contract.unpack(outcome)
    }
}

/// Creates a [`Contract`] from `(input, output)` associations.
///
/// # Errors
///
/// See [`Contract::from_pairs`].
pub fn contract_of(
    pairs: impl IntoIterator<Item = (SharedValidator, SharedValidator)>,
) -> Result<Contract, ContractError> {
    Contract::from_pairs(pairs)
}
