//! The identity validator.

use crate::foundation::{BoxError, Context};
use crate::validators::leaf::{Leaf, Refinement, Verdict};
use serde_json::Value;

/// Accepts every value unchanged.
///
/// Useful as the last alternative of a Sum or as a placeholder Pipe step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl Refinement for Anything {
    fn refine(&self, _value: &Value, _ctx: &mut Context) -> Result<Verdict, BoxError> {
        Ok(Verdict::Accept)
    }
}

/// Validator that accepts every value.
#[must_use]
pub fn anything() -> Leaf<Anything> {
    Leaf::new(Anything)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validator;
    use serde_json::json;

    #[test]
    fn test_accepts_everything() {
        for value in [json!(null), json!(""), json!([1, {"a": 2}])] {
            let outcome = anything().call(&value).unwrap();
            assert_eq!(outcome.unpack().unwrap(), &value);
        }
    }
}
