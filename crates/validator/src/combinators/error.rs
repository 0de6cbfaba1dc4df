//! Misuse errors for compositions
//!
//! Validation failures are data: they live inside
//! [`Outcome::Failed`](crate::foundation::Outcome::Failed) and are returned
//! normally. Everything in this module is a programmer error instead, such
//! as unpacking a failed outcome, handing a Tuple the wrong number of values
//! or building an empty Sum. Those are returned as [`ContractError`] and are
//! fatal to the current call.
//!
//! # Examples
//!
//! ```rust
//! use refined::combinators::ContractError;
//!
//! let error = ContractError::arity("Tuple(email,password)", 2, 3);
//! assert_eq!(
//!     error.to_string(),
//!     "Tuple(email,password): wrong number of values (given 3, expected 2)"
//! );
//! ```

/// Programmer errors raised by validators and combinators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ContractError {
    /// `unpack` was called on a failed outcome.
    #[error("{validator}: cannot unpack an invalid outcome")]
    UnpackOnInvalid {
        /// Validator that produced the failure.
        validator: String,
    },

    /// A Tuple received a different number of values than it has attributes.
    #[error("{validator}: wrong number of values (given {given}, expected {expected})")]
    Arity {
        /// Tuple identity.
        validator: String,
        /// Number of attributes.
        expected: usize,
        /// Number of values supplied.
        given: usize,
    },

    /// A Tuple matched by name did not find one of its attributes.
    #[error("{validator}: missing value for attribute '{attribute}'")]
    MissingAttribute {
        /// Tuple identity.
        validator: String,
        /// Attribute without a value.
        attribute: String,
    },

    /// A Tuple received neither an array nor an object.
    #[error("{validator}: expected an array or an object, got {found}")]
    NotACollection {
        /// Tuple identity.
        validator: String,
        /// JSON type that was supplied instead.
        found: &'static str,
    },

    /// A composition was built without members.
    #[error("{kind} needs at least one member")]
    EmptyComposition {
        /// Sum, Pipe, Tuple or Contract.
        kind: &'static str,
    },

    /// Pipe step names do not line up with the steps.
    #[error("{given} step names given for {expected} steps")]
    NameCountMismatch {
        /// Number of steps.
        expected: usize,
        /// Number of names supplied.
        given: usize,
    },

    /// The same Tuple attribute or Pipe step name was declared twice.
    #[error("duplicate name '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

// ============================================================================
// CONSTRUCTOR HELPERS
// ============================================================================

impl ContractError {
    /// Creates an unpack-on-invalid error.
    pub fn unpack_on_invalid(validator: impl Into<String>) -> Self {
        Self::UnpackOnInvalid {
            validator: validator.into(),
        }
    }

    /// Creates an arity error.
    pub fn arity(validator: impl Into<String>, expected: usize, given: usize) -> Self {
        Self::Arity {
            validator: validator.into(),
            expected,
            given,
        }
    }

    /// Creates a missing-attribute error.
    pub fn missing_attribute(validator: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            validator: validator.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an empty-composition error.
    #[must_use]
    pub fn empty(kind: &'static str) -> Self {
        Self::EmptyComposition { kind }
    }

    /// Returns true for errors raised while building a descriptor, as opposed
    /// to errors raised during a call.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyComposition { .. } | Self::NameCountMismatch { .. } | Self::DuplicateName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_on_invalid_display() {
        let error = ContractError::unpack_on_invalid("Email");
        assert_eq!(error.to_string(), "Email: cannot unpack an invalid outcome");
        assert!(!error.is_construction_error());
    }

    #[test]
    fn test_missing_attribute_display() {
        let error = ContractError::missing_attribute("Tuple(login,password)", "password");
        assert!(error.to_string().contains("'password'"));
    }

    #[test]
    fn test_construction_errors() {
        assert!(ContractError::empty("Sum").is_construction_error());
        assert!(
            ContractError::NameCountMismatch {
                expected: 2,
                given: 1
            }
            .is_construction_error()
        );
        assert!(
            ContractError::DuplicateName {
                name: "email".into()
            }
            .is_construction_error()
        );
    }
}
