//! Validator combinators
//!
//! Combinators build new validators out of existing ones:
//!
//! - [`Sum`]: alternation, the first member (in declaration order) that
//!   accepts the value wins
//! - [`Pipe`]: sequence, each step validates the previous step's output
//! - [`Tuple`]: record, every named attribute is validated
//! - [`Contract`]: input validator, external call, output validator
//!
//! Descriptors are immutable once built. Fluent composition
//! ([`ValidatorExt::or`], [`ValidatorExt::and_then`]) always returns a new
//! descriptor.
//!
//! [`ValidatorExt::or`]: crate::foundation::ValidatorExt::or
//! [`ValidatorExt::and_then`]: crate::foundation::ValidatorExt::and_then
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! let registration = json().and_then(
//!     tuple_of([
//!         ("login", email().or(phone()).shared()),
//!         ("password", ascii().shared()),
//!     ])
//!     .unwrap(),
//! );
//!
//! let outcome = registration
//!     .call(&json!(r#"{"login":"8 (999) 123-33-12","password":"111"}"#))
//!     .unwrap();
//! assert_eq!(registration.unpack(&outcome).unwrap(), json!(["89991233312", "111"]));
//! ```

pub mod contract;
pub mod error;
pub mod pipe;
pub mod sum;
pub mod tuple;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use contract::{BoundContract, Contract, INPUT_STEP, OUTPUT_STEP, contract_of};
pub use error::ContractError;
pub use pipe::{Pipe, pipe_of};
pub use sum::{NO_MATCHES, Sum, sum_of};
pub use tuple::{INVALID_ATTRIBUTES, Tuple, tuple_of};
