//! # refined
//!
//! Composable refinement validators over JSON values.
//!
//! ## Quick Start
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! // Alternation: the first member that accepts the value wins
//! let login = email().or(phone());
//!
//! let outcome = login.call(&json!("8 (999) 123-33-12")).unwrap();
//! assert_eq!(outcome.validator(), "Phone");
//! assert_eq!(login.unpack(&outcome).unwrap(), json!("89991233312"));
//! ```
//!
//! ## Composition
//!
//! - [`Sum`](combinators::Sum): ordered alternation (`a.or(b)`)
//! - [`Pipe`](combinators::Pipe): sequence, each step sees the previous
//!   output (`a.and_then(b)`)
//! - [`Tuple`](combinators::Tuple): named attributes, all evaluated
//! - [`Contract`](combinators::Contract): input validator, external call,
//!   output validator
//!
//! Every composition is itself a [`Validator`](foundation::Validator), so
//! compositions nest freely.
//!
//! ## Creating Validators
//!
//! Implement [`Refinement`](validators::Refinement) and wrap it in a
//! [`Leaf`](validators::Leaf), or use [`from_fn`](validators::from_fn) for
//! a closure. Implement [`Validator`](foundation::Validator) directly for
//! full control over the outcome.
//!
//! ## Built-in Validators
//!
//! - **Content**: [`Email`](validators::Email), [`Ascii`](validators::Ascii)
//! - **Formats**: [`Phone`](validators::Phone), [`Json`](validators::Json)
//! - **Structure**: [`NormalizeKeys`](validators::NormalizeKeys)
//! - **Utility**: [`Anything`](validators::Anything)

pub mod combinators;
pub mod foundation;
pub mod prelude;
pub mod validators;
