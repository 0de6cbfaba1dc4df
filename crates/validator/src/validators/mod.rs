//! Built-in validators
//!
//! Leaf validators for common checks. Every leaf is a [`Refinement`]
//! wrapped in a [`Leaf`], so it plugs into Sum, Pipe, Tuple and Contract
//! like any other [`Validator`](crate::foundation::Validator).
//!
//! # Categories
//!
//! - **Content**: email, ASCII
//! - **Formats**: phone numbers, JSON documents
//! - **Structure**: object key normalization
//! - **Utility**: [`anything`], closures via [`from_fn`]
//!
//! # Examples
//!
//! ```rust
//! use refined::prelude::*;
//! use serde_json::json;
//!
//! // Login: either an email or a phone number
//! let login = email().or(phone());
//! assert!(login.call(&json!("admin@example.com")).unwrap().is_valid());
//! assert!(login.call(&json!("8 (999) 123-33-12")).unwrap().is_valid());
//! assert!(login.call(&json!("not a login")).unwrap().is_invalid());
//! ```

pub mod anything;
pub mod content;
pub mod json_string;
pub mod leaf;
pub mod normalize;
pub mod phone;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use leaf::{FnRefinement, Leaf, Refinement, Verdict, from_fn};

pub use anything::{Anything, anything};
pub use content::{Ascii, Email, ascii, email};
pub use json_string::{Json, json};
pub use normalize::{NormalizeKeys, normalize_key, normalize_keys, normalize_keys_step};
pub use phone::{Phone, PhoneMode, phone};
