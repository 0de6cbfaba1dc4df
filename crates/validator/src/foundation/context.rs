//! Diagnostic context threaded through a composition
//!
//! A [`Context`] is created at the root of a validation call and passed by
//! exclusive reference (`&mut Context`) into every nested match. Leaves
//! write free-form entries (for example the parsed JSON or the normalized
//! phone number); combinators write the reserved sections:
//!
//! - `errors`: append-only sequence of [`ErrorRecord`]s,
//! - `steps`: raw value fed into each Pipe step,
//! - `attributes`: nested outcome of each Tuple attribute,
//! - `trail`: identities of the validators a Pipe went through.
//!
//! Later writers may shadow an entry with the same key, but nothing ever
//! removes entries or errors.
//!
//! Steps and attributes recorded by a nested composition are keyed by the
//! path of the enclosing step or attribute (`"2.0"`, `"address.street"`),
//! so an inner Pipe or Tuple extends its parent's diagnostics instead of
//! overwriting them.

use crate::foundation::error::ErrorRecord;
use crate::foundation::outcome::Outcome;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// STEP KEY
// ============================================================================

/// Address of a Pipe step: its declared name, or its ordinal index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepKey {
    /// Unnamed step, addressed by position.
    Index(usize),
    /// Named step.
    Name(Cow<'static, str>),
}

impl StepKey {
    /// Creates a named key.
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl Serialize for StepKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<usize> for StepKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&'static str> for StepKey {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Ordered diagnostic store shared by the validators of one call tree.
///
/// # Examples
///
/// ```rust
/// use refined::foundation::Context;
/// use serde_json::json;
///
/// let mut ctx = Context::new();
/// ctx.insert("parsed", json!({"login": "admin"}));
///
/// assert!(ctx.contains("parsed"));
/// assert_eq!(ctx.get("parsed"), Some(&json!({"login": "admin"})));
/// assert!(ctx.errors().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    entries: IndexMap<String, Value>,
    errors: Vec<ErrorRecord>,
    steps: IndexMap<StepKey, Value>,
    attributes: IndexMap<String, Outcome>,
    trail: Vec<String>,
    #[serde(skip)]
    scope: Vec<String>,
}

impl Context {
    /// Creates an empty root context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a diagnostic entry, returning the value it shadows, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up a diagnostic entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Looks up a diagnostic entry holding a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Returns true if a diagnostic entry exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Diagnostic entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &IndexMap<String, Value> {
        &self.entries
    }

    /// Number of diagnostic entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing at all was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.errors.is_empty()
            && self.steps.is_empty()
            && self.attributes.is_empty()
    }

    /// Error records appended so far.
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Appends an error record.
    pub fn push_error(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    /// Appends several error records, preserving their order.
    pub fn extend_errors(&mut self, records: impl IntoIterator<Item = ErrorRecord>) {
        self.errors.extend(records);
    }

    /// Raw values fed into each Pipe step.
    #[must_use]
    pub fn steps(&self) -> &IndexMap<StepKey, Value> {
        &self.steps
    }

    /// Raw value fed into a given step.
    pub fn step(&self, key: impl Into<StepKey>) -> Option<&Value> {
        self.steps.get(&key.into())
    }

    /// Records the value fed into step `key` and returns the key it was
    /// stored under, which is scoped when a composition encloses this one.
    pub(crate) fn record_step(&mut self, key: StepKey, value: Value) -> StepKey {
        let key = if self.scope.is_empty() {
            key
        } else {
            StepKey::Name(Cow::Owned(self.scoped_key(&key.to_string())))
        };
        self.steps.insert(key.clone(), value);
        key
    }

    /// Nested outcome of each Tuple attribute.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, Outcome> {
        &self.attributes
    }

    /// Nested outcome of a single Tuple attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Outcome> {
        self.attributes.get(name)
    }

    /// Stores a detached copy of an attribute's outcome; recorded outcomes
    /// never carry a context snapshot of their own.
    pub(crate) fn record_attribute(&mut self, name: &str, outcome: Outcome) {
        let name = self.scoped_key(name);
        self.attributes.insert(name, outcome.detached());
    }

    /// Runs `f` with `segment` appended to the key path of nested steps
    /// and attributes.
    pub(crate) fn scoped<R>(&mut self, segment: String, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scope.push(segment);
        let result = f(self);
        self.scope.pop();
        result
    }

    fn scoped_key(&self, key: &str) -> String {
        if self.scope.is_empty() {
            return key.to_owned();
        }
        let mut path = self.scope.join(".");
        path.push('.');
        path.push_str(key);
        path
    }

    /// Identities of the validators a Pipe went through, consecutive
    /// duplicates collapsed.
    #[must_use]
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    pub(crate) fn push_trail(&mut self, validator: &str) {
        if self.trail.last().map(String::as_str) != Some(validator) {
            self.trail.push(validator.to_owned());
        }
    }

    /// Child context for an isolated evaluation: sees this context's entries
    /// but starts with no errors, steps, attributes or trail.
    pub(crate) fn fork(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            scope: self.scope.clone(),
            ..Self::default()
        }
    }

    /// Merges the diagnostics of a child context into this one.
    ///
    /// Entries, steps and attributes of `child` shadow identical keys. Error
    /// records are not merged here; the caller appends them explicitly so
    /// their order stays under its control.
    pub(crate) fn absorb(&mut self, child: Self) {
        self.entries.extend(child.entries);
        self.steps.extend(child.steps);
        self.attributes.extend(child.attributes);
        for validator in &child.trail {
            self.push_trail(validator);
        }
    }
}

// ============================================================================
// CONTEXT BUILDER
// ============================================================================

/// Builder for a pre-populated root context.
///
/// ```rust
/// use refined::foundation::ContextBuilder;
///
/// let ctx = ContextBuilder::new()
///     .with("locale", "ru")
///     .with("strict", true)
///     .build();
///
/// assert_eq!(ctx.get_str("locale"), Some("ru"));
/// ```
#[derive(Debug, Default)]
pub struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key, value);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> Context {
        self.context
    }
}
