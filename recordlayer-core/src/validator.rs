//! Value validators used by property descriptors.
//!
//! A validator is a single-value predicate over the serialized (BSON) form of a candidate
//! value. Property descriptors hold an ordered chain of validators and reject a write at
//! the first one that fails.
//!
//! # Built-in validators
//!
//! - [`NotNull`] - rejects `null`
//! - [`InstanceOf`] - defers to [`NotNull`], then checks the BSON element type
//! - [`Email`] - loose email shape check on strings
//! - [`FnValidator`] - a named closure
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::validator::{InstanceOf, Validator};
//! use bson::{Bson, spec::ElementType};
//!
//! let validator = InstanceOf::new(ElementType::String);
//! assert!(validator.validate(&Bson::String("abc".into())));
//! assert!(!validator.validate(&Bson::Null));
//! ```

use std::fmt;

use bson::{Bson, spec::ElementType};
use once_cell::sync::Lazy;
use regex::Regex;

/// A single-value predicate evaluated before a property write is accepted.
pub trait Validator: Send + Sync {
    /// Returns `true` if `value` is acceptable.
    fn validate(&self, value: &Bson) -> bool;

    /// Short label used when describing a validator chain.
    fn name(&self) -> &str;
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejects `null` (including unset optional values).
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl Validator for NotNull {
    fn validate(&self, value: &Bson) -> bool {
        !matches!(value, Bson::Null)
    }

    fn name(&self) -> &str {
        "not_null"
    }
}

/// Accepts non-null values whose BSON element type is one of the configured types.
#[derive(Debug, Clone)]
pub struct InstanceOf {
    not_null: NotNull,
    accepted: Vec<ElementType>,
}

impl InstanceOf {
    /// Accepts values of exactly one element type.
    pub fn new(accepted: ElementType) -> Self {
        Self::any_of([accepted])
    }

    /// Accepts values of any of the given element types.
    pub fn any_of(accepted: impl IntoIterator<Item = ElementType>) -> Self {
        Self {
            not_null: NotNull,
            accepted: accepted.into_iter().collect(),
        }
    }

    /// Accepts any integer width.
    pub fn integer() -> Self {
        Self::any_of([ElementType::Int32, ElementType::Int64])
    }

    pub fn accepted(&self) -> &[ElementType] {
        &self.accepted
    }
}

impl Validator for InstanceOf {
    fn validate(&self, value: &Bson) -> bool {
        self.not_null.validate(value) && self.accepted.contains(&value.element_type())
    }

    fn name(&self) -> &str {
        "instance_of"
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9._+\-]+@[a-z0-9._\-]").expect("valid email regex"));

/// Loose email shape check: a local part of alphanumerics, `.`, `-`, `_` or `+`, an `@`,
/// and at least one character of the domain.
///
/// The rest of the domain is not validated, so `"a@b"` and `"a@b..."` both pass.
/// Non-string values are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator for Email {
    fn validate(&self, value: &Bson) -> bool {
        match value {
            Bson::String(candidate) => EMAIL_RE.is_match(candidate),
            _ => false,
        }
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// A validator backed by a closure.
///
/// # Example
///
/// ```ignore
/// let non_negative = FnValidator::new("non_negative", |value: &Bson| {
///     value.as_f64().is_some_and(|price| price >= 0.0)
/// });
/// ```
pub struct FnValidator<F> {
    name: &'static str,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Bson) -> bool + Send + Sync,
{
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Bson) -> bool + Send + Sync,
{
    fn validate(&self, value: &Bson) -> bool {
        (self.check)(value)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Runs `validators` in order and returns the position of the first one that rejects `value`.
pub fn first_failure(validators: &[Box<dyn Validator>], value: &Bson) -> Option<usize> {
    validators
        .iter()
        .position(|validator| !validator.validate(value))
}
