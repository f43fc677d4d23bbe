//! Declarative property descriptors for record fields.
//!
//! A [`Property`] describes one field of a record type: its name, its default value, which
//! accessors are enabled, and the ordered validator chain every write must pass. Record
//! types keep the backing value in an ordinary struct field and route their accessors
//! through a static descriptor:
//!
//! ```ignore
//! use once_cell::sync::Lazy;
//! use recordlayer::property::Property;
//! use recordlayer::validator::Email;
//!
//! static EMAIL: Lazy<Property<String>> =
//!     Lazy::new(|| Property::new("email", String::new()).validator(Email));
//!
//! impl Customer {
//!     pub fn set_email(&mut self, email: impl Into<String>) -> RecordResult<()> {
//!         EMAIL.assign(&mut self.email, email.into(), &mut self.meta)
//!     }
//! }
//! ```
//!
//! A [`Schema`] records the declared fields of a record type and the accessors enabled on
//! each. Each declaration is prepended, so the most recently declared field comes first.

use std::fmt;

use bson::ser::serialize_to_bson;
use serde::Serialize;

use crate::{
    error::{PropertyOperation, RecordError, RecordResult},
    record::{CREATED_AT, ID, Meta, UPDATED_AT},
    validator::{Validator, first_failure},
};

/// The set of accessors enabled on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
}

impl Access {
    /// Read, write and delete enabled.
    pub const FULL: Access = Access { read: true, write: true, delete: true };
    /// Only reads enabled.
    pub const READ_ONLY: Access = Access { read: true, write: false, delete: false };
    /// Reads and writes enabled, deletes disabled.
    pub const READ_WRITE: Access = Access { read: true, write: true, delete: false };
    /// Only writes enabled (e.g. secrets that are checked but never handed out).
    pub const WRITE_ONLY: Access = Access { read: false, write: true, delete: false };

    pub fn allows(&self, operation: PropertyOperation) -> bool {
        match operation {
            PropertyOperation::Read => self.read,
            PropertyOperation::Write => self.write,
            PropertyOperation::Delete => self.delete,
        }
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::FULL
    }
}

/// Descriptor of a managed record field.
pub struct Property<T> {
    name: &'static str,
    default: T,
    access: Access,
    validators: Vec<Box<dyn Validator>>,
}

impl<T> Property<T> {
    /// Creates a property with every accessor enabled and no validators.
    pub fn new(name: &'static str, default: T) -> Self {
        Self::declare(name, default, Access::FULL, Vec::new())
    }

    /// Creates a property from all of its parts at once.
    pub fn declare(
        name: &'static str,
        default: T,
        access: Access,
        validators: Vec<Box<dyn Validator>>,
    ) -> Self {
        Self { name, default, access, validators }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Disables writes and deletes.
    pub fn read_only(self) -> Self {
        self.with_access(Access::READ_ONLY)
    }

    /// Appends a validator to the end of the chain.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }

    fn ensure(&self, operation: PropertyOperation) -> RecordResult<()> {
        if self.access.allows(operation) {
            Ok(())
        } else {
            Err(RecordError::immutable(self.name, operation))
        }
    }

    /// Returns the value held in `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ImmutableProperty`] if reads are disabled.
    pub fn read<'a>(&self, slot: &'a T) -> RecordResult<&'a T> {
        self.ensure(PropertyOperation::Read)?;
        Ok(slot)
    }
}

impl<T: Serialize + Clone> Property<T> {
    /// Runs the validator chain against `value` without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Validation`] naming this property and the rejected value.
    pub fn validate(&self, value: &T) -> RecordResult<()> {
        if self.validators.is_empty() {
            return Ok(());
        }

        let candidate = serialize_to_bson(value)?;

        match first_failure(&self.validators, &candidate) {
            Some(_) => Err(RecordError::validation(self.name, candidate)),
            None => Ok(()),
        }
    }

    /// Validates `value` and stores it in `slot`. The slot is untouched on failure.
    ///
    /// This does not refresh `updated_at`; record constructors use it to populate fields.
    pub fn write(&self, slot: &mut T, value: T) -> RecordResult<()> {
        self.ensure(PropertyOperation::Write)?;
        self.validate(&value)?;
        *slot = value;
        Ok(())
    }

    /// Validates and stores `value`, then refreshes the record's `updated_at`.
    pub fn assign(&self, slot: &mut T, value: T, meta: &mut Meta) -> RecordResult<()> {
        self.write(slot, value)?;
        meta.touch();
        Ok(())
    }

    /// Restores the default value in `slot` and refreshes the record's `updated_at`.
    pub fn delete(&self, slot: &mut T, meta: &mut Meta) -> RecordResult<()> {
        self.ensure(PropertyOperation::Delete)?;
        *slot = self.default.clone();
        meta.touch();
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("access", &self.access)
            .field("validators", &self.validators)
            .finish()
    }
}

/// Declared fields of a record type, most recently declared first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<&'static str>,
    access: Vec<Access>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|declared| *declared == field)
    }

    /// Accessors enabled on the declared field `field`.
    pub fn access(&self, field: &str) -> Option<Access> {
        self.fields
            .iter()
            .position(|declared| *declared == field)
            .map(|index| self.access[index])
    }

    /// Whether `field` is declared with its read accessor enabled.
    pub fn is_readable(&self, field: &str) -> bool {
        self.access(field).is_some_and(|access| access.read)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: Vec<&'static str>,
    access: Vec<Access>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `property` at the front of the field list.
    pub fn declare<T>(mut self, property: &Property<T>) -> Self {
        self.fields.insert(0, property.name());
        self.access.insert(0, property.access());
        self
    }

    /// Declares `id`, `created_at` and `updated_at`, in that order.
    pub fn with_base_properties(self) -> Self {
        self.declare(&*ID)
            .declare(&*CREATED_AT)
            .declare(&*UPDATED_AT)
    }

    pub fn build(self) -> Schema {
        Schema { fields: self.fields, access: self.access }
    }
}
