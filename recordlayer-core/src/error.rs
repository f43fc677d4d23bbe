//! Error types and result types for record store operations.
//!
//! Every fallible operation in this crate returns [`RecordResult<T>`]. Errors are raised
//! at the point of failure and never retried or swallowed: a rejected property write
//! leaves the record exactly as it was before the call.

use std::fmt;

use bson::{Bson, error::Error as BsonError};
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::record::RecordId;

/// The accessor a property operation attempted to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOperation {
    /// Reading the current value.
    Read,
    /// Assigning a new value.
    Write,
    /// Clearing the value back to its default.
    Delete,
}

impl fmt::Display for PropertyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyOperation::Read => f.write_str("read"),
            PropertyOperation::Write => f.write_str("write"),
            PropertyOperation::Delete => f.write_str("delete"),
        }
    }
}

/// Represents all possible errors that can occur when working with records and their stores.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A property write failed its validator chain.
    ///
    /// `value` is the serialized form of the rejected candidate.
    #[error("Invalid value for property {field}: {value}")]
    Validation {
        /// The property that rejected the value.
        field: String,
        /// The rejected value.
        value: Bson,
    },
    /// A write, delete or read was attempted on a property declared without that capability.
    #[error("Property {field} does not allow {operation}")]
    ImmutableProperty {
        /// The property that was accessed.
        field: String,
        /// The disabled operation.
        operation: PropertyOperation,
    },
    /// No record with the given identity exists in the collection.
    /// The first argument is the record identity, the second is the collection name.
    #[error("Record {0} not found in collection {1}")]
    NotFound(RecordId, String),
    /// A record with the given identity is already stored in the collection.
    /// The first argument is the record identity, the second is the collection name.
    #[error("Record {0} already exists in collection {1}")]
    AlreadyExists(RecordId, String),
    /// A seed entry was neither a keyed document nor a positional array.
    #[error("Invalid seed data: {0}. Required a document or an array")]
    InvalidSeedData(String),
    /// Serialization/deserialization error when converting between record formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl RecordError {
    pub fn validation(field: impl Into<String>, value: Bson) -> Self {
        Self::Validation { field: field.into(), value }
    }

    pub fn immutable(field: impl Into<String>, operation: PropertyOperation) -> Self {
        Self::ImmutableProperty { field: field.into(), operation }
    }

    pub fn not_found(id: RecordId, collection: impl Into<String>) -> Self {
        Self::NotFound(id, collection.into())
    }
}

/// A specialized `Result` type for record store operations.
pub type RecordResult<T> = Result<T, RecordError>;

impl From<BsonError> for RecordError {
    fn from(err: BsonError) -> Self {
        RecordError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for RecordError {
    fn from(err: SerdeJsonError) -> Self {
        RecordError::Serialization(err.to_string())
    }
}
