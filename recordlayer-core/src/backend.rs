//! Storage backend abstraction for the record store.
//!
//! This module defines the traits that abstract over storage implementations. The
//! [`RecordStore`](crate::store::RecordStore) talks to its backend exclusively through
//! serialized BSON documents, which is what keeps callers' record values independent of
//! the stored copies.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Ordering
//!
//! A collection is an ordered sequence. Inserts append, upserts replace in place, and
//! every read returns documents in that order unless the query asks for a sort.

use bson::Bson;
use std::fmt::Debug;

use crate::{
    error::RecordResult,
    query::{Expr, Query},
    record::RecordId,
};

/// Abstract interface for record storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The operations are synchronous and never block
/// on anything but the backend's own locks.
///
/// # Error Handling
///
/// Operations return [`RecordResult<T>`](crate::error::RecordResult). Each method lists
/// the variants it may return.
pub trait StoreBackend: Send + Sync + Debug {
    /// Appends documents to a collection, creating the collection if needed.
    ///
    /// Returns [`RecordError::AlreadyExists`](crate::error::RecordError::AlreadyExists)
    /// if an identity is already stored; documents before it in the batch stay inserted.
    fn insert_documents(
        &self,
        documents: Vec<(RecordId, Bson)>,
        collection: &str,
    ) -> RecordResult<()>;

    /// Replaces the document with the same identity in place, or appends it.
    fn upsert_document(&self, id: RecordId, document: Bson, collection: &str) -> RecordResult<()>;

    /// Deletes documents by identity.
    ///
    /// Returns [`RecordError::NotFound`](crate::error::RecordError::NotFound) for the
    /// first identity that is not stored. An empty batch always succeeds.
    fn delete_documents(&self, ids: Vec<RecordId>, collection: &str) -> RecordResult<()>;

    /// Retrieves documents by identity, in store order. Unknown identities are skipped.
    fn get_documents(&self, ids: Vec<RecordId>, collection: &str) -> RecordResult<Vec<Bson>>;

    /// Returns the documents matching `query`.
    fn query_documents(&self, query: &Query, collection: &str) -> RecordResult<Vec<Bson>>;

    /// Counts the documents matching `filter` without copying them.
    fn count_documents(&self, filter: Option<&Expr>, collection: &str) -> RecordResult<usize>;

    /// Returns the next identity of the collection's sequence.
    ///
    /// Sequences only move forward; clearing or resetting collections does not rewind them.
    /// Identities already stored in the collection, for instance through an identity
    /// override, are skipped.
    fn next_identity(&self, collection: &str) -> RecordResult<RecordId>;

    /// Creates an empty collection. Existing collections are left untouched.
    fn create_collection(&self, name: &str) -> RecordResult<()>;

    /// Removes every document from one collection.
    fn clear_collection(&self, name: &str) -> RecordResult<()>;

    /// Lists the names of known collections.
    fn list_collections(&self) -> RecordResult<Vec<String>>;

    /// Removes every document from every collection.
    fn reset(&self) -> RecordResult<()>;
}

/// Factory for [`StoreBackend`] implementations.
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Builds and returns the configured backend.
    fn build(self) -> RecordResult<Self::Backend>;
}
