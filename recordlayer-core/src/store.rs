//! The record store: the registry mapping record types to their collections.
//!
//! A [`RecordStore`] owns a [`StoreBackend`] and hands out typed
//! [`Collection`]s keyed by each record type's collection name. Its lifecycle is
//! explicit: create it with [`RecordStore::new`] or [`RecordStore::builder`], clear one
//! record type with [`Collection::clear`], or clear everything with
//! [`RecordStore::reset_all`].
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::{prelude::*, memory::InMemoryStore};
//!
//! let store = RecordStore::new(InMemoryStore::builder().build()?);
//! let tags = store.collection::<Tag>();
//! let tag = tags.create(TagArgs { name: "abc".into() })?;
//!
//! store.reset_all()?;
//! assert_eq!(tags.count(Query::new())?, 0);
//! ```

use std::fmt;

use crate::{
    backend::StoreBackend,
    collection::Collection,
    error::{RecordError, RecordResult},
    record::{Record, RecordId},
};

/// Registry of per-type record collections backed by a single [`StoreBackend`].
pub struct RecordStore {
    backend: Box<dyn StoreBackend>,
}

impl RecordStore {
    /// Creates a new record store with the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self { backend: Box::new(backend) }
    }

    pub fn builder() -> RecordStoreBuilder {
        RecordStoreBuilder::default()
    }

    /// Gets the typed collection for record type `R`.
    pub fn collection<R: Record>(&self) -> Collection<'_, R> {
        Collection::new(self)
    }

    /// Creates the collection for `R` ahead of its first write.
    pub fn register<R: Record>(&self) -> RecordResult<()> {
        self.backend.create_collection(R::collection_name())
    }

    /// Lists the collections known to the backend.
    pub fn list_collections(&self) -> RecordResult<Vec<String>> {
        self.backend.list_collections()
    }

    /// Empties every collection. Identity sequences keep counting from where they were.
    pub fn reset_all(&self) -> RecordResult<()> {
        tracing::debug!("resetting all collections");
        self.backend.reset()
    }

    /// Draws the next identity for `collection`.
    pub fn next_identity(&self, collection: &str) -> RecordResult<RecordId> {
        self.backend.next_identity(collection)
    }

    pub fn backend(&self) -> &dyn StoreBackend {
        self.backend.as_ref()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("backend", &self.backend)
            .finish()
    }
}

/// Builder for [`RecordStore`].
#[derive(Default)]
pub struct RecordStoreBuilder {
    backend: Option<Box<dyn StoreBackend>>,
}

impl RecordStoreBuilder {
    /// Sets the backend the store will use.
    pub fn backend(mut self, backend: impl StoreBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Builds the store.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Backend`] if no backend was configured.
    pub fn build(self) -> RecordResult<RecordStore> {
        match self.backend {
            Some(backend) => Ok(RecordStore { backend }),
            None => Err(RecordError::Backend("no backend configured".to_string())),
        }
    }
}
