//! In-memory storage implementation for record stores.
//!
//! Records are kept as BSON documents in insertion order, one ordered list per
//! collection, guarded by a read-write lock. Identity sequences live beside the data and
//! survive clears and resets.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use bson::Bson;
use parking_lot::{Mutex, RwLock};

use recordlayer_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{RecordError, RecordResult},
    query::{Expr, Query, SortDirection},
    record::RecordId,
};

use crate::evaluator::{RecordEvaluator, compare_at};

type CollectionRows = Vec<(RecordId, Bson)>;
type StoreMap = BTreeMap<String, CollectionRows>;

/// Thread-safe in-memory record storage backend.
///
/// `InMemoryStore` is cloneable and uses `Arc`-wrapped internal state. Clones share the
/// same underlying data and identity sequences.
///
/// # Performance
///
/// Queries scan every record in a collection, and lookups by identity are linear. This
/// backend is meant for tests, seeding, and small working sets.
///
/// # Example
///
/// ```ignore
/// use recordlayer_memory::InMemoryStore;
/// use recordlayer_core::backend::StoreBackend;
/// use bson::bson;
///
/// let store = InMemoryStore::new();
///
/// let id = store.next_identity("users")?;
/// store.insert_documents(vec![(id, bson!({ "id": id, "name": "Alice" }))], "users")?;
///
/// let docs = store.get_documents(vec![id], "users")?;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> records in store order
    store: Arc<RwLock<StoreMap>>,
    /// collection_name -> last identity handed out
    sequences: Arc<Mutex<HashMap<String, RecordId>>>,
    first_identity: RecordId,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty store whose sequences start at 1.
    pub fn new() -> Self {
        Self::with_first_identity(1)
    }

    fn with_first_identity(first_identity: RecordId) -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            sequences: Arc::new(Mutex::new(HashMap::new())),
            first_identity,
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// The identity each collection's sequence starts from.
    pub fn first_identity(&self) -> RecordId {
        self.first_identity
    }

    fn position(rows: &CollectionRows, id: RecordId) -> Option<usize> {
        rows.iter().position(|(stored, _)| *stored == id)
    }
}

impl StoreBackend for InMemoryStore {
    fn insert_documents(
        &self,
        documents: Vec<(RecordId, Bson)>,
        collection: &str,
    ) -> RecordResult<()> {
        let mut store = self.store.write();
        let rows = store.entry(collection.to_string()).or_default();

        for (id, doc) in documents {
            if Self::position(rows, id).is_some() {
                return Err(RecordError::AlreadyExists(id, collection.to_string()));
            }

            rows.push((id, doc));
        }

        tracing::debug!(collection, "inserted documents");

        Ok(())
    }

    fn upsert_document(&self, id: RecordId, document: Bson, collection: &str) -> RecordResult<()> {
        let mut store = self.store.write();
        let rows = store.entry(collection.to_string()).or_default();

        match Self::position(rows, id) {
            Some(index) => rows[index].1 = document,
            None => rows.push((id, document)),
        }

        tracing::debug!(collection, id, "upserted document");

        Ok(())
    }

    fn delete_documents(&self, ids: Vec<RecordId>, collection: &str) -> RecordResult<()> {
        let Some(&first) = ids.first() else {
            return Ok(());
        };

        let mut store = self.store.write();
        let rows = store
            .get_mut(collection)
            .ok_or_else(|| RecordError::not_found(first, collection))?;

        for id in ids {
            match Self::position(rows, id) {
                Some(index) => {
                    rows.remove(index);
                }
                None => return Err(RecordError::not_found(id, collection)),
            }

            tracing::debug!(collection, id, "deleted document");
        }

        Ok(())
    }

    fn get_documents(&self, ids: Vec<RecordId>, collection: &str) -> RecordResult<Vec<Bson>> {
        let store = self.store.read();
        let Some(rows) = store.get(collection) else {
            return Ok(vec![]);
        };

        Ok(rows
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn query_documents(&self, query: &Query, collection: &str) -> RecordResult<Vec<Bson>> {
        let store = self.store.read();
        let Some(rows) = store.get(collection) else {
            return Ok(vec![]);
        };

        let documents = rows.iter().map(|(_, doc)| doc);
        let mut matched = match &query.filter {
            Some(filter) => RecordEvaluator::filter_documents(documents, filter)?,
            None => documents.collect::<Vec<_>>(),
        };

        // Stable, so ties keep store order
        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| match sort.direction {
                SortDirection::Asc => compare_at(a, b, &sort.field),
                SortDirection::Desc => compare_at(b, a, &sort.field),
            });
        }

        Ok(matched
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn count_documents(&self, filter: Option<&Expr>, collection: &str) -> RecordResult<usize> {
        let store = self.store.read();
        let Some(rows) = store.get(collection) else {
            return Ok(0);
        };

        match filter {
            Some(filter) => {
                let mut count = 0;

                for (_, doc) in rows {
                    if RecordEvaluator::new(doc).evaluate(filter)? {
                        count += 1;
                    }
                }

                Ok(count)
            }
            None => Ok(rows.len()),
        }
    }

    fn next_identity(&self, collection: &str) -> RecordResult<RecordId> {
        let exhausted = || RecordError::Backend(format!("identity sequence exhausted for {collection}"));

        let mut sequences = self.sequences.lock();
        let mut next = match sequences.get(collection) {
            Some(last) => last.checked_add(1).ok_or_else(exhausted)?,
            None => self.first_identity,
        };

        // Identities pinned through overrides are skipped, never reissued
        if let Some(rows) = self.store.read().get(collection) {
            while Self::position(rows, next).is_some() {
                next = next.checked_add(1).ok_or_else(exhausted)?;
            }
        }

        sequences.insert(collection.to_string(), next);

        tracing::trace!(collection, id = next, "issued identity");

        Ok(next)
    }

    fn create_collection(&self, name: &str) -> RecordResult<()> {
        self.store.write().entry(name.to_string()).or_default();

        Ok(())
    }

    fn clear_collection(&self, name: &str) -> RecordResult<()> {
        if let Some(rows) = self.store.write().get_mut(name) {
            rows.clear();
        }

        tracing::debug!(collection = name, "cleared collection");

        Ok(())
    }

    fn list_collections(&self) -> RecordResult<Vec<String>> {
        Ok(self.store.read().keys().cloned().collect())
    }

    fn reset(&self) -> RecordResult<()> {
        for rows in self.store.write().values_mut() {
            rows.clear();
        }

        tracing::debug!("reset all collections");

        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use recordlayer_memory::InMemoryStore;
/// use recordlayer_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder()
///     .first_identity(100)
///     .collection("customers")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStoreBuilder {
    first_identity: RecordId,
    collections: Vec<String>,
}

impl Default for InMemoryStoreBuilder {
    fn default() -> Self {
        Self { first_identity: 1, collections: Vec::new() }
    }
}

impl InMemoryStoreBuilder {
    /// Sets the identity every collection's sequence starts from.
    pub fn first_identity(mut self, first_identity: RecordId) -> Self {
        self.first_identity = first_identity;
        self
    }

    /// Creates the named collection up front.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collections.push(name.into());
        self
    }
}

impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    fn build(self) -> RecordResult<Self::Backend> {
        let store = InMemoryStore::with_first_identity(self.first_identity);

        for name in &self.collections {
            store.create_collection(name)?;
        }

        tracing::debug!(
            first_identity = self.first_identity,
            collections = self.collections.len(),
            "built in-memory store"
        );

        Ok(store)
    }
}
