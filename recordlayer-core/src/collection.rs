//! Typed collections: the CRUD API for one record type.
//!
//! Records cross the collection boundary as serialized BSON in both directions. Every
//! record handed out is a fresh value, and every record handed in is copied into the
//! store, so callers can never alias a stored record. Changes to a record obtained from a
//! collection only take effect once it is saved.
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::prelude::*;
//!
//! let tags = store.collection::<Tag>();
//!
//! let first = tags.create(TagArgs { name: "abc".into() })?;
//! tags.seed([bson!(["abc 2"]), bson!({ "name": "abc" })])?;
//!
//! assert_eq!(tags.count(Filter::eq("name", "abc"))?, 2);
//! assert_eq!(tags.find_one(Filter::eq("name", "abc"))?, Some(first));
//! ```

use bson::{Bson, Document, de::deserialize_from_bson};
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    error::{RecordError, RecordResult},
    query::Query,
    record::{Meta, MetaBuilder, Record, RecordExt, RecordId},
    store::RecordStore,
};

/// A typed view of the collection holding records of type `R`.
#[derive(Debug)]
pub struct Collection<'a, R: Record> {
    store: &'a RecordStore,
    _marker: PhantomData<R>,
}

impl<'a, R: Record> Collection<'a, R> {
    pub(crate) fn new(store: &'a RecordStore) -> Self {
        Self { store, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &'static str {
        R::collection_name()
    }

    fn backend(&self) -> &'a dyn StoreBackend {
        self.store.backend()
    }

    /// Constructs a record without storing it.
    ///
    /// The identity is drawn from this collection's sequence and both timestamps are set to
    /// the same instant.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure raised while populating fields.
    pub fn build(&self, args: R::Args) -> RecordResult<R> {
        self.build_with(Meta::builder(), args)
    }

    /// Constructs a record without storing it, honoring identity and timestamp overrides.
    pub fn build_with(&self, meta: MetaBuilder, args: R::Args) -> RecordResult<R> {
        let id = match meta.requested_id() {
            Some(id) => id,
            None => self.store.next_identity(self.name())?,
        };

        R::construct(meta.build(id), args)
    }

    /// Constructs a record, appends it to the collection, and returns it.
    ///
    /// The returned value is independent of the stored copy.
    ///
    /// # Errors
    ///
    /// Returns a validation failure, or [`RecordError::AlreadyExists`] if an identity
    /// override collides with a stored record.
    pub fn create(&self, args: R::Args) -> RecordResult<R> {
        self.create_with(Meta::builder(), args)
    }

    /// Like [`Collection::create`], honoring identity and timestamp overrides.
    pub fn create_with(&self, meta: MetaBuilder, args: R::Args) -> RecordResult<R> {
        let record = self.build_with(meta, args)?;

        self.backend()
            .insert_documents(vec![(record.id(), record.to_bson()?)], self.name())?;

        tracing::debug!(collection = self.name(), id = record.id(), "created record");

        Ok(record)
    }

    /// Returns every stored record, in store order.
    pub fn all(&self) -> RecordResult<Vec<R>> {
        self.find(Query::new())
    }

    /// Returns the stored records matching `query`, in store order unless sorted.
    pub fn find(&self, query: impl Into<Query>) -> RecordResult<Vec<R>> {
        let query = query.into();

        tracing::trace!(collection = self.name(), ?query, "finding records");

        self.backend()
            .query_documents(&query, self.name())?
            .into_iter()
            .map(R::from_bson)
            .collect::<RecordResult<Vec<R>>>()
    }

    /// Returns the first stored record matching `query`, if any.
    pub fn find_one(&self, query: impl Into<Query>) -> RecordResult<Option<R>> {
        let mut query = query.into();
        query.limit = Some(1);

        Ok(self.find(query)?.into_iter().next())
    }

    /// Counts the stored records matching `query`.
    ///
    /// Only the filter is considered; sort, limit and offset are ignored.
    pub fn count(&self, query: impl Into<Query>) -> RecordResult<usize> {
        let query = query.into();

        self.backend()
            .count_documents(query.filter.as_ref(), self.name())
    }

    /// Returns the stored record with the given identity, if any.
    pub fn get(&self, id: RecordId) -> RecordResult<Option<R>> {
        Ok(self
            .backend()
            .get_documents(vec![id], self.name())?
            .into_iter()
            .next()
            .map(R::from_bson)
            .transpose()?)
    }

    /// Stores `record`, replacing the stored record with the same identity or appending it.
    pub fn save(&self, record: &R) -> RecordResult<()> {
        self.backend()
            .upsert_document(record.id(), record.to_bson()?, self.name())?;

        tracing::debug!(collection = self.name(), id = record.id(), "saved record");

        Ok(())
    }

    /// Removes the stored record with the same identity as `record`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no such record is stored.
    pub fn remove(&self, record: &R) -> RecordResult<()> {
        self.backend()
            .delete_documents(vec![record.id()], self.name())?;

        tracing::debug!(collection = self.name(), id = record.id(), "removed record");

        Ok(())
    }

    /// Removes every record of this type. Other collections are untouched.
    pub fn clear(&self) -> RecordResult<()> {
        self.backend().clear_collection(self.name())
    }

    /// Creates one record per entry and returns them in input order.
    ///
    /// A BSON document binds its keys to constructor arguments by name. A BSON array
    /// binds its items positionally, in [`Record::argument_names`] order. Entries are
    /// created one at a time, so records created before a failing entry stay stored.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidSeedData`] for any other entry shape, for a document
    /// with a key that names no constructor argument, or for an array whose length differs
    /// from the constructor's argument count.
    pub fn seed(&self, entries: impl IntoIterator<Item = Bson>) -> RecordResult<Vec<R>> {
        let mut created = Vec::new();

        for entry in entries {
            let args = match entry {
                Bson::Document(fields) => Self::bind_keyed(fields)?,
                Bson::Array(values) => Self::bind_positional(values)?,
                other => {
                    tracing::warn!(collection = self.name(), entry = %other, "rejected seed entry");
                    return Err(RecordError::InvalidSeedData(other.to_string()));
                }
            };

            created.push(self.create(args)?);
        }

        tracing::debug!(collection = self.name(), count = created.len(), "seeded records");

        Ok(created)
    }

    fn bind_keyed(fields: Document) -> RecordResult<R::Args> {
        let names = R::argument_names();

        if let Some(unknown) = fields.keys().find(|key| !names.contains(&key.as_str())) {
            return Err(RecordError::InvalidSeedData(format!(
                "unknown argument {unknown:?} for {}",
                R::collection_name(),
            )));
        }

        Ok(deserialize_from_bson(Bson::Document(fields))?)
    }

    fn bind_positional(values: Vec<Bson>) -> RecordResult<R::Args> {
        let names = R::argument_names();

        if values.len() != names.len() {
            return Err(RecordError::InvalidSeedData(format!(
                "{} positional values for {} arguments of {}",
                values.len(),
                names.len(),
                R::collection_name(),
            )));
        }

        let fields = names
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value))
            .collect::<Document>();

        Self::bind_keyed(fields)
    }
}
