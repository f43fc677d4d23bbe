//! In-memory record storage backend for recordlayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! Collections are ordered sequences of BSON documents behind a `parking_lot` read-write
//! lock, and each collection draws identities from its own sequence.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and exclusive writes through an RwLock
//! - **Ordered storage** - Records keep insertion order; upserts replace in place
//! - **Full query support** - Filtering on dotted paths, stable sorting, and pagination
//! - **Monotonic identities** - Per-collection sequences that survive resets
//!
//! # Quick Start
//!
//! ```ignore
//! use recordlayer::{prelude::*, memory::InMemoryStore};
//!
//! let store = RecordStore::new(InMemoryStore::builder().build()?);
//! let tags = store.collection::<Tag>();
//!
//! tags.create(TagArgs { name: "abc".into() })?;
//! assert_eq!(tags.count(Filter::eq("name", "abc"))?, 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
