//! A minimal in-process record layer: typed records with identity, timestamps, and
//! validated properties, kept in per-type collections.
//!
//! This crate is the core of the recordlayer project and provides:
//!
//! - **Records** ([`record`]) - The record trait, base metadata, and serialization helpers
//! - **Properties** ([`property`]) - Field descriptors with access rules, defaults, and validators
//! - **Validators** ([`validator`]) - Reusable value checks run before a field is written
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Query and filtering API** ([`query`]) - Predicates, filter expressions, sorting
//! - **Collections interface** ([`collection`]) - Typed create, find, count, save, remove, seed
//! - **Record store** ([`store`]) - The registry handing out collections per record type
//! - **Error handling** ([`error`]) - Error types and result types
//! - **Clock** ([`clock`]) - Strictly monotonic timestamps
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::{prelude::*, memory::InMemoryStore};
//!
//! let store = RecordStore::new(InMemoryStore::builder().build()?);
//! let tags = store.collection::<Tag>();
//!
//! let tag = tags.create(TagArgs { name: "abc".into() })?;
//! assert_eq!(tag.id(), 1);
//! assert_eq!(tags.find(Filter::eq("name", "abc"))?, vec![tag]);
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_core;

pub mod backend;
pub mod clock;
pub mod collection;
pub mod error;
pub mod property;
pub mod query;
pub mod record;
pub mod store;
pub mod validator;
