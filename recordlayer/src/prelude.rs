//! Convenient re-exports of commonly used types from recordlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use recordlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - Record traits and base metadata
//! - Property descriptors and validators
//! - Store backends and builders
//! - Query construction and filtering
//! - Collection interfaces and error types

pub use recordlayer_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    error::{PropertyOperation, RecordError, RecordResult},
    property::{Access, Property, Schema, SchemaBuilder},
    query::{Expr, Filter, Predicate, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
    record::{Meta, MetaBuilder, Record, RecordExt, RecordId},
    store::{RecordStore, RecordStoreBuilder},
    validator::{Email, FnValidator, InstanceOf, NotNull, Validator},
};

pub use bson::{Bson, bson, doc, spec::ElementType};
