//! Main recordlayer crate providing typed, validated, in-process records.
//!
//! This crate is the primary entry point for users of recordlayer. It re-exports the core
//! types from the sub-crates and provides access to the in-memory backend.
//!
//! # Features
//!
//! - **Automatic identity and timestamps** - Every record carries a per-type identity and
//!   `created_at`/`updated_at` timestamps
//! - **Declarative properties** - Field descriptors with defaults, access rules, and validators
//! - **Value semantics** - Records are copied in and out of the store, never aliased
//! - **Flexible querying** - Predicates, logical combinators, sorting, and pagination
//!
//! # Quick Start
//!
//! ```ignore
//! use once_cell::sync::Lazy;
//! use recordlayer::{prelude::*, memory::InMemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! static NAME: Lazy<Property<String>> = Lazy::new(|| {
//!     Property::new("name", String::new()).validator(InstanceOf::new(ElementType::String))
//! });
//! static SCHEMA: Lazy<Schema> =
//!     Lazy::new(|| Schema::builder().declare(&*NAME).with_base_properties().build());
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Tag {
//!     #[serde(flatten)]
//!     meta: Meta,
//!     name: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! pub struct TagArgs {
//!     pub name: String,
//! }
//!
//! impl Record for Tag {
//!     type Args = TagArgs;
//!
//!     fn collection_name() -> &'static str { "tags" }
//!     fn schema() -> &'static Schema { &SCHEMA }
//!     fn argument_names() -> &'static [&'static str] { &["name"] }
//!
//!     fn construct(meta: Meta, args: TagArgs) -> RecordResult<Self> {
//!         let mut tag = Tag { meta, name: NAME.default_value().clone() };
//!         NAME.write(&mut tag.name, args.name)?;
//!         Ok(tag)
//!     }
//!
//!     fn meta(&self) -> &Meta { &self.meta }
//!     fn meta_mut(&mut self) -> &mut Meta { &mut self.meta }
//! }
//!
//! fn main() -> RecordResult<()> {
//!     recordlayer::logging::init();
//!
//!     let store = RecordStore::new(InMemoryStore::builder().build()?);
//!     let tags = store.collection::<Tag>();
//!
//!     tags.seed([bson!(["abc"]), bson!(["abc2"]), bson!({ "name": "abc" })])?;
//!
//!     assert_eq!(tags.count(Filter::eq("name", "abc"))?, 2);
//!     assert_eq!(tags.find_one(Filter::eq("name", "abc2"))?.map(|tag| tag.id()), Some(2));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for applications, tests, and seeding

pub mod prelude;

pub use recordlayer_core::{backend, clock, collection, error, property, query, record, store, validator};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use recordlayer_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// Process-wide `tracing` subscriber setup.
///
/// Library code only emits events; applications and tests opt into output here. The
/// filter is read from `RUST_LOG` and defaults to `warn`.
pub mod logging {
    use tracing_subscriber::EnvFilter;

    fn filter() -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    /// Installs a formatted subscriber writing to stderr.
    ///
    /// Safe to call multiple times (subsequent calls are no-ops).
    pub fn init() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Installs a subscriber whose output is captured by the test harness.
    ///
    /// Safe to call from every test.
    pub fn init_for_tests() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_test_writer()
            .try_init();
    }
}
