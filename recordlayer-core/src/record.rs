//! Core traits and types for record representation and serialization.
//!
//! Every stored record embeds a [`Meta`] carrying its identity and timestamps, and
//! implements [`Record`] to tell the store how to name its collection, describe its
//! declared fields, and build itself from constructor arguments.
//!
//! # Example
//!
//! ```ignore
//! use once_cell::sync::Lazy;
//! use recordlayer::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! static NAME: Lazy<Property<String>> = Lazy::new(|| Property::new("name", String::new()));
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
//! ```

use std::{any::TypeId, fmt};

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::{
    clock,
    error::{RecordError, RecordResult},
    property::{Access, Property, Schema},
    store::RecordStore,
};

/// Identity of a record, unique within its record type.
pub type RecordId = i64;

/// The `id` base property. Never writable.
pub static ID: Lazy<Property<RecordId>> = Lazy::new(|| Property::new("id", 0).read_only());

/// The `created_at` base property. Fixed at construction.
pub static CREATED_AT: Lazy<Property<DateTime<Utc>>> =
    Lazy::new(|| Property::new("created_at", DateTime::<Utc>::default()).read_only());

/// The `updated_at` base property. Writable, but writing it does not refresh itself.
pub static UPDATED_AT: Lazy<Property<DateTime<Utc>>> = Lazy::new(|| {
    Property::new("updated_at", DateTime::<Utc>::default()).with_access(Access::READ_WRITE)
});

/// Identity and timestamps shared by every record.
///
/// Equality compares identities only; concrete records add their own fields on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    id: RecordId,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    updated_at: DateTime<Utc>,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Always fails: identities are assigned by the store.
    pub fn set_id(&mut self, id: RecordId) -> RecordResult<()> {
        ID.write(&mut self.id, id)
    }

    /// Always fails: `created_at` is fixed at construction.
    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) -> RecordResult<()> {
        CREATED_AT.write(&mut self.created_at, created_at)
    }

    /// Overwrites `updated_at`.
    ///
    /// `updated_at` never moves backwards: values earlier than the current one (and so
    /// earlier than `created_at`) are rejected.
    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) -> RecordResult<()> {
        if updated_at < self.updated_at.max(self.created_at) {
            return Err(RecordError::validation(
                UPDATED_AT.name(),
                Bson::String(updated_at.to_rfc3339()),
            ));
        }

        UPDATED_AT.write(&mut self.updated_at, updated_at)
    }

    /// Marks the record as modified now.
    ///
    /// The new `updated_at` is strictly later than the previous one.
    pub fn touch(&mut self) {
        let floor = self.updated_at + TimeDelta::nanoseconds(1);
        self.updated_at = clock::now().max(floor);
    }
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Meta {}

/// Construction overrides for [`Meta`].
///
/// Anything left unset is assigned by the store: the identity from the record type's
/// sequence, `created_at` from the clock, and `updated_at` equal to `created_at`.
#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    id: Option<RecordId>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl MetaBuilder {
    pub fn id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// The identity requested through [`MetaBuilder::id`], if any.
    pub fn requested_id(&self) -> Option<RecordId> {
        self.id
    }

    /// Builds the metadata, using `assigned_id` unless an identity was requested.
    ///
    /// An `updated_at` override earlier than `created_at` is raised to `created_at`.
    pub fn build(self, assigned_id: RecordId) -> Meta {
        let created_at = self.created_at.unwrap_or_else(clock::now);
        let updated_at = self
            .updated_at
            .map_or(created_at, |updated_at| updated_at.max(created_at));

        Meta {
            id: self.id.unwrap_or(assigned_id),
            created_at,
            updated_at,
        }
    }
}

/// Core trait that all records kept in a [`RecordStore`] must implement.
///
/// Records are plain values: the store keeps its own serialized copy, so a record obtained
/// from the store can be mutated freely and only affects the store once it is saved.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Constructor arguments, bound by name from keyed seed entries.
    type Args: DeserializeOwned;

    /// Returns the name of the collection this record type is stored in.
    fn collection_name() -> &'static str;

    /// Returns the declared fields of this record type.
    fn schema() -> &'static Schema;

    /// Names of the [`Record::Args`] fields in constructor order, used to bind positional
    /// seed entries.
    fn argument_names() -> &'static [&'static str];

    /// Builds a record around `meta`, populating fields through their property descriptors.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure raised by a field.
    fn construct(meta: Meta, args: Self::Args) -> RecordResult<Self>;

    fn meta(&self) -> &Meta;

    fn meta_mut(&mut self) -> &mut Meta;

    fn id(&self) -> RecordId {
        self.meta().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta().created_at()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.meta().updated_at()
    }
}

/// Extension trait providing serialization and persistence helpers for records.
///
/// This trait is automatically implemented for all types that implement [`Record`].
pub trait RecordExt: Record {
    /// Converts this record to a BSON document.
    fn to_bson(&self) -> RecordResult<Bson>;

    /// Creates a record from a BSON document.
    fn from_bson(bson: Bson) -> RecordResult<Self>;

    /// Converts this record to a JSON value.
    fn to_json(&self) -> RecordResult<Value>;

    /// Creates a record from a JSON value.
    fn from_json(value: Value) -> RecordResult<Self>;

    /// Renders the declared fields, most recently declared first, e.g.
    /// `tags[updated_at=..., created_at=..., id=1, name="abc"]`.
    ///
    /// Fields whose read accessor is disabled render as `null`.
    fn describe(&self) -> RecordResult<String>;

    /// Base-level equality: same record type and same identity.
    fn same_record<O: Record>(&self, other: &O) -> bool;

    /// Upserts this record into its collection.
    fn save(&self, store: &RecordStore) -> RecordResult<()>;

    /// Removes this record from its collection.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if the identity is not stored.
    fn remove(&self, store: &RecordStore) -> RecordResult<()>;
}

impl<R: Record> RecordExt for R {
    fn to_bson(&self) -> RecordResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> RecordResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> RecordResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> RecordResult<Self> {
        Ok(from_value(value)?)
    }

    fn describe(&self) -> RecordResult<String> {
        let json = self.to_json()?;
        let schema = Self::schema();
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let value = json
                    .get(field)
                    .filter(|_| schema.is_readable(field))
                    .unwrap_or(&Value::Null);
                format!("{field}={value}")
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("{}[{}]", Self::collection_name(), fields))
    }

    fn same_record<O: Record>(&self, other: &O) -> bool {
        TypeId::of::<Self>() == TypeId::of::<O>() && self.id() == other.id()
    }

    fn save(&self, store: &RecordStore) -> RecordResult<()> {
        store.collection::<Self>().save(self)
    }

    fn remove(&self, store: &RecordStore) -> RecordResult<()> {
        store.collection::<Self>().remove(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyOperation;

    static LABEL: Lazy<Property<String>> = Lazy::new(|| Property::new("label", String::new()));
    static SCHEMA: Lazy<Schema> =
        Lazy::new(|| Schema::builder().declare(&*LABEL).with_base_properties().build());

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sticker {
        #[serde(flatten)]
        meta: Meta,
        label: String,
    }

    #[derive(Debug, Deserialize)]
    struct StickerArgs {
        label: String,
    }

    impl Record for Sticker {
        type Args = StickerArgs;

        fn collection_name() -> &'static str {
            "stickers"
        }

        fn schema() -> &'static Schema {
            &SCHEMA
        }

        fn argument_names() -> &'static [&'static str] {
            &["label"]
        }

        fn construct(meta: Meta, args: StickerArgs) -> RecordResult<Self> {
            let mut sticker = Sticker { meta, label: LABEL.default_value().clone() };
            LABEL.write(&mut sticker.label, args.label)?;
            Ok(sticker)
        }

        fn meta(&self) -> &Meta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut Meta {
            &mut self.meta
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Badge {
        #[serde(flatten)]
        meta: Meta,
    }

    impl Record for Badge {
        type Args = ();

        fn collection_name() -> &'static str {
            "badges"
        }

        fn schema() -> &'static Schema {
            &SCHEMA
        }

        fn argument_names() -> &'static [&'static str] {
            &[]
        }

        fn construct(meta: Meta, _args: ()) -> RecordResult<Self> {
            Ok(Badge { meta })
        }

        fn meta(&self) -> &Meta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut Meta {
            &mut self.meta
        }
    }

    fn sticker(id: RecordId, label: &str) -> Sticker {
        Sticker::construct(Meta::builder().build(id), StickerArgs { label: label.to_string() })
            .unwrap()
    }

    #[test]
    fn construction_leaves_timestamps_equal() {
        let sticker = sticker(1, "abc");

        assert_eq!(sticker.created_at(), sticker.updated_at());
    }

    #[test]
    fn builder_overrides_are_respected() {
        let created_at = DateTime::from_timestamp_nanos(1_000);
        let meta = Meta::builder().id(9).created_at(created_at).build(1);

        assert_eq!(meta.id(), 9);
        assert_eq!(meta.created_at(), created_at);
        assert_eq!(meta.updated_at(), created_at);
    }

    #[test]
    fn builder_raises_early_updated_at() {
        let created_at = DateTime::from_timestamp_nanos(5_000);
        let meta = Meta::builder()
            .created_at(created_at)
            .updated_at(DateTime::from_timestamp_nanos(10))
            .build(1);

        assert_eq!(meta.updated_at(), created_at);
    }

    #[test]
    fn identity_and_created_at_cannot_be_set() {
        let mut meta = Meta::builder().build(3);
        let created_at = meta.created_at();

        assert_eq!(meta.set_id(123), Err(RecordError::immutable("id", PropertyOperation::Write)));
        assert_eq!(
            meta.set_created_at(clock::now()),
            Err(RecordError::immutable("created_at", PropertyOperation::Write))
        );
        assert_eq!(meta.id(), 3);
        assert_eq!(meta.created_at(), created_at);
    }

    #[test]
    fn updated_at_cannot_precede_created_at() {
        let mut meta = Meta::builder().build(1);

        let err = meta.set_updated_at(DateTime::from_timestamp_nanos(0)).unwrap_err();

        assert!(matches!(err, RecordError::Validation { .. }));
        assert_eq!(meta.updated_at(), meta.created_at());
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let mut meta = Meta::builder().build(1);
        let created_at = meta.created_at();
        meta.touch();
        let touched = meta.updated_at();

        let err = meta.set_updated_at(created_at).unwrap_err();

        assert!(matches!(err, RecordError::Validation { .. }));
        assert_eq!(meta.updated_at(), touched);
        assert_eq!(meta.set_updated_at(touched), Ok(()));
        assert_eq!(meta.set_updated_at(touched + TimeDelta::seconds(1)), Ok(()));
    }

    #[test]
    fn touch_is_strictly_increasing_even_after_future_override() {
        let future = clock::now() + TimeDelta::days(1);
        let mut meta = Meta::builder().created_at(future).build(1);

        meta.touch();

        assert!(meta.updated_at() > meta.created_at());
    }

    #[test]
    fn bson_round_trip_keeps_nanosecond_timestamps() {
        let mut touched = sticker(4, "abc");
        touched.meta.touch();

        let restored = Sticker::from_bson(touched.to_bson().unwrap()).unwrap();

        assert_eq!(restored.created_at(), touched.created_at());
        assert_eq!(restored.updated_at(), touched.updated_at());
        assert_eq!(restored.label, "abc");
    }

    #[test]
    fn serialized_record_is_flat() {
        let bson = sticker(2, "abc").to_bson().unwrap();
        let document = bson.as_document().unwrap();

        assert_eq!(document.get("id"), Some(&Bson::Int64(2)));
        assert_eq!(document.get("label"), Some(&Bson::String("abc".into())));
        assert!(document.get("meta").is_none());
    }

    #[test]
    fn describe_follows_schema_order() {
        let sticker = sticker(1, "abc");
        let description = sticker.describe().unwrap();

        assert!(description.starts_with("stickers[updated_at="));
        assert!(description.ends_with(", id=1, label=\"abc\"]"));
    }

    #[test]
    fn base_equality_requires_same_type_and_identity() {
        let first = sticker(1, "abc");
        let renamed = sticker(1, "xyz");
        let other = sticker(2, "abc");
        let badge = Badge::construct(Meta::builder().build(1), ()).unwrap();

        assert!(first.same_record(&renamed));
        assert!(!first.same_record(&other));
        assert!(!first.same_record(&badge));
    }
}
