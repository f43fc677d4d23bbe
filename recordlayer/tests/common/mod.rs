#![allow(dead_code)]

use once_cell::sync::Lazy;
use recordlayer::{memory::InMemoryStore, prelude::*};
use serde::{Deserialize, Serialize};

pub fn store() -> RecordStore {
    recordlayer::logging::init_for_tests();

    RecordStore::new(InMemoryStore::new())
}

static NAME: Lazy<Property<String>> = Lazy::new(|| Property::new("name", String::new()));
static WIDGET_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Schema::builder().declare(&*NAME).with_base_properties().build());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(flatten)]
    meta: Meta,
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct WidgetArgs {
    pub name: String,
}

impl Widget {
    pub fn new(store: &RecordStore, name: impl Into<String>) -> RecordResult<Self> {
        store.collection::<Widget>().build(WidgetArgs { name: name.into() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> RecordResult<()> {
        NAME.assign(&mut self.name, name.into(), &mut self.meta)
    }

    pub fn clear_name(&mut self) -> RecordResult<()> {
        NAME.delete(&mut self.name, &mut self.meta)
    }

    pub fn set_id(&mut self, id: RecordId) -> RecordResult<()> {
        self.meta.set_id(id)
    }
}

impl Record for Widget {
    type Args = WidgetArgs;

    fn collection_name() -> &'static str {
        "widgets"
    }

    fn schema() -> &'static Schema {
        &WIDGET_SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["name"]
    }

    fn construct(meta: Meta, args: WidgetArgs) -> RecordResult<Self> {
        let mut widget = Widget { meta, name: NAME.default_value().clone() };
        NAME.write(&mut widget.name, args.name)?;
        Ok(widget)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

static PRICE: Lazy<Property<f64>> = Lazy::new(|| {
    Property::new("price", 0.0).validator(FnValidator::new("non_negative", |value: &Bson| {
        value.as_f64().is_some_and(|price| price >= 0.0)
    }))
});
static SKU: Lazy<Property<String>> =
    Lazy::new(|| Property::new("sku", "unassigned".to_string()).read_only());
static GADGET_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .declare(&*PRICE)
        .declare(&*SKU)
        .with_base_properties()
        .build()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gadget {
    #[serde(flatten)]
    meta: Meta,
    price: f64,
    sku: String,
}

#[derive(Debug, Deserialize)]
pub struct GadgetArgs {
    pub price: f64,
}

impl Gadget {
    pub fn new(store: &RecordStore, price: f64) -> RecordResult<Self> {
        store.collection::<Gadget>().build(GadgetArgs { price })
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) -> RecordResult<()> {
        PRICE.assign(&mut self.price, price, &mut self.meta)
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn set_sku(&mut self, sku: impl Into<String>) -> RecordResult<()> {
        SKU.assign(&mut self.sku, sku.into(), &mut self.meta)
    }
}

impl Record for Gadget {
    type Args = GadgetArgs;

    fn collection_name() -> &'static str {
        "gadgets"
    }

    fn schema() -> &'static Schema {
        &GADGET_SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["price"]
    }

    fn construct(meta: Meta, args: GadgetArgs) -> RecordResult<Self> {
        let mut gadget = Gadget {
            meta,
            price: *PRICE.default_value(),
            sku: SKU.default_value().clone(),
        };
        PRICE.write(&mut gadget.price, args.price)?;
        Ok(gadget)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
