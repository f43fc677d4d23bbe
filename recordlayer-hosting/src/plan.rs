use once_cell::sync::Lazy;
use recordlayer::prelude::*;
use serde::{Deserialize, Serialize};

static NAME: Lazy<Property<String>> = Lazy::new(|| {
    Property::new("name", String::new()).validator(InstanceOf::new(ElementType::String))
});
static PRICE: Lazy<Property<f64>> = Lazy::new(|| {
    Property::new("price", 0.0)
        .validator(InstanceOf::new(ElementType::Double))
        .validator(FnValidator::new("non_negative", |value: &Bson| {
            value.as_f64().is_some_and(|price| price >= 0.0)
        }))
});
static NUMBER_WEBSITES: Lazy<Property<i64>> = Lazy::new(|| {
    Property::new("number_websites", 0)
        .validator(InstanceOf::integer())
        .validator(FnValidator::new("non_negative", |value: &Bson| {
            value.as_i64().is_some_and(|count| count >= 0)
        }))
});
static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .declare(&*NUMBER_WEBSITES)
        .declare(&*PRICE)
        .declare(&*NAME)
        .with_base_properties()
        .build()
});

/// A hosting plan: what a subscription costs and how many websites it allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(flatten)]
    meta: Meta,
    name: String,
    price: f64,
    number_websites: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlanArgs {
    pub name: String,
    pub price: f64,
    pub number_websites: i64,
}

impl Plan {
    /// Builds an unsaved plan.
    pub fn new(
        store: &RecordStore,
        name: impl Into<String>,
        price: f64,
        number_websites: i64,
    ) -> RecordResult<Self> {
        store.collection::<Plan>().build(PlanArgs {
            name: name.into(),
            price,
            number_websites,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> RecordResult<()> {
        NAME.assign(&mut self.name, name.into(), &mut self.meta)
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) -> RecordResult<()> {
        PRICE.assign(&mut self.price, price, &mut self.meta)
    }

    /// Maximum number of websites a subscriber may register.
    pub fn number_websites(&self) -> i64 {
        self.number_websites
    }

    pub fn set_number_websites(&mut self, number_websites: i64) -> RecordResult<()> {
        NUMBER_WEBSITES.assign(&mut self.number_websites, number_websites, &mut self.meta)
    }
}

impl Record for Plan {
    type Args = PlanArgs;

    fn collection_name() -> &'static str {
        "plans"
    }

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["name", "price", "number_websites"]
    }

    fn construct(meta: Meta, args: PlanArgs) -> RecordResult<Self> {
        let mut plan = Plan {
            meta,
            name: NAME.default_value().clone(),
            price: *PRICE.default_value(),
            number_websites: *NUMBER_WEBSITES.default_value(),
        };
        NAME.write(&mut plan.name, args.name)?;
        PRICE.write(&mut plan.price, args.price)?;
        NUMBER_WEBSITES.write(&mut plan.number_websites, args.number_websites)?;
        Ok(plan)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
