use chrono::NaiveDate;
use once_cell::sync::Lazy;
use recordlayer::prelude::*;
use serde::{Deserialize, Serialize};

use crate::plan::Plan;

// Dates serialize as ISO-8601 strings.
static RENEWAL_DATE: Lazy<Property<Option<NaiveDate>>> = Lazy::new(|| {
    Property::new("renewal_date", None).validator(InstanceOf::new(ElementType::String))
});
static PLAN: Lazy<Property<Option<Plan>>> = Lazy::new(|| Property::new("plan", None));
static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .declare(&*PLAN)
        .declare(&*RENEWAL_DATE)
        .with_base_properties()
        .build()
});

/// A customer's subscription to a plan, embedding a copy of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(flatten)]
    meta: Meta,
    renewal_date: Option<NaiveDate>,
    plan: Option<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionArgs {
    pub renewal_date: Option<NaiveDate>,
    pub plan: Option<Plan>,
}

impl Subscription {
    /// Builds an unsaved subscription. The renewal date is required.
    pub fn new(
        store: &RecordStore,
        renewal_date: Option<NaiveDate>,
        plan: Option<Plan>,
    ) -> RecordResult<Self> {
        store
            .collection::<Subscription>()
            .build(SubscriptionArgs { renewal_date, plan })
    }

    pub fn renewal_date(&self) -> Option<NaiveDate> {
        self.renewal_date
    }

    pub fn set_renewal_date(&mut self, renewal_date: Option<NaiveDate>) -> RecordResult<()> {
        RENEWAL_DATE.assign(&mut self.renewal_date, renewal_date, &mut self.meta)
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn set_plan(&mut self, plan: Option<Plan>) -> RecordResult<()> {
        PLAN.assign(&mut self.plan, plan, &mut self.meta)
    }
}

impl Record for Subscription {
    type Args = SubscriptionArgs;

    fn collection_name() -> &'static str {
        "subscriptions"
    }

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["renewal_date", "plan"]
    }

    fn construct(meta: Meta, args: SubscriptionArgs) -> RecordResult<Self> {
        let mut subscription = Subscription {
            meta,
            renewal_date: *RENEWAL_DATE.default_value(),
            plan: PLAN.default_value().clone(),
        };
        RENEWAL_DATE.write(&mut subscription.renewal_date, args.renewal_date)?;
        PLAN.write(&mut subscription.plan, args.plan)?;
        Ok(subscription)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
