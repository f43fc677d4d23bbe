use once_cell::sync::Lazy;
use recordlayer::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    customer::Customer,
    error::{HostingError, HostingResult},
};

static URL: Lazy<Property<String>> = Lazy::new(|| {
    Property::new("url", String::new())
        .validator(InstanceOf::new(ElementType::String))
        .validator(FnValidator::new("non_empty", |value: &Bson| {
            value.as_str().is_some_and(|url| !url.trim().is_empty())
        }))
});
static CUSTOMER: Lazy<Property<Option<Customer>>> =
    Lazy::new(|| Property::new("customer", None));
static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .declare(&*CUSTOMER)
        .declare(&*URL)
        .with_base_properties()
        .build()
});

/// A website hosted for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    #[serde(flatten)]
    meta: Meta,
    url: String,
    customer: Option<Customer>,
}

#[derive(Debug, Deserialize)]
pub struct WebsiteArgs {
    pub url: String,
    pub customer: Option<Customer>,
}

impl Website {
    /// Builds an unsaved website.
    pub fn new(
        store: &RecordStore,
        url: impl Into<String>,
        customer: Option<Customer>,
    ) -> RecordResult<Self> {
        store.collection::<Website>().build(WebsiteArgs { url: url.into(), customer })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> RecordResult<()> {
        URL.assign(&mut self.url, url.into(), &mut self.meta)
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Option<Customer>) -> RecordResult<()> {
        CUSTOMER.assign(&mut self.customer, customer, &mut self.meta)
    }

    /// Stored websites owned by `customer`.
    pub fn owned_by(store: &RecordStore, customer: &Customer) -> RecordResult<Vec<Website>> {
        store
            .collection::<Website>()
            .find(Filter::eq("customer.id", customer.id()))
    }

    /// Registers and stores a website for `customer`, enforcing the plan's website limit.
    ///
    /// # Errors
    ///
    /// - [`HostingError::SubscriptionRequired`] if the customer has no subscription
    /// - [`HostingError::InvalidPlan`] if the subscription carries no plan
    /// - [`HostingError::WebsiteLimitReached`] if the customer already has as many
    ///   stored websites as the plan allows
    pub fn register(
        store: &RecordStore,
        url: impl Into<String>,
        customer: &Customer,
    ) -> HostingResult<Website> {
        let subscription = customer
            .subscription()
            .ok_or(HostingError::SubscriptionRequired(customer.id()))?;
        let plan = subscription
            .plan()
            .ok_or(HostingError::InvalidPlan(subscription.id()))?;

        let websites = store.collection::<Website>();
        let registered = websites.count(Filter::eq("customer.id", customer.id()))?;

        if registered as i64 >= plan.number_websites() {
            tracing::warn!(
                customer = customer.id(),
                limit = plan.number_websites(),
                "website limit reached"
            );
            return Err(HostingError::WebsiteLimitReached {
                customer: customer.id(),
                limit: plan.number_websites(),
            });
        }

        Ok(websites.create(WebsiteArgs {
            url: url.into(),
            customer: Some(customer.clone()),
        })?)
    }
}

impl Record for Website {
    type Args = WebsiteArgs;

    fn collection_name() -> &'static str {
        "websites"
    }

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["url", "customer"]
    }

    fn construct(meta: Meta, args: WebsiteArgs) -> RecordResult<Self> {
        let mut website = Website {
            meta,
            url: URL.default_value().clone(),
            customer: CUSTOMER.default_value().clone(),
        };
        URL.write(&mut website.url, args.url)?;
        CUSTOMER.write(&mut website.customer, args.customer)?;
        Ok(website)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
