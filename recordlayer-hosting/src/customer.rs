use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use recordlayer::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{HostingError, HostingResult},
    plan::Plan,
    subscription::{Subscription, SubscriptionArgs},
};

static NAME: Lazy<Property<String>> = Lazy::new(|| {
    Property::new("name", String::new()).validator(InstanceOf::new(ElementType::String))
});
static PASSWORD: Lazy<Property<String>> =
    Lazy::new(|| Property::new("password", String::new()).with_access(Access::WRITE_ONLY));
static EMAIL: Lazy<Property<String>> =
    Lazy::new(|| Property::new("email", String::new()).validator(Email));
static SUBSCRIPTION: Lazy<Property<Option<Subscription>>> =
    Lazy::new(|| Property::new("subscription", None));
static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .declare(&*SUBSCRIPTION)
        .declare(&*EMAIL)
        .declare(&*PASSWORD)
        .declare(&*NAME)
        .with_base_properties()
        .build()
});

/// A hosting customer, optionally subscribed to a plan.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    meta: Meta,
    name: String,
    password: String,
    email: String,
    subscription: Option<Subscription>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerArgs {
    pub name: String,
    pub password: String,
    pub email: String,
    pub subscription: Option<Subscription>,
}

impl Customer {
    /// Builds an unsaved customer.
    pub fn new(
        store: &RecordStore,
        name: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        subscription: Option<Subscription>,
    ) -> RecordResult<Self> {
        store.collection::<Customer>().build(CustomerArgs {
            name: name.into(),
            password: password.into(),
            email: email.into(),
            subscription,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> RecordResult<()> {
        NAME.assign(&mut self.name, name.into(), &mut self.meta)
    }

    /// Always fails: passwords can be set and verified but never read back.
    pub fn password(&self) -> RecordResult<&str> {
        PASSWORD.read(&self.password).map(String::as_str)
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> RecordResult<()> {
        PASSWORD.assign(&mut self.password, password.into(), &mut self.meta)
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> RecordResult<()> {
        EMAIL.assign(&mut self.email, email.into(), &mut self.meta)
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn set_subscription(&mut self, subscription: Option<Subscription>) -> RecordResult<()> {
        SUBSCRIPTION.assign(&mut self.subscription, subscription, &mut self.meta)
    }

    /// Subscribes this customer to `plan`, storing both the subscription and the customer.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError::InvalidPlan`] unless `plan` is a stored plan.
    pub fn subscribe(
        &mut self,
        store: &RecordStore,
        plan: &Plan,
        renewal_date: NaiveDate,
    ) -> HostingResult<Subscription> {
        let offered = store
            .collection::<Plan>()
            .get(plan.id())?
            .ok_or(HostingError::InvalidPlan(plan.id()))?;

        let subscription = store.collection::<Subscription>().create(SubscriptionArgs {
            renewal_date: Some(renewal_date),
            plan: Some(offered),
        })?;

        let mut subscribed = self.clone();
        subscribed.set_subscription(Some(subscription.clone()))?;
        subscribed.save(store)?;
        *self = subscribed;

        tracing::debug!(
            customer = self.id(),
            plan = plan.id(),
            subscription = subscription.id(),
            "customer subscribed"
        );

        Ok(subscription)
    }
}

impl fmt::Debug for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customer")
            .field("meta", &self.meta)
            .field("name", &self.name)
            .field("password", &"***")
            .field("email", &self.email)
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl Record for Customer {
    type Args = CustomerArgs;

    fn collection_name() -> &'static str {
        "customers"
    }

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn argument_names() -> &'static [&'static str] {
        &["name", "password", "email", "subscription"]
    }

    fn construct(meta: Meta, args: CustomerArgs) -> RecordResult<Self> {
        let mut customer = Customer {
            meta,
            name: NAME.default_value().clone(),
            password: PASSWORD.default_value().clone(),
            email: EMAIL.default_value().clone(),
            subscription: SUBSCRIPTION.default_value().clone(),
        };
        NAME.write(&mut customer.name, args.name)?;
        PASSWORD.write(&mut customer.password, args.password)?;
        EMAIL.write(&mut customer.email, args.email)?;
        SUBSCRIPTION.write(&mut customer.subscription, args.subscription)?;
        Ok(customer)
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
