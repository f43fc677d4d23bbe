//! Hosting domain records built on recordlayer.
//!
//! [`Plan`]s cap how many websites a subscriber may register, [`Customer`]s subscribe to
//! stored plans, and [`Website`]s are registered against a subscribed customer. Related
//! records are embedded by value, so a website carries a snapshot of its customer and can be
//! queried by dotted path (`customer.id`).
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::{prelude::*, memory::InMemoryStore};
//! use recordlayer_hosting::{Customer, Plan, PlanArgs, Website};
//!
//! let store = RecordStore::new(InMemoryStore::new());
//! let plan = store.collection::<Plan>().create(PlanArgs {
//!     name: "starter".into(),
//!     price: 4.99,
//!     number_websites: 1,
//! })?;
//!
//! let mut customer = Customer::new(&store, "Ada", "secret", "ada@example.com", None)?;
//! customer.subscribe(&store, &plan, renewal_date)?;
//!
//! Website::register(&store, "ada.example.com", &customer)?;
//! assert!(Website::register(&store, "second.example.com", &customer).is_err());
//! ```

pub mod customer;
pub mod error;
pub mod plan;
pub mod subscription;
pub mod website;

pub use customer::{Customer, CustomerArgs};
pub use error::{HostingError, HostingResult};
pub use plan::{Plan, PlanArgs};
pub use subscription::{Subscription, SubscriptionArgs};
pub use website::{Website, WebsiteArgs};
