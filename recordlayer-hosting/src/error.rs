use recordlayer::{error::RecordError, record::RecordId};
use thiserror::Error;

/// Errors raised by the hosting business rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostingError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("Plan {0} is not offered")]
    InvalidPlan(RecordId),
    #[error("Customer {0} has no subscription")]
    SubscriptionRequired(RecordId),
    #[error("Customer {customer} already has {limit} websites")]
    WebsiteLimitReached { customer: RecordId, limit: i64 },
}

pub type HostingResult<T> = Result<T, HostingError>;
