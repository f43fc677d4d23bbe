//! Timestamp source for record metadata.
//!
//! Wall-clock readings can collide when two records are stamped within the clock's
//! resolution. [`now`] never returns the same instant twice within a process: when the
//! wall clock has not advanced past the previous reading, the previous reading plus one
//! nanosecond is returned instead.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

static LAST_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Returns the current UTC time, strictly later than any earlier call in this process.
pub fn now() -> DateTime<Utc> {
    let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
    let mut previous = LAST_NANOS.load(Ordering::Acquire);

    loop {
        let next = wall.max(previous.saturating_add(1));

        match LAST_NANOS.compare_exchange_weak(previous, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return DateTime::from_timestamp_nanos(next),
            Err(actual) => previous = actual,
        }
    }
}
