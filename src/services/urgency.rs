//! Deadline urgency for the payment dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Expired,
    Urgent,
    PendingNormal,
}

/// Whole hours left until the deadline, rounded up. A missing deadline
/// counts as zero hours, which classifies the order as expired even though
/// the dashboard sort treats the same order as infinitely old; both
/// behaviors are kept as the product defined them.
pub fn hours_remaining(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match deadline {
        Some(deadline) => {
            let millis = (deadline - now).num_milliseconds();
            (millis as f64 / 3_600_000.0).ceil() as i64
        }
        None => 0,
    }
}

/// One-shot classification: `expired` at or past the deadline, `urgent`
/// inside the final four hours, `pending-normal` otherwise.
pub fn classify(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Urgency {
    let hours = hours_remaining(deadline, now);
    if hours <= 0 {
        Urgency::Expired
    } else if hours <= 4 {
        Urgency::Urgent
    } else {
        Urgency::PendingNormal
    }
}
