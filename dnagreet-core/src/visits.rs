//! Visit tracking
//!
//! One read-modify-write of the [`VisitRecord`] per page load. Storage
//! problems never reach the caller: an unreadable record counts as a first
//! visit and a failed write is skipped.

use chrono::{DateTime, Utc};

use crate::store::KeyValueStore;
use crate::types::{VisitRecord, VisitorContext};

/// Register a page load at `now` and return what it knows about the visitor.
pub fn record_visit(
    store: &dyn KeyValueStore,
    now: DateTime<Utc>,
    referrer: Option<String>,
) -> VisitorContext {
    let previous = VisitRecord::load(store);

    let context = match &previous {
        Some(record) => VisitorContext::with_count(
            record.visit_count.saturating_add(1),
            record.last_visit,
            referrer,
        ),
        None => VisitorContext::first_visit(referrer),
    };

    let updated = VisitRecord {
        visit_count: context.visit_count,
        last_visit: Some(now),
    };
    if let Err(e) = updated.save(store) {
        tracing::warn!(error = %e, "Skipping visit record write");
    }

    tracing::info!(
        visit_count = context.visit_count,
        is_returning = context.is_returning,
        has_referrer = context.referrer.is_some(),
        "Recorded visit"
    );

    context
}
