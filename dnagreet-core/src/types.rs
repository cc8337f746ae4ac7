//! Core domain types for dnagreet
//!
//! - [`VisitRecord`]: what is persisted between page loads
//! - [`VisitorContext`]: what one page load knows about its visitor
//! - [`GreetingResult`]: the derived greeting, recomputed on every tick
//! - [`GreetingView`]: the flat structure handed to the rendering layer

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::store::KeyValueStore;

/// Store key holding the decimal visit counter.
pub const VISIT_COUNT_KEY: &str = "adna-portfolio-visits";

/// Store key holding the RFC 3339 timestamp of the latest visit.
pub const LAST_VISIT_KEY: &str = "adna-portfolio-last-visit";

// ============================================
// Visit history
// ============================================

/// Persisted visit history for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    /// Number of page loads so far
    pub visit_count: u64,
    /// When the latest page load happened
    pub last_visit: Option<DateTime<Utc>>,
}

impl VisitRecord {
    /// Read the record from `store`.
    ///
    /// Returns `None` when the counter is absent or not a non-negative
    /// integer. A malformed timestamp only drops `last_visit`.
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = store.get(VISIT_COUNT_KEY)?;
        let visit_count = match raw.trim().parse::<u64>() {
            Ok(count) => count,
            Err(_) => {
                tracing::warn!(value = %raw, "Ignoring malformed visit counter");
                return None;
            }
        };

        let last_visit = store
            .get(LAST_VISIT_KEY)
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Some(Self {
            visit_count,
            last_visit,
        })
    }

    /// Write the record to `store`.
    pub fn save(&self, store: &dyn KeyValueStore) -> crate::Result<()> {
        store.set(VISIT_COUNT_KEY, &self.visit_count.to_string())?;
        if let Some(ts) = self.last_visit {
            store.set(LAST_VISIT_KEY, &ts.to_rfc3339_opts(SecondsFormat::Millis, true))?;
        }
        Ok(())
    }
}

/// What a page load knows about its visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorContext {
    /// True once the visitor has loaded the page before
    pub is_returning: bool,
    /// Visit count including this load (at least 1)
    pub visit_count: u64,
    /// Timestamp of the previous load, if known
    pub last_visit: Option<DateTime<Utc>>,
    /// Where the visitor came from
    pub referrer: Option<String>,
}

impl VisitorContext {
    /// A first-ever visit with the given referrer.
    pub fn first_visit(referrer: Option<String>) -> Self {
        Self {
            is_returning: false,
            visit_count: 1,
            last_visit: None,
            referrer: normalize_referrer(referrer),
        }
    }

    /// Context for a load whose post-increment count is `visit_count`.
    pub fn with_count(
        visit_count: u64,
        last_visit: Option<DateTime<Utc>>,
        referrer: Option<String>,
    ) -> Self {
        let visit_count = visit_count.max(1);
        Self {
            is_returning: visit_count > 1,
            visit_count,
            last_visit,
            referrer: normalize_referrer(referrer),
        }
    }
}

/// Empty referrers carry no information.
fn normalize_referrer(referrer: Option<String>) -> Option<String> {
    referrer.filter(|r| !r.trim().is_empty())
}

// ============================================
// Derived greeting
// ============================================

/// Greeting derived from the time and the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GreetingResult {
    pub greeting: String,
    pub time_context: String,
    pub personal_message: String,
    pub mood: String,
    /// Percentage in `[85, 95]`
    pub energy_level: u8,
    pub current_focus: String,
    /// Empty when the referrer matched nothing
    pub background_context: String,
}

/// Everything the rendering layer displays, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GreetingView {
    #[serde(flatten)]
    pub greeting: GreetingResult,
    pub dynamic_status: String,
    pub visitor_context: VisitorContext,
    /// Display clock, `HH:mm`
    pub current_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    #[test]
    fn test_record_round_trip() {
        let store = MemoryStore::new();
        let record = VisitRecord {
            visit_count: 4,
            last_visit: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()),
        };
        record.save(&store).unwrap();

        assert_eq!(VisitRecord::load(&store), Some(record));
        assert_eq!(
            store.get(LAST_VISIT_KEY).as_deref(),
            Some("2024-05-01T10:30:00.000Z")
        );
    }

    #[test]
    fn test_load_absent() {
        let store = MemoryStore::new();
        assert_eq!(VisitRecord::load(&store), None);
    }

    #[test]
    fn test_load_malformed_counter() {
        let store = MemoryStore::new();
        store.set(VISIT_COUNT_KEY, "lots").unwrap();
        assert_eq!(VisitRecord::load(&store), None);

        store.set(VISIT_COUNT_KEY, "-2").unwrap();
        assert_eq!(VisitRecord::load(&store), None);
    }

    #[test]
    fn test_load_malformed_timestamp_keeps_count() {
        let store = MemoryStore::new();
        store.set(VISIT_COUNT_KEY, "3").unwrap();
        store.set(LAST_VISIT_KEY, "yesterday-ish").unwrap();

        let record = VisitRecord::load(&store).unwrap();
        assert_eq!(record.visit_count, 3);
        assert_eq!(record.last_visit, None);
    }

    #[test]
    fn test_visitor_context_classification() {
        assert!(!VisitorContext::with_count(1, None, None).is_returning);
        assert!(VisitorContext::with_count(2, None, None).is_returning);

        let ctx = VisitorContext::with_count(0, None, Some("  ".to_string()));
        assert_eq!(ctx.visit_count, 1);
        assert!(!ctx.is_returning);
        assert_eq!(ctx.referrer, None);
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = GreetingView {
            greeting: GreetingResult {
                greeting: "Good morning".to_string(),
                time_context: "Perfect time for fresh creativity".to_string(),
                personal_message: "Welcome back, friend! 👋".to_string(),
                mood: "Inspired & Energized".to_string(),
                energy_level: 87,
                current_focus: "Learning new technologies".to_string(),
                background_context: String::new(),
            },
            dynamic_status: "Energy: 87%".to_string(),
            visitor_context: VisitorContext::with_count(2, None, None),
            current_time: "08:05".to_string(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["greeting"], "Good morning");
        assert_eq!(json["energy_level"], 87);
        assert_eq!(json["dynamic_status"], "Energy: 87%");
        assert_eq!(json["visitor_context"]["visit_count"], 2);
        assert_eq!(json["current_time"], "08:05");
    }
}
