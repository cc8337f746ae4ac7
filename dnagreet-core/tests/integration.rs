//! Integration tests for the greeting pipeline
//!
//! These tests drive page loads through the public API against on-disk
//! SQLite stores in temporary directories.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use dnagreet_core::greeting::rules::{NEW_VISITOR_MESSAGES, RETURNING_MESSAGES};
use dnagreet_core::{
    compute_greeting, record_visit, Clock, DisabledStore, FixedClock, GreetingSession,
    KeyValueStore, MemoryStore, SeededRandom, SequenceRandom, SqliteStore, VisitRecord,
    VisitorContext, LAST_VISIT_KEY, VISIT_COUNT_KEY,
};
use tempfile::TempDir;

fn instant(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn open_store(dir: &TempDir) -> SqliteStore {
    let store = SqliteStore::open(&dir.path().join("visits.db")).expect("open should succeed");
    store.migrate().expect("migrate should succeed");
    store
}

fn page_load(store: &dyn KeyValueStore, at: &str, referrer: Option<&str>) -> GreetingSession {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(instant(at)));
    GreetingSession::start(
        store,
        clock,
        Box::new(SeededRandom::new(1)),
        referrer.map(str::to_string),
    )
}

// ============================================
// Visit persistence
// ============================================

#[test]
fn test_visits_accumulate_across_reopen() {
    dnagreet_core::logging::init_test();
    let dir = TempDir::new().unwrap();

    {
        let store = open_store(&dir);
        let first = page_load(&store, "2024-06-03T09:00:00+07:00", None);
        assert_eq!(first.visitor().visit_count, 1);
        assert!(!first.visitor().is_returning);
    }

    {
        let store = open_store(&dir);
        let second = page_load(&store, "2024-06-04T20:00:00+07:00", None);
        assert_eq!(second.visitor().visit_count, 2);
        assert!(second.visitor().is_returning);
        assert_eq!(
            second.visitor().last_visit,
            Some(Utc.with_ymd_and_hms(2024, 6, 3, 2, 0, 0).unwrap())
        );
        assert!(RETURNING_MESSAGES.contains(&second.greeting().personal_message.as_str()));
    }

    let store = open_store(&dir);
    assert_eq!(store.get(VISIT_COUNT_KEY).as_deref(), Some("2"));
    assert_eq!(
        store.get(LAST_VISIT_KEY).as_deref(),
        Some("2024-06-04T13:00:00.000Z")
    );
}

#[test]
fn test_record_round_trip_through_sqlite() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let record = VisitRecord {
        visit_count: 41,
        last_visit: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
    };
    record.save(&store).unwrap();

    assert_eq!(VisitRecord::load(&store), Some(record));
}

#[test]
fn test_corrupted_counter_in_sqlite_is_first_visit() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.set(VISIT_COUNT_KEY, "{\"visits\": 3}").unwrap();

    let session = page_load(&store, "2024-06-03T10:00:00+00:00", None);
    assert_eq!(session.visitor().visit_count, 1);
    assert!(!session.visitor().is_returning);
    assert!(NEW_VISITOR_MESSAGES.contains(&session.greeting().personal_message.as_str()));
}

#[test]
fn test_disabled_storage_never_fails() {
    for hour in ["08", "13", "19", "23"] {
        let at = format!("2024-06-03T{hour}:00:00+00:00");
        let session = page_load(&DisabledStore, &at, Some("https://github.com/"));
        assert_eq!(session.visitor().visit_count, 1);
        assert!(!session.visitor().is_returning);
        assert_eq!(
            session.greeting().background_context,
            "Coming from GitHub? A fellow developer! 👨‍💻"
        );
    }
}

#[test]
fn test_ticks_do_not_touch_store() {
    let store = MemoryStore::new();
    let mut session = page_load(&store, "2024-06-03T10:00:00+00:00", None);
    for _ in 0..10 {
        session.tick();
    }
    assert_eq!(store.get(VISIT_COUNT_KEY).as_deref(), Some("1"));

    let ctx = record_visit(&store, Utc::now(), None);
    assert_eq!(ctx.visit_count, 2);
}

// ============================================
// Engine properties
// ============================================

#[test]
fn test_energy_and_focus_properties_over_a_week() {
    let mut rng = SeededRandom::new(2024);
    let monday = instant("2024-06-03T00:00:00+02:00");
    let visitor = VisitorContext::first_visit(None);

    for hours in 0..(24 * 7) {
        let now = monday + Duration::hours(hours);
        let result = compute_greeting(&now, &visitor, &mut rng);
        assert!((85..=95).contains(&result.energy_level));

        let hour = hours % 24;
        if hour >= 22 || hour < 5 {
            assert_eq!(result.current_focus, "Deep focus coding session");
            assert_eq!(result.mood, "Focused & Creative");
            assert_eq!(result.greeting, "Working late?");
        }
    }
}

#[test]
fn test_saturday_late_night_is_focused() {
    let mut rng = SequenceRandom::constant(0.7);
    let saturday_night = instant("2024-06-08T23:10:00-05:00");
    let result = compute_greeting(
        &saturday_night,
        &VisitorContext::with_count(5, None, None),
        &mut rng,
    );
    assert_eq!(result.mood, "Focused & Creative");
}

#[test]
fn test_same_seed_same_greeting() {
    let at = "2024-06-05T15:45:00+00:00";
    let a = page_load(&MemoryStore::new(), at, None);
    let b = page_load(&MemoryStore::new(), at, None);
    assert_eq!(a.greeting(), b.greeting());
    assert_eq!(a.view(), b.view());
}
