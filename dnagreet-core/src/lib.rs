//! # dnagreet-core
//!
//! Core library for dnagreet - the dynamic greeting of the Digital DNA portfolio.
//!
//! This library provides:
//! - The greeting engine (time buckets, mood, energy, focus, referrer context)
//! - The rotating status line
//! - Visit tracking over a pluggable key-value store (SQLite, memory, disabled)
//! - Clock, randomness and timer ports so every decision is testable
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dnagreet_core::{Config, GreetingSession, SystemClock, ThreadRandom};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = dnagreet_core::store::open_configured(&config.storage);
//!
//! let session = GreetingSession::start(
//!     store.as_ref(),
//!     Arc::new(SystemClock),
//!     Box::new(ThreadRandom::new()),
//!     config.greeting.referrer.clone(),
//! );
//! let view = session.view();
//! println!("{} - {}", view.greeting.greeting, view.dynamic_status);
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use greeting::compute_greeting;
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use scheduler::RepeatingTask;
pub use session::{GreetingSession, LiveGreeting, LiveTimers};
pub use store::{DisabledStore, KeyValueStore, MemoryStore, SqliteStore};
pub use types::*;
pub use visits::record_visit;

// Public modules
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod greeting;
pub mod logging;
pub mod random;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;
pub mod visits;
