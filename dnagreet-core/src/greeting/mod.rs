//! Greeting engine
//!
//! Turns a wall-clock instant and a [`VisitorContext`](crate::VisitorContext)
//! into a [`GreetingResult`](crate::GreetingResult):
//! - [`rules`]: hour buckets, mood, energy, pools and referrer matching
//! - [`engine`]: [`compute_greeting`], the single entry point
//! - [`status`]: the rotating status line selected by 10-second bucket

pub mod engine;
pub mod rules;
pub mod status;

pub use engine::compute_greeting;
pub use rules::{Mood, ReferrerSource, TimeOfDay};
pub use status::{dynamic_status, status_index, status_options, STATUS_WINDOW_MS};
