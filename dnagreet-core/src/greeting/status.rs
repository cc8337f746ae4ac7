//! Rotating status line
//!
//! The status is picked by `floor(unix_millis / 10_000) mod 5`, so it is a
//! pure function of the instant it is sampled at. Callers read that instant
//! separately from the display clock, which is why the status can change
//! between two greeting refreshes.

use chrono::{DateTime, TimeZone};

use crate::format::long_date;
use crate::types::GreetingResult;

/// Width of one status bucket.
pub const STATUS_WINDOW_MS: i64 = 10_000;

/// Candidate statuses, in selection order.
pub fn status_options<Tz: TimeZone>(
    greeting: &GreetingResult,
    display_time: &DateTime<Tz>,
) -> [String; 5]
where
    Tz::Offset: std::fmt::Display,
{
    [
        format!("Currently {}", greeting.current_focus.to_lowercase()),
        format!("Mood: {}", greeting.mood),
        format!("Energy: {}%", greeting.energy_level),
        format!("{} vibes", long_date(display_time)),
        "Ready to create something amazing".to_string(),
    ]
}

/// Bucket index for a Unix millisecond timestamp.
pub fn status_index(unix_millis: i64, options: usize) -> usize {
    unix_millis
        .div_euclid(STATUS_WINDOW_MS)
        .rem_euclid(options as i64) as usize
}

/// Status for `greeting`, dated by `display_time`, selected by `sampled_at`.
pub fn dynamic_status<Tz: TimeZone, Sz: TimeZone>(
    greeting: &GreetingResult,
    display_time: &DateTime<Tz>,
    sampled_at: &DateTime<Sz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let options = status_options(greeting, display_time);
    let idx = status_index(sampled_at.timestamp_millis(), options.len());
    options[idx].clone()
}
