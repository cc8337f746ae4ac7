//! Formatting helpers shared by renderers.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Format a timestamp as relative time (e.g., "2m ago") as seen from `now`.
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Format an optional timestamp as relative time, or "never" if missing.
pub fn format_relative_time_opt(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match ts {
        Some(ts) => format_relative_time(ts, now),
        None => "never".to_string(),
    }
}

/// English ordinal for a day of the month ("1st", "12th", "23rd").
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// "Monday, October 19th"
pub fn long_date<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} {}", ts.format("%A, %B"), ordinal(ts.day()))
}

/// 24-hour wall clock, "HH:mm".
pub fn clock_time<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%H:%M").to_string()
}

/// Fixed-width bar for a percentage, e.g. `[#########-]`.
pub fn percent_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
