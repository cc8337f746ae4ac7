//! Classification rules for the greeting
//!
//! Every chain here ends in a default branch, so each hour/day/referrer maps
//! to exactly one label.

use chrono::Weekday;

/// Hour-of-day bucket. Lower edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 16:59
    Afternoon,
    /// 17:00 - 21:59
    Evening,
    /// 22:00 - 04:59
    LateNight,
}

impl TimeOfDay {
    /// Classify an hour in `0..24`.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::LateNight,
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Good morning",
            TimeOfDay::Afternoon => "Good afternoon",
            TimeOfDay::Evening => "Good evening",
            TimeOfDay::LateNight => "Working late?",
        }
    }

    pub fn time_context(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Perfect time for fresh creativity",
            TimeOfDay::Afternoon => "Hope your day is productive",
            TimeOfDay::Evening => "Time to unwind and explore",
            TimeOfDay::LateNight => "The night is perfect for deep work",
        }
    }

    pub fn is_late_night(&self) -> bool {
        matches!(self, TimeOfDay::LateNight)
    }
}

/// Business hours, 09:00 - 16:59.
pub fn is_business_hours(hour: u32) -> bool {
    (9..17).contains(&hour)
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Simulated mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    InspiredEnergized,
    FocusedCreative,
    RelaxedInnovative,
    ProductiveCollaborative,
}

impl Mood {
    /// First matching rule wins: late night, then weekend, then business
    /// hours, then the default.
    pub fn classify(hour: u32, day: Weekday) -> Self {
        if TimeOfDay::from_hour(hour).is_late_night() {
            Mood::FocusedCreative
        } else if is_weekend(day) {
            Mood::RelaxedInnovative
        } else if is_business_hours(hour) {
            Mood::ProductiveCollaborative
        } else {
            Mood::InspiredEnergized
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::InspiredEnergized => "Inspired & Energized",
            Mood::FocusedCreative => "Focused & Creative",
            Mood::RelaxedInnovative => "Relaxed & Innovative",
            Mood::ProductiveCollaborative => "Productive & Collaborative",
        }
    }
}

pub const BASE_ENERGY: f64 = 85.0;
pub const MAX_ENERGY: f64 = 95.0;
const BUSINESS_HOURS_BOOST: f64 = 10.0;
const WEEKEND_BOOST: f64 = 5.0;
const ENERGY_JITTER: f64 = 5.0;

/// Energy percentage from a draw in `[0, 1)`. Always in `[85, 95]`.
pub fn energy_level(hour: u32, day: Weekday, draw: f64) -> u8 {
    let mut energy = BASE_ENERGY;
    if is_business_hours(hour) {
        energy += BUSINESS_HOURS_BOOST;
    }
    if is_weekend(day) {
        energy += WEEKEND_BOOST;
    }
    energy += draw.clamp(0.0, 1.0) * ENERGY_JITTER;

    energy.min(MAX_ENERGY).round() as u8
}

/// Messages for visitors who have been here before.
pub const RETURNING_MESSAGES: [&str; 5] = [
    "Great to see you again! 🎉",
    "Welcome back, friend! 👋",
    "You're becoming a regular! ❤️",
    "Another visit? I'm honored! ✨",
    "Back for more digital magic? 🪄",
];

/// Messages for first-time visitors.
pub const NEW_VISITOR_MESSAGES: [&str; 5] = [
    "Welcome to my creative universe! 🌟",
    "Ready to explore something extraordinary? 🚀",
    "Let's embark on a digital journey! ⭐",
    "Buckle up for an amazing experience! 🎨",
    "Welcome to where creativity meets code! 💫",
];

pub fn message_pool(is_returning: bool) -> &'static [&'static str] {
    if is_returning {
        &RETURNING_MESSAGES
    } else {
        &NEW_VISITOR_MESSAGES
    }
}

pub const FOCUS_AREAS: [&str; 7] = [
    "Building AI-powered experiences",
    "Exploring creative animations",
    "Optimizing user interactions",
    "Crafting beautiful interfaces",
    "Learning new technologies",
    "Mentoring fellow developers",
    "Contributing to open source",
];

/// Replaces the sampled focus during late-night hours.
pub const LATE_NIGHT_FOCUS: &str = "Deep focus coding session";

/// Known referrer sources, checked in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferrerSource {
    Google,
    GitHub,
    LinkedIn,
}

impl ReferrerSource {
    pub const ALL: [ReferrerSource; 3] = [
        ReferrerSource::Google,
        ReferrerSource::GitHub,
        ReferrerSource::LinkedIn,
    ];

    /// Case-sensitive substring looked for in the referrer.
    pub fn needle(&self) -> &'static str {
        match self {
            ReferrerSource::Google => "google",
            ReferrerSource::GitHub => "github",
            ReferrerSource::LinkedIn => "linkedin",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReferrerSource::Google => "I see you found me through Google! 🔍",
            ReferrerSource::GitHub => "Coming from GitHub? A fellow developer! 👨‍💻",
            ReferrerSource::LinkedIn => "LinkedIn brought you here? Let's connect! 💼",
        }
    }

    /// First source whose needle occurs in `referrer`.
    pub fn detect(referrer: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|source| referrer.contains(source.needle()))
    }
}

/// Background line for a referrer, empty when nothing matches.
pub fn background_context(referrer: Option<&str>) -> String {
    referrer
        .and_then(ReferrerSource::detect)
        .map(|source| source.message().to_string())
        .unwrap_or_default()
}
