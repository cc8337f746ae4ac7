use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use super::rules::{
    background_context, energy_level, message_pool, Mood, TimeOfDay, FOCUS_AREAS,
    LATE_NIGHT_FOCUS,
};
use crate::random::{pick_index, RandomSource};
use crate::types::{GreetingResult, VisitorContext};

/// Derive the greeting for `visitor` at `now`.
///
/// Draws exactly three values from `rng`, in order: personal message,
/// energy jitter, focus area. The focus draw is taken even when the
/// late-night override replaces it.
pub fn compute_greeting(
    now: &DateTime<FixedOffset>,
    visitor: &VisitorContext,
    rng: &mut dyn RandomSource,
) -> GreetingResult {
    let hour = now.hour();
    let day = now.weekday();
    let time_of_day = TimeOfDay::from_hour(hour);

    let pool = message_pool(visitor.is_returning);
    let personal_message = pool[pick_index(rng.next_f64(), pool.len())];

    let mood = Mood::classify(hour, day);
    let energy = energy_level(hour, day, rng.next_f64());

    let mut current_focus = FOCUS_AREAS[pick_index(rng.next_f64(), FOCUS_AREAS.len())];
    if time_of_day.is_late_night() {
        current_focus = LATE_NIGHT_FOCUS;
    }

    tracing::trace!(
        hour,
        ?day,
        ?time_of_day,
        ?mood,
        energy,
        "Computed greeting"
    );

    GreetingResult {
        greeting: time_of_day.greeting().to_string(),
        time_context: time_of_day.time_context().to_string(),
        personal_message: personal_message.to_string(),
        mood: mood.label().to_string(),
        energy_level: energy,
        current_focus: current_focus.to_string(),
        background_context: background_context(visitor.referrer.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greeting::rules::{NEW_VISITOR_MESSAGES, RETURNING_MESSAGES};
    use crate::random::{SeededRandom, SequenceRandom};
    use chrono::{NaiveDate, TimeZone};

    /// 2024-06-03 is a Monday, 2024-06-08 a Saturday.
    fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let naive = NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap();
        offset.from_local_datetime(&naive).single().unwrap()
    }

    fn new_visitor() -> VisitorContext {
        VisitorContext::first_visit(None)
    }

    fn returning_visitor() -> VisitorContext {
        VisitorContext::with_count(3, None, None)
    }

    #[test]
    fn test_greeting_buckets_for_every_hour() {
        let mut rng = SequenceRandom::constant(0.0);
        for hour in 0..24 {
            let result = compute_greeting(&at(3, hour), &new_visitor(), &mut rng);
            let expected = match hour {
                5..=11 => "Good morning",
                12..=16 => "Good afternoon",
                17..=21 => "Good evening",
                _ => "Working late?",
            };
            assert_eq!(result.greeting, expected, "hour {hour}");
        }
    }

    #[test]
    fn test_boundary_hours_start_new_bucket() {
        let mut rng = SequenceRandom::constant(0.0);
        let cases = [
            (5, "Good morning", "Perfect time for fresh creativity"),
            (12, "Good afternoon", "Hope your day is productive"),
            (17, "Good evening", "Time to unwind and explore"),
            (22, "Working late?", "The night is perfect for deep work"),
        ];
        for (hour, greeting, context) in cases {
            let result = compute_greeting(&at(3, hour), &new_visitor(), &mut rng);
            assert_eq!(result.greeting, greeting);
            assert_eq!(result.time_context, context);
        }
    }

    #[test]
    fn test_message_pools_never_cross() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..200 {
            let fresh = compute_greeting(&at(3, 10), &new_visitor(), &mut rng);
            assert!(NEW_VISITOR_MESSAGES.contains(&fresh.personal_message.as_str()));

            let back = compute_greeting(&at(3, 10), &returning_visitor(), &mut rng);
            assert!(RETURNING_MESSAGES.contains(&back.personal_message.as_str()));
        }
    }

    #[test]
    fn test_exact_selection_from_fixed_draws() {
        // message 0.45 -> index 2, energy 0.5 -> +2.5, focus 0.9 -> index 6
        let mut rng = SequenceRandom::new(vec![0.45, 0.5, 0.9]);
        let result = compute_greeting(&at(3, 7), &returning_visitor(), &mut rng);

        assert_eq!(result.personal_message, "You're becoming a regular! ❤️");
        assert_eq!(result.energy_level, 88);
        assert_eq!(result.current_focus, "Contributing to open source");
        assert_eq!(result.mood, "Inspired & Energized");
    }

    #[test]
    fn test_late_night_saturday_mood() {
        let mut rng = SequenceRandom::constant(0.3);
        let result = compute_greeting(&at(8, 23), &new_visitor(), &mut rng);
        assert_eq!(result.mood, "Focused & Creative");
    }

    #[test]
    fn test_late_night_focus_override() {
        for hour in [22, 23, 0, 1, 2, 3, 4] {
            for draw in [0.0, 0.3, 0.6, 0.99] {
                let mut rng = SequenceRandom::constant(draw);
                let result = compute_greeting(&at(5, hour), &new_visitor(), &mut rng);
                assert_eq!(result.current_focus, "Deep focus coding session");
            }
        }
    }

    #[test]
    fn test_focus_draw_consumed_during_late_night() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.0, 0.8]);
        compute_greeting(&at(3, 23), &new_visitor(), &mut rng);
        // Fourth draw is the first one for the next computation.
        let next = compute_greeting(&at(3, 10), &returning_visitor(), &mut rng);
        assert_eq!(next.personal_message, "Back for more digital magic? 🪄");
    }

    #[test]
    fn test_energy_always_in_range() {
        let mut rng = SeededRandom::new(99);
        for day in 3..=9 {
            for hour in 0..24 {
                let result = compute_greeting(&at(day, hour), &new_visitor(), &mut rng);
                assert!((85..=95).contains(&result.energy_level));
            }
        }
    }

    #[test]
    fn test_background_context_from_referrer() {
        let mut rng = SequenceRandom::constant(0.0);
        let visitor = VisitorContext::first_visit(Some(
            "https://www.google.com/search?q=digital+dna".to_string(),
        ));
        let result = compute_greeting(&at(3, 10), &visitor, &mut rng);
        assert_eq!(
            result.background_context,
            "I see you found me through Google! 🔍"
        );

        let result = compute_greeting(&at(3, 10), &new_visitor(), &mut rng);
        assert!(result.background_context.is_empty());
    }
}
