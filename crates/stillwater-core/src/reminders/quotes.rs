//! Rotating daily quotes.
//!
//! Quote selection is a pure function of the calendar date: the quote for
//! day D is `QUOTES[days_since_epoch(D) % QUOTES.len()]`. Content is
//! therefore reproducible anywhere a date is known -- the widget and the
//! notification body never need the scheduler's state.

use chrono::NaiveDate;

use crate::model::days_since_epoch;

/// One quote in the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    /// Category identifier, matched against `favorite_quote_category`.
    pub category: &'static str,
}

/// The full rotation, in fixed order. Appending keeps existing dates
/// stable until the new length wraps; never reorder.
pub const QUOTES: &[Quote] = &[
    Quote { text: "Breathe in calm, breathe out tension.", category: "breathing" },
    Quote { text: "This feeling is a wave. Waves pass.", category: "acceptance" },
    Quote { text: "You have survived every anxious day so far.", category: "resilience" },
    Quote { text: "Slow is smooth, and smooth is calm.", category: "breathing" },
    Quote { text: "Name five things you can see right now.", category: "grounding" },
    Quote { text: "Your thoughts are weather, not the sky.", category: "acceptance" },
    Quote { text: "One small check-in is one real step.", category: "habit" },
    Quote { text: "Tension is who you think you should be. Relaxation is who you are.", category: "acceptance" },
    Quote { text: "Feel your feet on the floor. You are here.", category: "grounding" },
    Quote { text: "A streak is built one gentle day at a time.", category: "habit" },
    Quote { text: "Exhale longer than you inhale.", category: "breathing" },
    Quote { text: "Nothing needs solving in the next four seconds.", category: "grounding" },
    Quote { text: "Worry is interest paid on a debt you may not owe.", category: "resilience" },
    Quote { text: "Let the shoulders drop. Let the jaw unclench.", category: "body" },
    Quote { text: "You can restart your day at any hour.", category: "resilience" },
    Quote { text: "Notice three sounds around you.", category: "grounding" },
    Quote { text: "Calm is a practice, not a prize.", category: "habit" },
    Quote { text: "The breath you control is the mind you steady.", category: "breathing" },
    Quote { text: "Be where your feet are.", category: "grounding" },
    Quote { text: "Rest is productive.", category: "body" },
    Quote { text: "You are allowed to take up a quiet moment.", category: "acceptance" },
    Quote { text: "Count four in, hold four, four out, hold four.", category: "breathing" },
    Quote { text: "Progress hides in days that feel ordinary.", category: "habit" },
    Quote { text: "Soften your gaze. Lengthen your breath.", category: "body" },
    Quote { text: "An anxious mind still deserves a kind voice.", category: "acceptance" },
    Quote { text: "Today only asks for today.", category: "resilience" },
    Quote { text: "Unclench your hands. Begin again.", category: "body" },
    Quote { text: "Check in with yourself before you check your phone.", category: "habit" },
    Quote { text: "The ground is always there to hold you.", category: "grounding" },
    Quote { text: "Steady breaths outlast racing thoughts.", category: "breathing" },
];

/// Quote for an absolute calendar date. Pure and total.
pub fn quote_for_date(date: NaiveDate) -> &'static Quote {
    let days = days_since_epoch(date);
    let len = QUOTES.len() as i64;
    // rem_euclid keeps pre-1970 dates in range
    let idx = days.rem_euclid(len) as usize;
    &QUOTES[idx]
}
