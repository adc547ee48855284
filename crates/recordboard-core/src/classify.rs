//! Event classification from free-text event names.

use serde::Serialize;

/// Two-letter abbreviations used for field events in the sheets.
const FIELD_ABBREVIATIONS: [&str; 6] = ["sp", "dt", "lj", "tj", "hj", "pv"];

const FIELD_KEYWORDS: [&str; 8] = [
    "shot put",
    "shot",
    "discus",
    "discus throw",
    "long jump",
    "triple jump",
    "high jump",
    "pole vault",
];

/// Lowercase an event name, unify dashes and punctuation, collapse whitespace.
pub fn normalize_event_name(name: &str) -> String {
    let unified: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            '/' | '.' | ',' | '(' | ')' => ' ',
            other => other,
        })
        .collect();

    unified.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for throwing and jumping events, where a higher mark wins.
pub fn is_field_event(name: &str) -> bool {
    let normalized = normalize_event_name(name);
    if normalized.is_empty() {
        return false;
    }

    if normalized
        .split(' ')
        .any(|token| FIELD_ABBREVIATIONS.contains(&token))
    {
        return true;
    }

    FIELD_KEYWORDS
        .iter()
        .any(|keyword| normalized == *keyword || normalized.contains(keyword))
}

/// True for relays ("4x100", "4x400 Relay", "Distance Medley Relay").
pub fn is_relay_event(name: &str) -> bool {
    let normalized = normalize_event_name(name);
    normalized.contains("4x") || normalized.contains("relay")
}

/// Ranking direction for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum SortDirection {
    /// Field events: longest throw or highest jump first.
    HigherIsBetter,
    /// Running and distance events: fastest time first.
    LowerIsBetter,
}

impl SortDirection {
    pub fn for_event(name: &str) -> Self {
        if is_field_event(name) {
            SortDirection::HigherIsBetter
        } else {
            SortDirection::LowerIsBetter
        }
    }

    /// Short caption shown above a leaderboard.
    pub fn caption(&self) -> &'static str {
        match self {
            SortDirection::HigherIsBetter => "Field: highest wins",
            SortDirection::LowerIsBetter => "Running: fastest wins",
        }
    }
}
