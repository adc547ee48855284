use serde::{Deserialize, Serialize};

/// Top-level data category. Each discipline is published as its own sheet
/// with its own column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Discipline {
    #[serde(rename = "competition")]
    Competition,
    #[serde(rename = "training")]
    Training,
    #[serde(rename = "xc")]
    CrossCountry,
}

impl Discipline {
    pub const ALL: [Discipline; 3] = [
        Discipline::Competition,
        Discipline::Training,
        Discipline::CrossCountry,
    ];

    /// Stable identifier used for cache keys and configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Discipline::Competition => "competition",
            Discipline::Training => "training",
            Discipline::CrossCountry => "xc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Discipline::Competition => "Competition",
            Discipline::Training => "Training",
            Discipline::CrossCountry => "Cross Country",
        }
    }

    /// Column holding the event name in this discipline's sheet.
    pub fn event_column(&self) -> &'static str {
        match self {
            Discipline::Competition => "Event",
            Discipline::Training => "metric",
            Discipline::CrossCountry => "distance",
        }
    }

    /// Label for the event selector.
    pub fn event_label(&self) -> &'static str {
        match self {
            Discipline::Competition => "Event",
            Discipline::Training => "Metric",
            Discipline::CrossCountry => "Distance",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Normalized gender bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Gender {
    Boys,
    #[default]
    Girls,
    /// Unrecognized sheet value. Never matches a gender-filtered view.
    Unknown,
}

impl Gender {
    /// Normalize a raw sheet value. Anything unrecognized is `Unknown`,
    /// never a guessed bucket.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "boys" | "boy" | "m" => Gender::Boys,
            "girls" | "girl" | "f" => Gender::Girls,
            _ => Gender::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Gender::Unknown)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Boys => write!(f, "Boys"),
            Gender::Girls => write!(f, "Girls"),
            Gender::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_normalize() {
        assert_eq!(Gender::normalize("Boys"), Gender::Boys);
        assert_eq!(Gender::normalize(" m "), Gender::Boys);
        assert_eq!(Gender::normalize("GIRL"), Gender::Girls);
        assert_eq!(Gender::normalize("F"), Gender::Girls);
        assert_eq!(Gender::normalize("mixed"), Gender::Unknown);
        assert_eq!(Gender::normalize(""), Gender::Unknown);
    }

    #[test]
    fn test_discipline_keys() {
        assert_eq!(Discipline::CrossCountry.key(), "xc");
        assert_eq!(Discipline::from_key("XC"), Some(Discipline::CrossCountry));
        assert_eq!(Discipline::from_key("competition"), Some(Discipline::Competition));
        assert_eq!(Discipline::from_key("indoor"), None);
    }

    #[test]
    fn test_event_columns() {
        assert_eq!(Discipline::Competition.event_column(), "Event");
        assert_eq!(Discipline::Training.event_column(), "metric");
        assert_eq!(Discipline::CrossCountry.event_label(), "Distance");
    }
}
