use serde::Serialize;

use super::{Discipline, Gender};
use crate::marks;
use crate::table::RowMap;

/// Number of leg slots on a competition sheet row.
pub const MAX_LEGS: usize = 4;

/// Capabilities shared by every record variant. The query engine works
/// against this trait rather than against per-discipline column names.
pub trait Performance {
    fn event_name(&self) -> &str;
    fn gender(&self) -> Gender;
    fn year(&self) -> &str;
    fn mark_display(&self) -> &str;
    fn mark_value(&self) -> &str;

    /// Participant names, including empty relay slots.
    fn athlete_names(&self) -> Vec<&str>;

    fn comparable_value(&self) -> Option<f64> {
        marks::comparable_value(self.mark_value(), self.mark_display())
    }

    /// Case-insensitive substring match against any participant name.
    /// `needle` must already be lowercase.
    fn athlete_matches(&self, needle: &str) -> bool {
        self.athlete_names()
            .iter()
            .any(|name| name.to_lowercase().contains(needle))
    }
}

/// One participant and their grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Leg {
    pub name: String,
    pub grade: String,
}

impl Leg {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.grade.is_empty()
    }

    /// "Name (Grade)" or just the name when no grade is recorded.
    pub fn display(&self) -> String {
        if self.grade.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.grade)
        }
    }
}

/// Descriptive columns that are shown but never ranked on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Details {
    pub meet: String,
    pub date: String,
    pub course: String,
    pub notes: String,
}

impl Details {
    fn from_row(row: &RowMap) -> Self {
        Self {
            meet: row.get("meet").to_string(),
            date: row.get("date").to_string(),
            course: row.get("course").to_string(),
            notes: row.get("notes").to_string(),
        }
    }
}

/// A row from the competition sheet. Relays fill up to four legs;
/// individual events leave legs 2-4 empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct CompetitionRecord {
    pub event: String,
    pub gender: Gender,
    pub year: String,
    pub legs: [Leg; MAX_LEGS],
    pub mark_display: String,
    pub mark_value: String,
    pub details: Details,
}

impl CompetitionRecord {
    pub fn from_row(row: &RowMap) -> Self {
        let legs = std::array::from_fn(|i| Leg {
            name: row.get(&format!("athlete_{}", i + 1)).to_string(),
            grade: row.get(&format!("grade_{}", i + 1)).to_string(),
        });

        Self {
            event: row.get(Discipline::Competition.event_column()).to_string(),
            gender: Gender::normalize(row.get("gender")),
            year: row.get("year").to_string(),
            legs,
            mark_display: row.get("mark_display").to_string(),
            mark_value: row.get("mark_value").to_string(),
            details: Details::from_row(row),
        }
    }

    /// True when any of legs 2-4 is filled in.
    pub fn has_relay_legs(&self) -> bool {
        self.legs[1..].iter().any(|leg| !leg.name.is_empty())
    }
}

impl Performance for CompetitionRecord {
    fn event_name(&self) -> &str {
        &self.event
    }

    fn gender(&self) -> Gender {
        self.gender
    }

    fn year(&self) -> &str {
        &self.year
    }

    fn mark_display(&self) -> &str {
        &self.mark_display
    }

    fn mark_value(&self) -> &str {
        &self.mark_value
    }

    fn athlete_names(&self) -> Vec<&str> {
        self.legs.iter().map(|leg| leg.name.as_str()).collect()
    }
}

/// A row from the training or cross-country sheet: one athlete per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SoloRecord {
    pub event: String,
    pub gender: Gender,
    pub year: String,
    pub athlete: Leg,
    pub mark_display: String,
    pub mark_value: String,
    pub details: Details,
}

impl SoloRecord {
    pub fn from_row(discipline: Discipline, row: &RowMap) -> Self {
        Self {
            event: row.get(discipline.event_column()).to_string(),
            gender: Gender::normalize(row.get("gender")),
            year: row.get("year").to_string(),
            athlete: Leg {
                name: row.get("athlete").to_string(),
                grade: row.get("grade").to_string(),
            },
            mark_display: row.get("mark_display").to_string(),
            mark_value: row.get("mark_value").to_string(),
            details: Details::from_row(row),
        }
    }
}

impl Performance for SoloRecord {
    fn event_name(&self) -> &str {
        &self.event
    }

    fn gender(&self) -> Gender {
        self.gender
    }

    fn year(&self) -> &str {
        &self.year
    }

    fn mark_display(&self) -> &str {
        &self.mark_display
    }

    fn mark_value(&self) -> &str {
        &self.mark_value
    }

    fn athlete_names(&self) -> Vec<&str> {
        vec![self.athlete.name.as_str()]
    }
}

/// One observed performance, tagged with the sheet it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(tag = "discipline", content = "record")]
pub enum Record {
    #[serde(rename = "competition")]
    Competition(CompetitionRecord),
    #[serde(rename = "training")]
    Training(SoloRecord),
    #[serde(rename = "xc")]
    CrossCountry(SoloRecord),
}

impl Record {
    pub fn from_row(discipline: Discipline, row: &RowMap) -> Self {
        match discipline {
            Discipline::Competition => Record::Competition(CompetitionRecord::from_row(row)),
            Discipline::Training => Record::Training(SoloRecord::from_row(discipline, row)),
            Discipline::CrossCountry => {
                Record::CrossCountry(SoloRecord::from_row(discipline, row))
            }
        }
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            Record::Competition(_) => Discipline::Competition,
            Record::Training(_) => Discipline::Training,
            Record::CrossCountry(_) => Discipline::CrossCountry,
        }
    }

    fn inner(&self) -> &dyn Performance {
        match self {
            Record::Competition(r) => r as &dyn Performance,
            Record::Training(r) | Record::CrossCountry(r) => r as &dyn Performance,
        }
    }

    /// Participants to display, skipping empty relay slots.
    pub fn participants(&self) -> Vec<&Leg> {
        match self {
            Record::Competition(r) => r.legs.iter().filter(|leg| !leg.is_empty()).collect(),
            Record::Training(r) | Record::CrossCountry(r) => vec![&r.athlete],
        }
    }

    pub fn details(&self) -> &Details {
        match self {
            Record::Competition(r) => &r.details,
            Record::Training(r) | Record::CrossCountry(r) => &r.details,
        }
    }
}

impl Performance for Record {
    fn event_name(&self) -> &str {
        self.inner().event_name()
    }

    fn gender(&self) -> Gender {
        self.inner().gender()
    }

    fn year(&self) -> &str {
        self.inner().year()
    }

    fn mark_display(&self) -> &str {
        self.inner().mark_display()
    }

    fn mark_value(&self) -> &str {
        self.inner().mark_value()
    }

    fn athlete_names(&self) -> Vec<&str> {
        self.inner().athlete_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::decode;

    #[test]
    fn test_competition_record_from_row() {
        let rows = decode(
            "Event,gender,year,athlete_1,grade_1,athlete_2,grade_2,athlete_3,grade_3,athlete_4,grade_4,mark_display,mark_value,meet\n\
             4x100 Relay,Girls,2024,Ava,10,Bea,11,Cam,9,Dee,12,48.50,48.5,County\n",
        );
        let record = CompetitionRecord::from_row(&rows[0]);
        assert_eq!(record.event, "4x100 Relay");
        assert_eq!(record.gender, Gender::Girls);
        assert_eq!(record.legs[3].name, "Dee");
        assert_eq!(record.legs[2].grade, "9");
        assert_eq!(record.details.meet, "County");
        assert!(record.has_relay_legs());
        assert_eq!(record.comparable_value(), Some(48.5));
    }

    #[test]
    fn test_individual_competition_row_has_empty_legs() {
        let rows = decode("Event,gender,athlete_1,mark_display\n100m,boys,Eli,11.20\n");
        let record = Record::from_row(Discipline::Competition, &rows[0]);
        assert_eq!(record.participants().len(), 1);
        assert_eq!(record.athlete_names(), vec!["Eli", "", "", ""]);
        match record {
            Record::Competition(ref r) => assert!(!r.has_relay_legs()),
            _ => panic!("expected competition record"),
        }
    }

    #[test]
    fn test_solo_record_uses_discipline_event_column() {
        let rows = decode("metric,distance,gender,athlete,grade,mark_display\nBench,5K,F,Jo,10,95\n");
        let training = Record::from_row(Discipline::Training, &rows[0]);
        let xc = Record::from_row(Discipline::CrossCountry, &rows[0]);
        assert_eq!(training.event_name(), "Bench");
        assert_eq!(xc.event_name(), "5K");
        assert_eq!(xc.discipline(), Discipline::CrossCountry);
        assert_eq!(xc.gender(), Gender::Girls);
    }

    #[test]
    fn test_athlete_matches_any_leg() {
        let rows = decode("Event,athlete_1,athlete_3\n4x400,Ava Stone,Cam Reyes\n");
        let record = Record::from_row(Discipline::Competition, &rows[0]);
        assert!(record.athlete_matches("reyes"));
        assert!(record.athlete_matches("ava"));
        assert!(!record.athlete_matches("zed"));
    }

    #[test]
    fn test_leg_display() {
        let leg = Leg { name: "Ava".to_string(), grade: "10".to_string() };
        assert_eq!(leg.display(), "Ava (10)");
        assert_eq!(Leg { name: "Bo".to_string(), grade: String::new() }.display(), "Bo");
    }
}
