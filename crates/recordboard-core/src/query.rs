//! Leaderboard query engine.
//!
//! A `LeaderboardRequest` is an immutable description of what to show. The
//! engine filters records by event, gender, year and athlete name, resolves
//! each survivor's comparable value, stable-sorts in the event's direction,
//! and truncates to the requested size. Equal marks keep their sheet order.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::classify::{is_relay_event, SortDirection};
use crate::models::{Discipline, Gender, Performance, Record};

// ============================================================================
// Request
// ============================================================================

/// Result size choices offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Limit {
    Top10,
    #[default]
    Top25,
    Top50,
    Top100,
}

impl Limit {
    pub const ALL: [Limit; 4] = [Limit::Top10, Limit::Top25, Limit::Top50, Limit::Top100];

    pub fn count(&self) -> usize {
        match self {
            Limit::Top10 => 10,
            Limit::Top25 => 25,
            Limit::Top50 => 50,
            Limit::Top100 => 100,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|limit| limit.count() == count)
    }
}

/// Which years a leaderboard covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum YearScope {
    /// Every year ranked together.
    #[default]
    AllYears,
    /// One independent leaderboard per year, newest first.
    ByYear,
    /// A single year.
    Year(String),
}

/// Everything that selects a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    pub discipline: Discipline,
    pub gender: Gender,
    pub event: Option<String>,
    pub search: Option<String>,
    pub limit: Limit,
    pub scope: YearScope,
}

impl LeaderboardRequest {
    pub fn new(discipline: Discipline, gender: Gender) -> Self {
        Self {
            discipline,
            gender,
            event: None,
            search: None,
            limit: Limit::default(),
            scope: YearScope::default(),
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_scope(mut self, scope: YearScope) -> Self {
        self.scope = scope;
        self
    }

    /// Selected event, trimmed; `None` when nothing usable is selected.
    fn selected_event(&self) -> Option<&str> {
        self.event
            .as_deref()
            .map(str::trim)
            .filter(|event| !event.is_empty())
    }

    /// Lowercased search term; `None` when the box is empty.
    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

// ============================================================================
// Result
// ============================================================================

/// Decorative marker for the top three places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Medal::Gold => "\u{1F947}",
            Medal::Silver => "\u{1F948}",
            Medal::Bronze => "\u{1F949}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<R = Record> {
    /// 1-based position within its leaderboard (or year section).
    pub rank: usize,
    pub medal: Option<Medal>,
    pub value: f64,
    pub record: R,
}

impl<R> RankedEntry<R> {
    /// "🥇 1" for medal places, "7" otherwise.
    pub fn rank_label(&self) -> String {
        match self.medal {
            Some(medal) => format!("{} {}", medal.symbol(), self.rank),
            None => self.rank.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSection<R = Record> {
    pub year: String,
    pub entries: Vec<RankedEntry<R>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Board<R = Record> {
    Combined(Vec<RankedEntry<R>>),
    Sections(Vec<YearSection<R>>),
}

/// A ranked, display-ready leaderboard. Zero rows is a valid leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard<R = Record> {
    pub discipline: Discipline,
    pub gender: Gender,
    pub event: Option<String>,
    pub direction: SortDirection,
    /// Relay rows expand into four legs; only meaningful for competition.
    pub relay: bool,
    pub board: Board<R>,
}

impl<R> Leaderboard<R> {
    /// Total ranked rows across all sections.
    pub fn len(&self) -> usize {
        match &self.board {
            Board::Combined(entries) => entries.len(),
            Board::Sections(sections) => sections.iter().map(|s| s.entries.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All ranked entries in display order.
    pub fn entries(&self) -> Vec<&RankedEntry<R>> {
        match &self.board {
            Board::Combined(entries) => entries.iter().collect(),
            Board::Sections(sections) => sections.iter().flat_map(|s| s.entries.iter()).collect(),
        }
    }

    /// Heading such as "Girls • 4x100 Relay".
    pub fn title(&self) -> String {
        format!("{} \u{2022} {}", self.gender, self.event.as_deref().unwrap_or("-"))
    }
}

// ============================================================================
// Engine
// ============================================================================

struct Candidate<'a, R> {
    record: &'a R,
    value: f64,
}

/// Rank `records` according to `request`.
pub fn leaderboard<R>(records: &[R], request: &LeaderboardRequest) -> Leaderboard<R>
where
    R: Performance + Clone,
{
    let event = request.selected_event().map(str::to_string);
    let direction = event
        .as_deref()
        .map(SortDirection::for_event)
        .unwrap_or(SortDirection::LowerIsBetter);
    let relay = request.discipline == Discipline::Competition
        && event.as_deref().is_some_and(is_relay_event);
    let limit = request.limit.count();

    let board = match &request.scope {
        YearScope::AllYears => Board::Combined(rank(candidates(records, request, None), direction, limit)),
        YearScope::Year(year) => Board::Combined(rank(
            candidates(records, request, Some(year.trim())),
            direction,
            limit,
        )),
        YearScope::ByYear => {
            let all = candidates(records, request, None);
            let sections = distinct_years(all.iter().map(|c| c.record))
                .into_iter()
                .map(|year| {
                    let in_year: Vec<Candidate<R>> = all
                        .iter()
                        .filter(|c| c.record.year().trim() == year)
                        .map(|c| Candidate { record: c.record, value: c.value })
                        .collect();
                    YearSection {
                        entries: rank(in_year, direction, limit),
                        year,
                    }
                })
                .collect();
            Board::Sections(sections)
        }
    };

    Leaderboard {
        discipline: request.discipline,
        gender: request.gender,
        event,
        direction,
        relay,
        board,
    }
}

/// Filter steps shared by ranking and the year selector: event, gender,
/// optional year, athlete search, resolvable value.
fn candidates<'a, R: Performance>(
    records: &'a [R],
    request: &LeaderboardRequest,
    year: Option<&str>,
) -> Vec<Candidate<'a, R>> {
    let Some(event) = request.selected_event() else {
        return Vec::new();
    };
    let needle = request.search_needle();

    records
        .iter()
        .filter(|r| r.event_name().trim() == event)
        .filter(|r| r.gender().is_known() && r.gender() == request.gender)
        .filter(|r| year.map_or(true, |y| r.year().trim() == y))
        .filter(|r| needle.as_deref().map_or(true, |n| r.athlete_matches(n)))
        .filter_map(|record| {
            record
                .comparable_value()
                .map(|value| Candidate { record, value })
        })
        .collect()
}

fn rank<R: Clone>(
    mut candidates: Vec<Candidate<R>>,
    direction: SortDirection,
    limit: usize,
) -> Vec<RankedEntry<R>> {
    // sort_by is stable: equal marks keep sheet order.
    match direction {
        SortDirection::HigherIsBetter => candidates.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortDirection::LowerIsBetter => candidates.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }

    candidates
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, c)| RankedEntry {
            rank: i + 1,
            medal: Medal::for_rank(i + 1),
            value: c.value,
            record: c.record.clone(),
        })
        .collect()
}

/// Newest first. Numeric years compare as numbers and come before any
/// non-numeric labels, which compare lexicographically.
fn compare_years_desc(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>().ok(), b.parse::<f64>().ok()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

fn distinct_years<'a, R: Performance + 'a>(records: impl Iterator<Item = &'a R>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut years: Vec<String> = records
        .map(|r| r.year().trim().to_string())
        .filter(|year| seen.insert(year.clone()))
        .collect();
    years.sort_by(|a, b| compare_years_desc(a, b));
    years
}

// ============================================================================
// Selector values
// ============================================================================

/// Distinct non-empty event names, sorted case-insensitively.
pub fn available_events<R: Performance>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut events: Vec<String> = records
        .iter()
        .map(|r| r.event_name().trim())
        .filter(|event| !event.is_empty())
        .filter(|event| seen.insert(event.to_string()))
        .map(str::to_string)
        .collect();
    events.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    events
}

/// First event in selector order, used when nothing is selected yet.
pub fn default_event<R: Performance>(records: &[R]) -> Option<String> {
    available_events(records).into_iter().next()
}

/// Years that have rankable rows for the request's event, gender and search.
/// The request's own year scope is ignored so the selector always lists
/// every year that could be picked.
pub fn available_years<R: Performance>(records: &[R], request: &LeaderboardRequest) -> Vec<String> {
    let found = candidates(records, request, None);
    distinct_years(found.iter().map(|c| c.record))
        .into_iter()
        .filter(|year| !year.is_empty())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
