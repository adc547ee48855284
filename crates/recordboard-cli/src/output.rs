//! Plain-text rendering of leaderboards and cache status.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use recordboard_core::cache::{age_display, CacheAges};
use recordboard_core::marks::format_seconds;
use recordboard_core::query::{Board, RankedEntry};
use recordboard_core::{Discipline, Leaderboard, Performance, RefreshReport, RefreshStatus, SortDirection};

/// Width of the rank column, wide enough for "🥇 100".
const RANK_WIDTH: usize = 6;
const MARK_WIDTH: usize = 10;
const YEAR_WIDTH: usize = 6;

pub fn render_leaderboard(board: &Leaderboard, fetched_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} \u{00b7} {}", board.discipline.display_name(), board.title());

    let updated = fetched_at
        .map(|at| age_display((Utc::now() - at).num_minutes()))
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(out, "{} \u{00b7} updated {}", board.direction.caption(), updated);
    out.push('\n');

    if board.event.is_none() {
        out.push_str("No events recorded.\n");
        return out;
    }
    if board.is_empty() {
        out.push_str("No marks recorded for this selection.\n");
        return out;
    }

    match &board.board {
        Board::Combined(entries) => {
            for entry in entries {
                render_entry(&mut out, entry, board.direction, board.relay);
            }
        }
        Board::Sections(sections) => {
            for section in sections {
                let year = if section.year.is_empty() {
                    "Year unknown"
                } else {
                    section.year.as_str()
                };
                let _ = writeln!(out, "-- {} --", year);
                for entry in &section.entries {
                    render_entry(&mut out, entry, board.direction, board.relay);
                }
                out.push('\n');
            }
        }
    }
    out
}

fn render_entry(out: &mut String, entry: &RankedEntry, direction: SortDirection, relay: bool) {
    let record = &entry.record;
    let mark = mark_text(record.mark_display(), entry.value, direction);
    let participants = record.participants();
    let prefix = format!(
        "{:>rank$}  {:<mark_w$}  {:<year_w$}  ",
        entry.rank_label(),
        mark,
        record.year(),
        rank = RANK_WIDTH,
        mark_w = MARK_WIDTH,
        year_w = YEAR_WIDTH,
    );

    if relay && participants.len() > 1 {
        // One leg per line, aligned under the first.
        let indent = " ".repeat(RANK_WIDTH + MARK_WIDTH + YEAR_WIDTH + 6);
        for (i, leg) in participants.iter().enumerate() {
            if i == 0 {
                let _ = writeln!(out, "{}{}", prefix, leg.display());
            } else {
                let _ = writeln!(out, "{}{}", indent, leg.display());
            }
        }
    } else {
        let names: Vec<String> = participants.iter().map(|leg| leg.display()).collect();
        let _ = write!(out, "{}{}", prefix, names.join(" / "));
        let meet = &record.details().meet;
        if !meet.is_empty() {
            let _ = write!(out, "  [{}]", meet);
        }
        out.push('\n');
    }
}

/// The sheet's own display text, or a rendering of the comparable value
/// when the display column is blank.
fn mark_text(display: &str, value: f64, direction: SortDirection) -> String {
    let display = display.trim();
    if !display.is_empty() {
        return display.to_string();
    }
    match direction {
        SortDirection::LowerIsBetter => format_seconds(value),
        SortDirection::HigherIsBetter => format!("{:.2}", value),
    }
}

pub fn render_refresh_report(report: &RefreshReport) -> String {
    let mut out = String::new();
    for (discipline, status) in &report.results {
        let line = match status {
            RefreshStatus::Refreshed { records } => format!("refreshed ({} records)", records),
            RefreshStatus::Failed(reason) => format!("failed, kept cached data: {}", reason),
            RefreshStatus::SkippedOffline => "skipped (offline)".to_string(),
        };
        let _ = writeln!(out, "{:<15} {}", discipline.display_name(), line);
    }
    out
}

pub fn render_cache_ages(ages: &CacheAges) -> String {
    let mut out = String::new();
    for discipline in Discipline::ALL {
        let _ = writeln!(
            out,
            "{:<15} {}",
            discipline.display_name(),
            ages.for_discipline(discipline)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordboard_core::query::leaderboard;
    use recordboard_core::{Dataset, Gender, LeaderboardRequest, YearScope};

    const RELAYS: &str = "\
Event,gender,year,athlete_1,grade_1,athlete_2,grade_2,athlete_3,grade_3,athlete_4,grade_4,mark_display,mark_value
4x100 Relay,Girls,2024,Ava,11,Bea,10,Cal,12,Dee,9,48.50,48.50
4x100 Relay,Girls,2023,Bo,12,Cy,11,Di,10,Em,9,47.90,47.90
";

    #[test]
    fn test_relay_rows_list_every_leg() {
        let dataset = Dataset::decode(Discipline::Competition, RELAYS, None);
        let request = LeaderboardRequest::new(Discipline::Competition, Gender::Girls).with_event("4x100 Relay");
        let text = render_leaderboard(&leaderboard(&dataset.records, &request), None);

        assert!(text.contains("Running: fastest wins"));
        assert!(text.contains("updated unknown"));
        let first = text.lines().find(|l| l.contains("Bo (12)")).unwrap();
        assert!(first.contains("\u{1f947} 1"));
        assert!(first.contains("47.90"));
        for leg in ["Cy (11)", "Di (10)", "Em (9)"] {
            assert!(text.lines().any(|l| l.trim() == leg), "missing leg {leg}");
        }
    }

    #[test]
    fn test_sections_and_fallback_mark() {
        let text = "distance,gender,year,athlete,grade,mark_display,mark_value\n\
                    5K,Boys,2024,Sam,11,,1020.5\n\
                    5K,Boys,,Lee,10,17:40,\n";
        let dataset = Dataset::decode(Discipline::CrossCountry, text, Some(Utc::now()));
        let request = LeaderboardRequest::new(Discipline::CrossCountry, Gender::Boys)
            .with_event("5K")
            .with_scope(YearScope::ByYear);
        let out = render_leaderboard(&leaderboard(&dataset.records, &request), dataset.fetched_at);

        assert!(out.contains("updated just now"));
        assert!(out.contains("-- 2024 --"));
        assert!(out.contains("-- Year unknown --"));
        assert!(out.contains("17:00.50"));
        assert!(out.contains("Sam (11)"));
    }

    #[test]
    fn test_empty_board_messages() {
        let dataset = Dataset::empty(Discipline::Training);
        let request = LeaderboardRequest::new(Discipline::Training, Gender::Girls);
        let out = render_leaderboard(&leaderboard(&dataset.records, &request), None);
        assert!(out.contains("No events recorded."));

        let request = request.with_event("Bench");
        let out = render_leaderboard(&leaderboard(&dataset.records, &request), None);
        assert!(out.contains("No marks recorded for this selection."));
    }

    #[test]
    fn test_refresh_report_lines() {
        let report = RefreshReport {
            results: vec![
                (Discipline::Competition, RefreshStatus::Refreshed { records: 12 }),
                (Discipline::Training, RefreshStatus::Failed("timeout".to_string())),
                (Discipline::CrossCountry, RefreshStatus::SkippedOffline),
            ],
        };
        let out = render_refresh_report(&report);
        assert!(out.contains("refreshed (12 records)"));
        assert!(out.contains("failed, kept cached data: timeout"));
        assert!(out.contains("skipped (offline)"));
    }
}
