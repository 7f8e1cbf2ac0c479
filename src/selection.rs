use crate::models::{HistoricalRecord, Selection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    University,
    Track,
    Program,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::University, Level::Track, Level::Program];

    pub fn label(self) -> &'static str {
        match self {
            Level::University => "University",
            Level::Track => "Admission track",
            Level::Program => "Program",
        }
    }
}

/// Choices made so far, top-down. Lower levels are ignored when an upper one is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub university: Option<String>,
    pub track: Option<String>,
    pub program: Option<String>,
}

impl SelectionRequest {
    pub fn get(&self, level: Level) -> Option<&str> {
        match level {
            Level::University => self.university.as_deref(),
            Level::Track => self.track.as_deref(),
            Level::Program => self.program.as_deref(),
        }
    }

    pub fn set(&mut self, level: Level, value: Option<String>) {
        match level {
            Level::University => self.university = value,
            Level::Track => self.track = value,
            Level::Program => self.program = value,
        }
    }
}

/// Distinct non-null values for `level` among rows matching the prior choices, sorted.
///
/// Returns an empty list when a required prior choice is missing or no row matches.
pub fn options_at(rows: &[HistoricalRecord], level: Level, prior: &SelectionRequest) -> Vec<String> {
    let values: BTreeSet<&str> = match level {
        Level::University => rows.iter().filter_map(|r| r.university.as_deref()).collect(),
        Level::Track => {
            let Some(university) = prior.university.as_deref() else {
                return Vec::new();
            };
            rows.iter()
                .filter(|r| r.university.as_deref() == Some(university))
                .filter_map(|r| r.track.as_deref())
                .collect()
        }
        Level::Program => {
            let (Some(university), Some(track)) = (prior.university.as_deref(), prior.track.as_deref()) else {
                return Vec::new();
            };
            rows.iter()
                .filter(|r| r.university.as_deref() == Some(university) && r.track.as_deref() == Some(track))
                .filter_map(|r| r.program.as_deref())
                .collect()
        }
    };

    values.into_iter().map(str::to_string).collect()
}

/// State of all three select boxes after one pass of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub universities: Vec<String>,
    pub tracks: Vec<String>,
    pub programs: Vec<String>,
    pub effective: SelectionRequest,
}

impl ResolvedSelection {
    /// The complete selection, when every level has a value.
    pub fn selection(&self) -> Option<Selection> {
        Some(Selection::new(
            self.effective.university.clone()?,
            self.effective.track.clone()?,
            self.effective.program.clone()?,
        ))
    }

    pub fn options(&self, level: Level) -> &[String] {
        match level {
            Level::University => &self.universities,
            Level::Track => &self.tracks,
            Level::Program => &self.programs,
        }
    }
}

/// Keeps the requested value when it is still offered, otherwise falls back to the first option.
fn pick(options: &[String], requested: Option<&str>) -> Option<String> {
    match requested {
        Some(value) if options.iter().any(|o| o == value) => Some(value.to_string()),
        Some(value) => {
            tracing::debug!(requested = value, "requested option not available, using first option");
            options.first().cloned()
        }
        None => options.first().cloned(),
    }
}

/// Runs the university, track, program cascade top-down.
pub fn resolve(rows: &[HistoricalRecord], requested: &SelectionRequest) -> ResolvedSelection {
    let mut effective = SelectionRequest::default();

    let universities = options_at(rows, Level::University, &effective);
    effective.university = pick(&universities, requested.university.as_deref());

    let tracks = options_at(rows, Level::Track, &effective);
    effective.track = pick(&tracks, requested.track.as_deref());

    let programs = options_at(rows, Level::Program, &effective);
    effective.program = pick(&programs, requested.program.as_deref());

    ResolvedSelection {
        universities,
        tracks,
        programs,
        effective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(university: &str, track: &str, program: Option<&str>) -> HistoricalRecord {
        HistoricalRecord {
            university: Some(university.to_string()),
            track: Some(track.to_string()),
            program: program.map(str::to_string),
            sub_track: Some("일반전형".to_string()),
            year: 2023,
            capacity: None,
            competition_ratio: None,
            fill_rank: None,
            cutoff_50: None,
            cutoff_70: None,
        }
    }

    fn table() -> Vec<HistoricalRecord> {
        vec![
            row("B", "수시", Some("경영")),
            row("A", "수시", Some("컴퓨터공학")),
            row("A", "수시", Some("기계공학")),
            row("A", "정시", Some("물리")),
            row("A", "정시", None),
            row("A", "수시", Some("컴퓨터공학")),
        ]
    }

    fn request(u: Option<&str>, t: Option<&str>, p: Option<&str>) -> SelectionRequest {
        SelectionRequest {
            university: u.map(str::to_string),
            track: t.map(str::to_string),
            program: p.map(str::to_string),
        }
    }

    #[test]
    fn test_universities_are_sorted_and_distinct() {
        let options = options_at(&table(), Level::University, &request(Some("ignored"), None, None));
        assert_eq!(options, vec!["A", "B"]);
    }

    #[test]
    fn test_programs_filtered_by_university_and_track() {
        let options = options_at(&table(), Level::Program, &request(Some("A"), Some("수시"), None));
        assert_eq!(options, vec!["기계공학", "컴퓨터공학"]);
    }

    #[test]
    fn test_null_programs_are_skipped() {
        let options = options_at(&table(), Level::Program, &request(Some("A"), Some("정시"), None));
        assert_eq!(options, vec!["물리"]);
    }

    #[test]
    fn test_unknown_prefix_yields_empty_options() {
        assert!(options_at(&table(), Level::Track, &request(Some("Z"), None, None)).is_empty());
        assert!(options_at(&table(), Level::Program, &request(Some("A"), None, None)).is_empty());
    }

    #[test]
    fn test_resolve_defaults_to_first_options() {
        let resolved = resolve(&table(), &SelectionRequest::default());
        assert_eq!(resolved.selection(), Some(Selection::new("A", "수시", "기계공학")));
    }

    #[test]
    fn test_resolve_keeps_valid_request_and_replaces_stale_one() {
        let resolved = resolve(&table(), &request(Some("A"), Some("정시"), Some("컴퓨터공학")));
        assert_eq!(resolved.effective, request(Some("A"), Some("정시"), Some("물리")));
        assert_eq!(resolved.options(Level::Program), ["물리".to_string()]);
    }

    #[test]
    fn test_resolve_on_empty_table() {
        let resolved = resolve(&[], &request(Some("A"), None, None));
        assert!(resolved.universities.is_empty());
        assert_eq!(resolved.selection(), None);
    }
}
