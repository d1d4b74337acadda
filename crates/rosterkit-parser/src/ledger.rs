//! Substitute ledger extraction
//!
//! The label column interleaves schedule identities with a free-text ledger:
//!
//! ```text
//! Remplaçant 1 G1
//! 01/03/2025 : DUPONT Marie
//! some note
//! 02/03/2025 : MARTIN Jean
//! Remplaçant 2 G1
//! 01/03/2025 : Nom LEA
//! ```
//!
//! A group marker opens a block; every `date : person` line that follows is
//! attributed to the most recent marker. Lines seen before the first marker
//! have no group and are dropped.

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rosterkit_core::{Assignment, ColIndex, Sheet};
use tracing::debug;

use crate::text::{fold_group, is_substitute_label, strip_leading_label};

static LEDGER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})/(\d{1,2})/(\d{4})\s*[:：]\s*(.+?)\s*$").unwrap()
});

/// Scanner state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LedgerState {
    /// No group marker seen yet
    #[default]
    Idle,
    /// Inside the block opened by `group`
    InBlock { group: String },
}

impl LedgerState {
    pub fn group(&self) -> Option<&str> {
        match self {
            LedgerState::Idle => None,
            LedgerState::InBlock { group } => Some(group),
        }
    }
}

/// What a single label-column value means to the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerLine<'a> {
    /// Opens a new group, carrying the flattened label
    GroupMarker(String),
    /// `dd/mm/yyyy : person`
    Entry {
        day: u32,
        month: u32,
        year: i32,
        person: &'a str,
    },
    /// Anything else
    Other,
}

/// Classify one raw label value
pub fn classify(raw: &str) -> LedgerLine<'_> {
    if is_substitute_label(raw) {
        return LedgerLine::GroupMarker(raw.replace('\n', " ").trim().to_string());
    }
    let Some(caps) = LEDGER_LINE.captures(raw) else {
        return LedgerLine::Other;
    };
    let (Ok(day), Ok(month), Ok(year)) = (
        caps[1].parse::<u32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<i32>(),
    ) else {
        return LedgerLine::Other;
    };
    match caps.get(4) {
        Some(person) => LedgerLine::Entry {
            day,
            month,
            year,
            person: person.as_str(),
        },
        None => LedgerLine::Other,
    }
}

/// Split a person description into `(surname, given name)`.
///
/// Leading `Nom`/`Prénom` labels are dropped, the first remaining token is
/// the surname and the rest is the given name. A single token yields an empty
/// given name.
pub fn split_person(person: &str) -> (String, String) {
    let cleaned = strip_leading_label(person.trim());
    let mut tokens = cleaned.split_whitespace();
    let surname = tokens
        .next()
        .map(|t| t.trim_matches(|c| c == ',' || c == ';').to_string())
        .unwrap_or_default();
    let rest: Vec<&str> = tokens.collect();
    let given_name = rest
        .join(" ")
        .trim_matches(|c| c == ',' || c == ';')
        .to_string();
    (surname, given_name)
}

/// Result of a ledger scan
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerScan {
    pub assignments: Vec<Assignment>,
    /// Ledger lines seen before any group marker
    pub orphan_lines: usize,
    /// Ledger lines whose date does not exist
    pub invalid_dates: usize,
}

/// Two-state ledger scanner fed one label value at a time
#[derive(Debug, Default)]
pub struct LedgerExtractor {
    state: LedgerState,
    scan: LedgerScan,
}

impl LedgerExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Advance the scanner with the next value of the label column
    pub fn feed(&mut self, raw: &str) {
        match classify(raw) {
            LedgerLine::GroupMarker(group) => {
                debug!(%group, "ledger group");
                self.state = LedgerState::InBlock { group };
            }
            LedgerLine::Entry {
                day,
                month,
                year,
                person,
            } => {
                let LedgerState::InBlock { group } = &self.state else {
                    debug!(line = raw, "ledger line before any group, dropped");
                    self.scan.orphan_lines += 1;
                    return;
                };
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    debug!(line = raw, "ledger line with impossible date, dropped");
                    self.scan.invalid_dates += 1;
                    return;
                };
                let (surname, given_name) = split_person(person);
                if given_name.is_empty() {
                    debug!(%surname, "single-token substitute name, given name left empty");
                }
                self.scan.assignments.push(Assignment {
                    date,
                    group: group.clone(),
                    surname,
                    given_name,
                });
            }
            LedgerLine::Other => {}
        }
    }

    pub fn finish(self) -> LedgerScan {
        self.scan
    }
}

/// Run the scanner over a sequence of label values
pub fn extract_ledger<'a, I>(values: I) -> LedgerScan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut extractor = LedgerExtractor::new();
    for value in values {
        extractor.feed(value);
    }
    extractor.finish()
}

/// Run the scanner over a sheet column, top to bottom.
///
/// Empty cells are skipped; numbers and booleans are read as their text.
pub fn extract_ledger_from_sheet(sheet: &Sheet, column: ColIndex) -> LedgerScan {
    let mut extractor = LedgerExtractor::new();
    for row in 1..=sheet.max_row() {
        let value = sheet.value(row, column);
        if value.is_empty() {
            continue;
        }
        extractor.feed(&value.to_string());
    }
    let scan = extractor.finish();
    debug!(
        assignments = scan.assignments.len(),
        orphans = scan.orphan_lines,
        "ledger scanned"
    );
    scan
}

/// Lookup of assignments by folded group and day; the first record wins
#[derive(Debug, Default)]
pub struct LedgerIndex<'a> {
    by_key: HashMap<(String, NaiveDate), &'a Assignment>,
}

impl<'a> LedgerIndex<'a> {
    pub fn new(assignments: &'a [Assignment]) -> Self {
        let mut by_key = HashMap::new();
        for assignment in assignments {
            by_key
                .entry((fold_group(&assignment.group), assignment.date))
                .or_insert(assignment);
        }
        Self { by_key }
    }

    /// First assignment for a folded group key on a day
    pub fn lookup(&self, group_key: &str, date: NaiveDate) -> Option<&'a Assignment> {
        self.by_key.get(&(group_key.to_string(), date)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_lines() {
        assert_eq!(
            classify("Remplaçant 1\nG1"),
            LedgerLine::GroupMarker("Remplaçant 1 G1".into())
        );
        assert_eq!(
            classify(" 1/3/2025 ： DUPONT Marie "),
            LedgerLine::Entry {
                day: 1,
                month: 3,
                year: 2025,
                person: "DUPONT Marie"
            }
        );
        assert_eq!(classify("texte libre"), LedgerLine::Other);
        assert_eq!(classify("01/03/2025"), LedgerLine::Other);
    }

    #[test]
    fn split_person_variants() {
        assert_eq!(split_person("DUPONT Marie"), ("DUPONT".into(), "Marie".into()));
        assert_eq!(
            split_person("Nom: DURAND  Jean   Pierre;"),
            ("DURAND".into(), "Jean Pierre".into())
        );
        assert_eq!(split_person("LEA"), ("LEA".into(), String::new()));
        assert_eq!(split_person("MARTIN, Paul"), ("MARTIN".into(), "Paul".into()));
        assert_eq!(split_person("Nom"), (String::new(), String::new()));
    }

    #[test]
    fn state_transitions() {
        let mut ex = LedgerExtractor::new();
        assert_eq!(ex.state(), &LedgerState::Idle);
        ex.feed("REMPLACANT 2 G1");
        assert_eq!(ex.state().group(), Some("REMPLACANT 2 G1"));
        ex.feed("note");
        assert_eq!(ex.state().group(), Some("REMPLACANT 2 G1"));
        ex.feed("Remplaçant 3 G2");
        assert_eq!(ex.state().group(), Some("Remplaçant 3 G2"));
    }

    #[test]
    fn impossible_dates_dropped() {
        let scan = extract_ledger(["Remplaçant 1 G1", "31/02/2025 : DUPONT Marie"]);
        assert!(scan.assignments.is_empty());
        assert_eq!(scan.invalid_dates, 1);
    }

    #[test]
    fn index_first_record_wins() {
        let scan = extract_ledger([
            "Remplaçant 1 G1",
            "01/03/2025 : DUPONT Marie",
            "01/03/2025 : MARTIN Jean",
        ]);
        let index = LedgerIndex::new(&scan.assignments);
        assert_eq!(index.len(), 1);
        let hit = index.lookup("remplacant 1 g1", date(2025, 3, 1)).unwrap();
        assert_eq!(hit.surname, "DUPONT");
        assert!(index.lookup("remplacant 1 g1", date(2025, 3, 2)).is_none());
        assert!(index.lookup("remplacant 2 g1", date(2025, 3, 1)).is_none());
    }

    #[test]
    fn sheet_scan_skips_empty_cells() {
        let mut sheet = Sheet::new();
        sheet.set_value(1, 1, "Remplaçant 1 G1");
        sheet.set_value(3, 1, "05/03/2025 : PETIT Luc");
        sheet.set_value(3, 2, "ignored");
        let scan = extract_ledger_from_sheet(&sheet, 1);
        assert_eq!(scan.assignments.len(), 1);
        assert_eq!(scan.assignments[0].date, date(2025, 3, 5));
    }
}
