//! Day headers and year inference
//!
//! Day columns carry free-text headers such as `"L02 Mars"` or
//! `"Dim 01\nAoût"`. Only the day number and the French month token matter;
//! the year comes from the ledger dates found in the label column.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rosterkit_core::{ColIndex, Layout, Sheet};
use tracing::debug;

use crate::text::strip_accents;

static DATE_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2}/\d{2}/(\d{4})\b").unwrap());
static HEADER_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})\s*([a-z]{3,5})").unwrap());
static ANY_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Month prefixes, checked in order.
///
/// `juin`/`jun` must come before the bare `jui` prefix, which stands for
/// July (`juil`, `juill`, `jui`).
const MONTH_PREFIXES: &[(&str, u32)] = &[
    ("jan", 1),
    ("fev", 2),
    ("mar", 3),
    ("avr", 4),
    ("mai", 5),
    ("juin", 6),
    ("jun", 6),
    ("jui", 7),
    ("aou", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Year of the first `dd/mm/yyyy` date found in a column, scanning downwards
pub fn infer_year(sheet: &Sheet, column: ColIndex, default: i32) -> i32 {
    for row in 1..=sheet.max_row() {
        let Some(text) = sheet.text(row, column) else {
            continue;
        };
        if let Some(caps) = DATE_IN_TEXT.captures(text) {
            if let Ok(year) = caps[1].parse() {
                debug!(row, year, "year inferred from label column");
                return year;
            }
        }
    }
    default
}

/// Header text flattened for matching: no line breaks, no periods, no accents,
/// lowercase, single spaces
pub fn normalize_header(text: &str) -> String {
    let flat = text.trim().replace('\n', " ").replace('.', " ");
    let stripped = strip_accents(&flat);
    ANY_SPACE.replace_all(&stripped, " ").to_lowercase()
}

/// Month number for a folded month token (`"mars"` → 3, `"juil"` → 7)
pub fn month_from_token(token: &str) -> Option<u32> {
    MONTH_PREFIXES
        .iter()
        .find(|(prefix, _)| token.starts_with(prefix))
        .map(|(_, month)| *month)
}

/// Resolve a day header to a calendar date in `year`.
///
/// Returns `None` for headers that carry no `day + month` pair, for unknown
/// month tokens and for impossible days.
pub fn parse_header_date(header: &str, year: i32) -> Option<NaiveDate> {
    if header.trim().is_empty() {
        return None;
    }
    let normalized = normalize_header(header);
    let caps = HEADER_DAY.captures(&normalized)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_token(&caps[2])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Day columns of a sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayColumns {
    pub columns: Vec<ColIndex>,
    /// False when the header row was empty and the fallback range is used
    pub detected: bool,
}

impl DayColumns {
    /// Right-most day column
    pub fn last(&self) -> Option<ColIndex> {
        self.columns.iter().copied().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = ColIndex> + '_ {
        self.columns.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Contiguous run of non-empty headers from the first day column.
///
/// An empty run falls back to the configured fixed range so that later passes
/// always have candidate columns.
pub fn detect_day_columns(sheet: &Sheet, layout: &Layout) -> DayColumns {
    let mut columns = Vec::new();
    for col in layout.first_day_column..=sheet.max_column() {
        if sheet.value(layout.header_row, col).is_empty() {
            break;
        }
        columns.push(col);
    }

    if columns.is_empty() {
        debug!("no day header found, using fallback range");
        DayColumns {
            columns: layout.fallback_day_columns(),
            detected: false,
        }
    } else {
        DayColumns {
            columns,
            detected: true,
        }
    }
}

/// Date of a day column's header, if it resolves
pub fn header_date(sheet: &Sheet, layout: &Layout, col: ColIndex, year: i32) -> Option<NaiveDate> {
    sheet
        .text(layout.header_row, col)
        .and_then(|header| parse_header_date(header, year))
}
