//! Hours-row reflow and block merges

use once_cell::sync::Lazy;
use regex::Regex;
use rosterkit_core::{Alignment, Layout, MergeRange, RowIndex, Sheet};
use rosterkit_parser::text::is_hours_marker;
use rosterkit_parser::DayColumns;
use tracing::{debug, warn};

static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*").unwrap());

/// Break an hours range after each dash and slash.
///
/// `"8h - 12h/14h-18h"` becomes `"8h -\n12h/\n14h -\n18h"`.
pub fn reflow_hours_text(text: &str) -> String {
    DASH.replace_all(text.trim(), " -\n").replace('/', "/\n")
}

/// Reflowed text that needs the tall row height
pub fn needs_tall_row(text: &str) -> bool {
    text.contains("/\n") || text.matches('\n').count() > 1
}

fn is_hours_row(sheet: &Sheet, layout: &Layout, row: RowIndex) -> bool {
    sheet
        .text(row, layout.marker_column)
        .map(is_hours_marker)
        .unwrap_or(false)
}

/// Reflow every day cell of the hours rows and size those rows.
///
/// Returns the number of hours rows seen.
pub fn reflow_hours(sheet: &mut Sheet, layout: &Layout, days: &DayColumns) -> usize {
    let mut rows = 0;
    for row in 1..=sheet.max_row() {
        if !is_hours_row(sheet, layout, row) {
            continue;
        }
        rows += 1;
        let mut height = layout.hours_row_height;
        for col in days.iter() {
            let reflowed = match sheet.text(row, col) {
                Some(text) if !text.is_empty() => reflow_hours_text(text),
                _ => continue,
            };
            if needs_tall_row(&reflowed) {
                height = layout.hours_row_height_tall;
            }
            let cell = sheet.cell_mut(row, col);
            cell.value = reflowed.into();
            cell.style.alignment = Alignment::wrapped_centered();
        }
        sheet.set_row_height(row, height);
    }
    debug!(rows, "hours rows reflowed");
    rows
}

/// Outcome of the merge pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: usize,
    /// Ranges left unmerged because they overlap an earlier block
    pub skipped: usize,
}

/// Merge the leading columns of every block vertically.
///
/// A block starts at an hours row and spans `block_height` rows; blocks that
/// would run past the last row are left alone. The label column is widened.
pub fn merge_blocks(sheet: &mut Sheet, layout: &Layout) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let span = layout.block_height.saturating_sub(1);
    let last = sheet.max_row();

    for row in 1..=last.saturating_sub(span) {
        if !is_hours_row(sheet, layout, row) {
            continue;
        }
        for col in 1..=layout.merged_columns {
            let range = MergeRange::vertical(row, col, layout.block_height);
            match sheet.merge(range) {
                Ok(()) => {
                    sheet.cell_mut(row, col).style.alignment = Alignment::middle();
                    outcome.merged += 1;
                }
                Err(e) => {
                    warn!(error = %e, "block not merged");
                    outcome.skipped += 1;
                }
            }
        }
    }

    sheet.set_column_width(layout.label_column, layout.label_column_width);
    debug!(merged = outcome.merged, skipped = outcome.skipped, "blocks merged");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rosterkit_core::{HorizontalAlign, VerticalAlign};
    use rosterkit_parser::detect_day_columns;

    #[test]
    fn hours_text() {
        assert_eq!(reflow_hours_text("8h-12h"), "8h -\n12h");
        assert_eq!(reflow_hours_text(" 8h - 12h "), "8h -\n12h");
        assert_eq!(reflow_hours_text("8h-12h/14h-18h"), "8h -\n12h/\n14h -\n18h");
        assert_eq!(reflow_hours_text("repos"), "repos");
    }

    #[test]
    fn tall_rows() {
        assert!(!needs_tall_row("8h -\n12h"));
        assert!(needs_tall_row("8h -\n12h/\n14h"));
        assert!(needs_tall_row("8h -\n12h -\n14h"));
        assert!(!needs_tall_row("repos"));
    }

    #[test]
    fn reflow_sets_heights_per_row() {
        let layout = Layout::default();
        let mut sheet = Sheet::from_rows([
            vec!["", "", "", "", "L03 Mars", "M04 Mars"],
            vec!["A", "", "", "Hor.", "8h-12h", ""],
            vec!["B", "", "", "Hor.", "8h-12h/14h-18h", "9h-17h"],
            vec!["C", "", "", "hor.", "8h-12h", ""],
        ]);
        let days = detect_day_columns(&sheet, &layout);
        assert_eq!(reflow_hours(&mut sheet, &layout, &days), 2);

        assert_eq!(sheet.text(2, 5), Some("8h -\n12h"));
        assert_eq!(sheet.row_height(2), Some(40.0));
        assert_eq!(sheet.row_height(3), Some(80.0));
        assert_eq!(sheet.text(4, 5), Some("8h-12h"));
        assert_eq!(sheet.row_height(4), None);

        let style = &sheet.get(2, 5).unwrap().style;
        assert!(style.alignment.wrap_text);
        assert_eq!(style.alignment.horizontal, HorizontalAlign::Center);
    }

    #[test]
    fn blocks_merged_on_three_columns() {
        let layout = Layout::default();
        let mut rows = vec![vec!["", "", "", "", "L03 Mars"]];
        for _ in 0..2 {
            rows.push(vec!["DUPONT\nMarie", "", "", "Hor.", "8h"]);
            rows.push(vec!["", "", "", "Pause", "12h"]);
            rows.push(vec!["", "", "", "Act. jour", ""]);
            rows.push(vec!["", "", "", "Nom", "DUPONT"]);
            rows.push(vec!["", "", "", "Prénom", "Marie"]);
        }
        let mut sheet = Sheet::from_rows(rows);

        let outcome = merge_blocks(&mut sheet, &layout);
        assert_eq!(outcome, MergeOutcome { merged: 6, skipped: 0 });
        let ranges: Vec<String> = sheet.merges().iter().map(|m| m.to_string()).collect();
        assert_eq!(
            ranges,
            vec!["A2:A6", "B2:B6", "C2:C6", "A7:A11", "B7:B11", "C7:C11"]
        );
        let anchor = &sheet.get(2, 1).unwrap().style.alignment;
        assert_eq!(anchor.vertical, VerticalAlign::Center);
        assert!(anchor.wrap_text);
        assert_eq!(sheet.column_width(1), Some(50.0));
    }

    #[test]
    fn short_trailing_block_not_merged() {
        let layout = Layout::default();
        let mut sheet = Sheet::from_rows([
            vec!["", "", "", "", "L03 Mars"],
            vec!["X", "", "", "Hor.", ""],
            vec!["", "", "", "Act. jour", ""],
        ]);
        assert_eq!(merge_blocks(&mut sheet, &layout).merged, 0);
        assert!(sheet.merges().is_empty());
    }

    #[test]
    fn overlapping_blocks_skipped() {
        let layout = Layout::default();
        let mut rows = vec![vec!["", "", "", "", "L03 Mars"]];
        rows.push(vec!["A", "", "", "Hor.", ""]);
        rows.push(vec!["", "", "", "Hor.", ""]);
        for _ in 0..5 {
            rows.push(vec!["", "", "", "", ""]);
        }
        let mut sheet = Sheet::from_rows(rows);
        let outcome = merge_blocks(&mut sheet, &layout);
        assert_eq!(outcome, MergeOutcome { merged: 3, skipped: 3 });
    }
}
