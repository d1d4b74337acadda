//! Name-row insertion and placeholder clean-up

use rosterkit_core::{Layout, RowIndex, Sheet};
use rosterkit_parser::fold;
use rosterkit_parser::text::{
    is_activity_marker, is_name_marker, is_placeholder, GIVEN_NAME_LABEL, NAME_LABEL,
};
use tracing::debug;

/// Rows created below one activity marker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertedPair {
    /// Row of the activity marker, after earlier insertions
    pub marker_row: RowIndex,
    pub name_row: RowIndex,
    pub given_name_row: RowIndex,
}

/// Blank stray `Nom` / `Nom/` headers left in the residual header row.
///
/// Only the day area is touched. Returns the number of cells cleared.
pub fn clear_residual_header(sheet: &mut Sheet, layout: &Layout) -> usize {
    let row = layout.residual_header_row;
    let mut cleared = 0;
    for col in layout.first_day_column..=sheet.max_column() {
        let stray = sheet
            .text(row, col)
            .map(|t| matches!(fold(t).as_str(), "nom" | "nom/"))
            .unwrap_or(false);
        if stray {
            sheet.clear_value(row, col);
            cleared += 1;
        }
    }
    cleared
}

/// Rows whose marker column reads `Act. jour`, in the current numbering
pub fn insertion_points(sheet: &Sheet, layout: &Layout) -> Vec<RowIndex> {
    (1..=sheet.max_row())
        .filter(|row| {
            sheet
                .text(*row, layout.marker_column)
                .map(is_activity_marker)
                .unwrap_or(false)
        })
        .collect()
}

/// Insert a `Nom` row and a `Prénom` row below every activity marker.
///
/// Markers are collected first; each insertion pushes the later markers down
/// by two, which the running offset accounts for.
pub fn insert_name_rows(sheet: &mut Sheet, layout: &Layout) -> Vec<InsertedPair> {
    let markers = insertion_points(sheet, layout);
    let font = layout.label_font.to_font();
    let mut pairs = Vec::with_capacity(markers.len());
    let mut offset: RowIndex = 0;

    for marker in markers {
        let marker_row = marker + offset;
        let name_row = marker_row + 1;
        sheet.insert_rows(name_row, 2);

        for (row, label) in [(name_row, NAME_LABEL), (name_row + 1, GIVEN_NAME_LABEL)] {
            let cell = sheet.cell_mut(row, layout.marker_column);
            cell.value = label.into();
            cell.style.font = font.clone();
        }

        pairs.push(InsertedPair {
            marker_row,
            name_row,
            given_name_row: name_row + 1,
        });
        offset += 2;
    }

    debug!(pairs = pairs.len(), "name rows inserted");
    pairs
}

/// In rows labelled `Nom`, blank every day cell holding only a placeholder.
///
/// Returns the number of cells cleared.
pub fn clear_placeholders_in_name_rows(sheet: &mut Sheet, layout: &Layout) -> usize {
    let mut cleared = 0;
    for row in 1..=sheet.max_row() {
        let labelled = sheet
            .text(row, layout.marker_column)
            .map(is_name_marker)
            .unwrap_or(false);
        if !labelled {
            continue;
        }
        for col in layout.first_day_column..=sheet.max_column() {
            if sheet.text(row, col).map(is_placeholder).unwrap_or(false) {
                sheet.clear_value(row, col);
                cleared += 1;
            }
        }
    }
    cleared
}
