//! Layout checks run before processing
//!
//! Positions in a roster are fixed. A workbook whose columns drifted still
//! goes through the pipeline without error, so these checks are the only
//! signal that the output will be mostly empty.

use rosterkit_core::{Diagnostic, DiagnosticCode, Layout, Sheet};
use tracing::debug;

use crate::dates::{detect_day_columns, header_date, infer_year};
use crate::ledger::extract_ledger_from_sheet;
use crate::text::{is_activity_marker, is_hours_marker};

/// Inspect a raw roster sheet against the expected layout
pub fn validate_layout(sheet: &Sheet, layout: &Layout) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if sheet.max_row() == 0 {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::EmptySheet,
            "the active worksheet has no rows",
        ));
        return diagnostics;
    }

    let days = detect_day_columns(sheet, layout);
    if !days.detected {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::NoDayHeaders,
                format!(
                    "no day header in row {} from column {}",
                    layout.header_row, layout.first_day_column
                ),
            )
            .with_hint(format!(
                "columns {}..={} will be used without dates",
                layout.first_day_column, layout.fallback_last_day_column
            )),
        );
    } else {
        let year = infer_year(sheet, layout.label_column, layout.default_year);
        let resolved = days
            .iter()
            .filter(|col| header_date(sheet, layout, *col, year).is_some())
            .count();
        if resolved == 0 {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::NoParseableDayHeader,
                    format!("none of the {} day headers resolves to a date", days.len()),
                )
                .with_hint("expected headers like \"L02 Mars\"; substitutes cannot be matched"),
            );
        }
    }

    let markers: Vec<&str> = (1..=sheet.max_row())
        .filter_map(|row| sheet.text(row, layout.marker_column))
        .collect();
    if !markers.iter().any(|m| is_activity_marker(m)) {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::NoActivityMarker,
                format!("no \"Act. jour\" marker in column {}", layout.marker_column),
            )
            .with_hint("no name rows will be inserted"),
        );
    }
    if !markers.iter().any(|m| is_hours_marker(m)) {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::NoHoursMarker,
                format!("no \"Hor.\" marker in column {}", layout.marker_column),
            )
            .with_hint("no block will be merged"),
        );
    }

    let ledger = extract_ledger_from_sheet(sheet, layout.label_column);
    if ledger.orphan_lines > 0 {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::LedgerLineWithoutGroup,
            format!(
                "{} ledger line(s) appear before any substitute group and are ignored",
                ledger.orphan_lines
            ),
        ));
    }

    for d in &diagnostics {
        debug!(code = %d.code, "{}", d.message);
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn empty_sheet() {
        let d = validate_layout(&Sheet::new(), &Layout::default());
        assert_eq!(codes(&d), vec![DiagnosticCode::EmptySheet]);
    }

    #[test]
    fn well_formed_sheet_is_clean() {
        let sheet = Sheet::from_rows([
            vec!["", "", "", "", "L02 Mars"],
            vec!["DUPONT Marie", "", "", "Hor.", "8h-12h"],
            vec!["", "", "", "Act. jour", ""],
            vec!["Remplaçant 1 G1", "", "", "", ""],
            vec!["02/03/2025 : MARTIN Jean", "", "", "", ""],
        ]);
        assert!(validate_layout(&sheet, &Layout::default()).is_empty());
    }

    #[test]
    fn drifted_sheet_reports_everything() {
        let sheet = Sheet::from_rows([
            vec!["01/03/2025 : MARTIN Jean", "Hor.", "", "", ""],
            vec!["DUPONT Marie", "Act. jour", "", "", ""],
        ]);
        let d = validate_layout(&sheet, &Layout::default());
        assert_eq!(
            codes(&d),
            vec![
                DiagnosticCode::NoDayHeaders,
                DiagnosticCode::NoActivityMarker,
                DiagnosticCode::NoHoursMarker,
                DiagnosticCode::LedgerLineWithoutGroup,
            ]
        );
    }

    #[test]
    fn unparseable_headers_reported() {
        let sheet = Sheet::from_rows([vec!["", "", "", "Hor.", "Total", "Moyenne"]]);
        let d = validate_layout(&sheet, &Layout::default());
        assert!(codes(&d).contains(&DiagnosticCode::NoParseableDayHeader));
        assert!(d[0].hint.is_some());
    }
}
