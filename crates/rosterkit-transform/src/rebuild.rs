//! Row filtering into a fresh sheet
//!
//! Both clean-up passes of the pipeline are the same operation: walk the
//! source rows, keep those a predicate accepts, append them contiguously to a
//! new sheet. Cells are cloned, so every kept cell owns its style.

use once_cell::sync::Lazy;
use regex::Regex;
use rosterkit_core::{Cell, ColIndex, Layout, Sheet};
use rosterkit_parser::fold;

static LEADING_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap());

/// Leftover header labels in the label column
const RESIDUAL_HEADERS: &[&str] = &["nom", "nom/", "prenom"];

/// Columns copied by a rebuild
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnBound {
    /// Every column of the source row
    All,
    /// Columns `1..=n`; anything to the right is dropped
    UpTo(ColIndex),
}

impl ColumnBound {
    fn slice<'a>(&self, cells: &'a [Cell]) -> &'a [Cell] {
        match self {
            ColumnBound::All => cells,
            ColumnBound::UpTo(n) => &cells[..cells.len().min(*n as usize)],
        }
    }
}

/// Result of a rebuild
#[derive(Debug)]
pub struct Rebuilt {
    pub sheet: Sheet,
    /// Source rows the predicate rejected
    pub dropped: usize,
}

/// Copy the rows accepted by `keep` into a new sheet.
///
/// `keep` sees the row already cut to `bound`. Row heights follow their rows;
/// column widths inside the bound are carried over.
pub fn rebuild<F>(source: &Sheet, bound: ColumnBound, mut keep: F) -> Rebuilt
where
    F: FnMut(&[Cell]) -> bool,
{
    let mut sheet = Sheet::new();
    let mut dropped = 0;

    for (row, cells) in source.rows() {
        let cells = bound.slice(cells);
        if !keep(cells) {
            dropped += 1;
            continue;
        }
        let new_row = sheet.push_row(cells.to_vec());
        if let Some(height) = source.row_height(row) {
            sheet.set_row_height(new_row, height);
        }
    }

    for (col, width) in source.column_widths() {
        if matches!(bound, ColumnBound::UpTo(n) if col > n) {
            continue;
        }
        sheet.set_column_width(col, width);
    }

    Rebuilt { sheet, dropped }
}

/// Stray ledger dates and leftover header labels in the label column
pub fn is_noise_row(cells: &[Cell], layout: &Layout) -> bool {
    let Some(label) = (layout.label_column as usize)
        .checked_sub(1)
        .and_then(|index| cells.get(index))
        .and_then(|c| c.value.as_text())
    else {
        return false;
    };
    let trimmed = label.trim().to_lowercase();
    if LEADING_DATE.is_match(&trimmed) {
        return true;
    }
    RESIDUAL_HEADERS.contains(&fold(label).as_str())
}

/// Every cell empty (missing, empty value or empty text)
pub fn is_blank_row(cells: &[Cell]) -> bool {
    cells.iter().all(|c| c.value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rosterkit_core::{Alignment, CellStyle, Font, HorizontalAlign};

    fn layout() -> Layout {
        Layout::default()
    }

    #[test]
    fn noise_rows() {
        let l = layout();
        let row = |s: &str| vec![Cell::new(s)];
        assert!(is_noise_row(&row("01/03/2025 : DUPONT Marie"), &l));
        assert!(is_noise_row(&row("  12/11/2025"), &l));
        assert!(is_noise_row(&row("Nom/"), &l));
        assert!(is_noise_row(&row("Prénom"), &l));
        assert!(is_noise_row(&row("NOM"), &l));
        assert!(!is_noise_row(&row("1/3/2025 : X"), &l));
        assert!(!is_noise_row(&row("DUPONT Marie"), &l));
        assert!(!is_noise_row(&row("Remplaçant 1 G1"), &l));
        assert!(!is_noise_row(&[], &l));
        assert!(!is_noise_row(&[Cell::new(3.0)], &l));
    }

    #[test]
    fn noise_row_with_zero_label_column() {
        let l = Layout {
            label_column: 0,
            ..Layout::default()
        };
        assert!(!is_noise_row(&[Cell::new("01/03/2025 : DUPONT Marie")], &l));
    }

    #[test]
    fn blank_rows() {
        assert!(is_blank_row(&[]));
        assert!(is_blank_row(&[Cell::new(""), Cell::default()]));
        assert!(!is_blank_row(&[Cell::new(""), Cell::new("x")]));
    }

    #[test]
    fn rebuild_is_contiguous() {
        let source = Sheet::from_rows([
            vec!["Planning", "", "", "", "L01 Mars"],
            vec!["01/03/2025 : DUPONT Marie", "", "", "", ""],
            vec!["DUPONT Marie", "", "", "Hor.", "8h-12h"],
            vec!["Nom/", "", "", "", ""],
            vec!["", "", "", "Act. jour", "x"],
        ]);
        let l = layout();
        let out = rebuild(&source, ColumnBound::All, |cells| !is_noise_row(cells, &l));
        assert_eq!(out.dropped, 2);
        assert_eq!(out.sheet.max_row(), 3);
        assert_eq!(out.sheet.text(2, 1), Some("DUPONT Marie"));
        assert_eq!(out.sheet.text(3, 4), Some("Act. jour"));
    }

    #[test]
    fn rebuild_bounds_columns_and_keeps_heights() {
        let mut source = Sheet::from_rows([
            vec!["a", "b", "c"],
            vec!["", "", ""],
            vec!["", "", "only beyond bound"],
            vec!["d", "", ""],
        ]);
        source.set_row_height(4, 80.0);
        source.set_column_width(1, 50.0);
        source.set_column_width(3, 12.0);

        let out = rebuild(&source, ColumnBound::UpTo(2), |cells| !is_blank_row(cells));
        assert_eq!(out.dropped, 2);
        assert_eq!(out.sheet.max_row(), 2);
        assert_eq!(out.sheet.max_column(), 2);
        assert_eq!(out.sheet.text(2, 1), Some("d"));
        assert_eq!(out.sheet.row_height(2), Some(80.0));
        assert_eq!(out.sheet.column_width(1), Some(50.0));
        assert_eq!(out.sheet.column_width(3), None);
    }

    #[test]
    fn rebuilt_styles_are_independent() {
        let mut source = Sheet::new();
        source.set_value(1, 1, "DUPONT");
        source.set_style(
            1,
            1,
            CellStyle::default()
                .with_font(Font::new("Calibri", 11.0))
                .with_alignment(Alignment::centered()),
        );

        let mut out = rebuild(&source, ColumnBound::All, |_| true).sheet;
        out.cell_mut(1, 1).style.alignment = Alignment::wrapped();
        out.cell_mut(1, 1).style.font.size = Some(8.0);

        let original = &source.get(1, 1).unwrap().style;
        assert_eq!(original.alignment.horizontal, HorizontalAlign::Center);
        assert!(!original.alignment.wrap_text);
        assert_eq!(original.font.size, Some(11.0));
    }
}
