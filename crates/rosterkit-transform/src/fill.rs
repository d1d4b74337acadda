//! Writing names into the inserted rows
//!
//! Each identity row in the label column owns the two name rows three and
//! four rows below it. Fixed staff repeat their own name on every day;
//! substitute groups get, per day, whoever the ledger records for that date.

use rosterkit_core::{Alignment, ColIndex, Font, Layout, RowIndex, Sheet};
use rosterkit_parser::text::is_substitute_label;
use rosterkit_parser::{fold_group, header_date, strip_leading_label, DayColumns, LedgerIndex};
use tracing::debug;

/// Offset from an identity row to its `Nom` row
pub const NAME_ROW_OFFSET: RowIndex = 3;
/// Offset from an identity row to its `Prénom` row
pub const GIVEN_NAME_ROW_OFFSET: RowIndex = 4;

/// Counters of a fill pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    pub fixed_rows: usize,
    pub substitute_rows: usize,
    /// Day cells (surname and given name counted once) filled from the ledger
    pub ledger_cells: usize,
    /// Substitute day columns whose header does not resolve to a date
    pub undated_columns: usize,
}

/// Split an identity into `(surname, given name)`.
///
/// A line break separates the two when present; otherwise the first word is
/// the surname.
pub fn split_identity(identity: &str) -> (String, String) {
    if let Some((surname, given)) = identity.split_once('\n') {
        return (surname.trim().to_string(), given.trim().to_string());
    }
    let mut words = identity.split_whitespace();
    let surname = words.next().unwrap_or_default().to_string();
    let given = words.collect::<Vec<_>>().join(" ");
    (surname, given)
}

fn write_name(sheet: &mut Sheet, row: RowIndex, col: ColIndex, value: &str, font: &Font) {
    let cell = sheet.cell_mut(row, col);
    cell.value = value.into();
    cell.style.font = font.clone();
    cell.style.alignment = Alignment::centered();
}

/// Fill the name rows of every block.
///
/// Rows are visited from 2 up to, but excluding, the last row as it stood
/// when the pass started.
pub fn fill_names(
    sheet: &mut Sheet,
    layout: &Layout,
    days: &DayColumns,
    ledger: &LedgerIndex<'_>,
    year: i32,
) -> FillReport {
    let font = layout.fill_font.to_font();
    let mut report = FillReport::default();
    let last = sheet.max_row();

    for row in 2..last {
        let identity = match sheet.text(row, layout.label_column) {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => continue,
        };

        if is_substitute_label(&identity) {
            report.substitute_rows += 1;
            if ledger.is_empty() {
                continue;
            }
            let key = fold_group(&identity);
            for col in days.iter() {
                let Some(date) = header_date(sheet, layout, col, year) else {
                    report.undated_columns += 1;
                    continue;
                };
                let Some(assignment) = ledger.lookup(&key, date) else {
                    continue;
                };
                let surname = strip_leading_label(&assignment.surname);
                let given = strip_leading_label(&assignment.given_name);
                write_name(sheet, row + NAME_ROW_OFFSET, col, &surname, &font);
                write_name(sheet, row + GIVEN_NAME_ROW_OFFSET, col, &given, &font);
                report.ledger_cells += 1;
            }
            debug!(group = %key, "substitute row filled");
        } else {
            let (surname, given) = split_identity(&identity);
            {
                let cell = sheet.cell_mut(row, layout.label_column);
                cell.value = format!("{}\n{}", surname, given).into();
                cell.style.alignment = Alignment::wrapped();
            }
            for col in days.iter() {
                write_name(sheet, row + NAME_ROW_OFFSET, col, &surname, &font);
                write_name(sheet, row + GIVEN_NAME_ROW_OFFSET, col, &given, &font);
            }
            report.fixed_rows += 1;
        }
    }

    debug!(
        fixed = report.fixed_rows,
        substitutes = report.substitute_rows,
        ledger_cells = report.ledger_cells,
        "names filled"
    );
    report
}
