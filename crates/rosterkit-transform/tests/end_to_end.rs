//! Full pipeline runs on small roster sheets

use pretty_assertions::assert_eq;
use rosterkit_core::{CellStyle, Fill, Layout, Sheet};
use rosterkit_transform::Pipeline;

/// Two blocks (fixed staff then a substitute group), a ledger under the
/// substitute block, a stray header and a trailing blank row.
fn roster() -> Sheet {
    let mut sheet = Sheet::from_rows([
        vec!["", "", "", "", "L03 Mars", "M04 Mars", "M05 Mars"],
        vec!["DUPONT Marie", "", "", "Hor.", "8h-12h", "9h-17h", "8h-12h/14h-18h"],
        vec!["", "", "", "Pause", "12h", "12h", "12h"],
        vec!["", "", "", "Act. jour", "Nom/", "x", "x"],
        vec!["Remplaçant 1\nG1", "", "", "Hor.", "7h-13h", "7h-13h", "7h-13h"],
        vec!["", "", "", "Pause", "", "", ""],
        vec!["", "", "", "Act. jour", "", "", ""],
        vec!["04/03/2025 : MARTIN Jean", "", "", "", "", "", ""],
        vec!["10/03/2025 : PETIT Luc", "", "", "", "", "", ""],
        vec!["Nom/", "", "", "", "", "", ""],
        vec!["", "", "", "", "", "", ""],
    ]);
    sheet.set_style(
        2,
        5,
        CellStyle {
            fill: Fill {
                background: Some(0xDDEBF7),
            },
            ..Default::default()
        },
    );
    sheet
}

#[test]
fn roster_is_rebuilt() {
    let output = Pipeline::new(Layout::default()).run(&roster());
    let sheet = &output.sheet;
    let report = &output.report;

    // 11 rows - 3 noise - 1 blank + 2 per activity marker
    assert_eq!(report.rows_in, 11);
    assert_eq!(report.noise_rows_dropped, 3);
    assert_eq!(report.blank_rows_dropped, 1);
    assert_eq!(report.name_pairs_inserted, 2);
    assert_eq!(report.rows_out, 11);
    assert_eq!(sheet.max_row(), 11);
    assert_eq!(report.year, 2025);
    assert!(!report.fallback_day_range);

    // Fixed staff
    assert_eq!(sheet.text(2, 1), Some("DUPONT\nMarie"));
    for col in 5..=7 {
        assert_eq!(sheet.text(5, col), Some("DUPONT"));
        assert_eq!(sheet.text(6, col), Some("Marie"));
    }
    assert_eq!(sheet.text(5, 4), Some("Nom"));
    assert_eq!(sheet.text(6, 4), Some("Prénom"));

    // Substitute group: only 04/03 is in the ledger and on the sheet
    assert_eq!(report.substitute_rows_filled, 1);
    assert_eq!(report.ledger_cells_filled, 1);
    assert!(sheet.value(10, 5).is_empty());
    assert_eq!(sheet.text(10, 6), Some("MARTIN"));
    assert_eq!(sheet.text(11, 6), Some("Jean"));
    assert!(sheet.value(10, 7).is_empty());
    let all_text: Vec<&str> = (1..=sheet.max_row())
        .flat_map(|r| (1..=sheet.max_column()).filter_map(move |c| sheet.text(r, c)))
        .collect();
    assert!(!all_text.iter().any(|t| t.contains("PETIT")));

    // Residual header under the first marker is gone
    assert!(sheet.value(4, 5).is_empty());
    assert_eq!(sheet.text(4, 6), Some("x"));
}

#[test]
fn blocks_are_merged_and_reflowed() {
    let output = Pipeline::default().run(&roster());
    let sheet = &output.sheet;

    let merges: Vec<String> = sheet.merges().iter().map(|m| m.to_string()).collect();
    assert_eq!(
        merges,
        vec!["A2:A6", "B2:B6", "C2:C6", "A7:A11", "B7:B11", "C7:C11"]
    );
    assert_eq!(output.report.blocks_merged, 6);
    assert_eq!(output.report.merges_skipped, 0);

    assert_eq!(sheet.text(2, 5), Some("8h -\n12h"));
    assert_eq!(sheet.text(2, 7), Some("8h -\n12h/\n14h -\n18h"));
    assert_eq!(sheet.row_height(2), Some(80.0));
    assert_eq!(sheet.row_height(7), Some(40.0));
    assert_eq!(sheet.column_width(1), Some(50.0));
}

#[test]
fn source_styles_survive() {
    let output = Pipeline::default().run(&roster());
    let style = &output.sheet.get(2, 5).unwrap().style;
    assert_eq!(style.fill.background, Some(0xDDEBF7));
    assert!(style.alignment.wrap_text);
}

#[test]
fn ledger_is_returned_in_sheet_order() {
    let output = Pipeline::default().run(&roster());
    let people: Vec<(String, &str)> = output
        .ledger
        .iter()
        .map(|a| (a.date_key(), a.surname.as_str()))
        .collect();
    assert_eq!(
        people,
        vec![
            ("04/03/2025".to_string(), "MARTIN"),
            ("10/03/2025".to_string(), "PETIT")
        ]
    );
    assert!(output.ledger.iter().all(|a| a.group == "Remplaçant 1 G1"));
}

#[test]
fn each_marker_adds_two_rows() {
    for n in [1usize, 3, 7] {
        let mut rows = vec![vec![
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "L03 Mars".to_string(),
        ]];
        for i in 0..n {
            rows.push(vec![
                format!("AGENT{} Prenom", i),
                String::new(),
                String::new(),
                "Hor.".into(),
                "8h-12h".into(),
            ]);
            rows.push(vec![String::new(), String::new(), String::new(), "Pause".into()]);
            rows.push(vec![String::new(), String::new(), String::new(), "Act. jour".into()]);
        }
        let source = Sheet::from_rows(rows);
        let output = Pipeline::default().run(&source);

        assert_eq!(output.report.name_pairs_inserted, n);
        assert_eq!(output.sheet.max_row(), source.max_row() + 2 * n as u32);
        assert_eq!(output.sheet.merges().len(), 3 * n);
        for i in 0..n as u32 {
            let hours_row = 2 + 5 * i;
            assert_eq!(output.sheet.text(hours_row, 4), Some("Hor."));
            assert_eq!(output.sheet.text(hours_row + 3, 4), Some("Nom"));
            assert_eq!(
                output.sheet.text(hours_row + 3, 5),
                Some(format!("AGENT{}", i).as_str())
            );
        }
    }
}

#[test]
fn empty_header_row_uses_fallback_range() {
    let source = Sheet::from_rows([
        vec!["", "", "", "", ""],
        vec!["DUPONT Marie", "", "", "Hor.", "8h-12h"],
        vec!["", "", "", "Pause", ""],
        vec!["", "", "", "Act. jour", ""],
    ]);
    let output = Pipeline::default().run(&source);
    assert!(output.report.fallback_day_range);
    assert_eq!(output.report.day_columns, 30);
    // The empty header row is blank and dropped by the final rebuild
    assert_eq!(output.sheet.text(1, 4), Some("Hor."));
    assert_eq!(output.sheet.max_column(), 34);
    assert_eq!(output.sheet.text(4, 34), Some("DUPONT"));
    assert_eq!(output.sheet.merges().len(), 3);
}
