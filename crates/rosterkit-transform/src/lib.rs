//! # rosterkit-transform
//!
//! Rebuild pipeline turning a raw roster sheet into the normalized planning.
//!
//! This crate provides:
//! - Row filtering into fresh sheets (`rebuild`)
//! - Name-row insertion and placeholder clean-up (`insert`)
//! - Name filling for fixed staff and substitute groups (`fill`)
//! - Hours reflow and block merges (`format`)
//! - The [`Pipeline`] running all of the above in order
//!
//! ## Example
//!
//! ```rust
//! use rosterkit_core::{Layout, Sheet};
//! use rosterkit_transform::Pipeline;
//!
//! let source = Sheet::from_rows([
//!     vec!["", "", "", "", "L03 Mars"],
//!     vec!["DUPONT Marie", "", "", "Hor.", "8h-12h"],
//!     vec!["", "", "", "Pause", "12h"],
//!     vec!["", "", "", "Act. jour", "x"],
//! ]);
//! let output = Pipeline::new(Layout::default()).run(&source);
//! assert_eq!(output.sheet.text(5, 5), Some("DUPONT"));
//! assert_eq!(output.report.name_pairs_inserted, 1);
//! ```

pub mod fill;
pub mod format;
pub mod insert;
pub mod rebuild;

pub use fill::{fill_names, split_identity, FillReport};
pub use format::{merge_blocks, reflow_hours, MergeOutcome};
pub use insert::{
    clear_placeholders_in_name_rows, clear_residual_header, insert_name_rows, InsertedPair,
};
pub use rebuild::{is_blank_row, is_noise_row, rebuild, ColumnBound, Rebuilt};

use rosterkit_core::{Assignment, Layout, RowIndex, Sheet};
use rosterkit_parser::{detect_day_columns, extract_ledger_from_sheet, infer_year, LedgerIndex};
use serde::Serialize;
use tracing::{debug, info};

/// What each stage of a run did
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub rows_in: RowIndex,
    pub rows_out: RowIndex,
    pub noise_rows_dropped: usize,
    pub blank_rows_dropped: usize,
    pub name_pairs_inserted: usize,
    pub fixed_rows_filled: usize,
    pub substitute_rows_filled: usize,
    pub ledger_assignments: usize,
    pub ledger_cells_filled: usize,
    pub hours_rows: usize,
    pub blocks_merged: usize,
    pub merges_skipped: usize,
    pub year: i32,
    pub day_columns: usize,
    /// Day columns whose header gave no date, summed over substitute rows
    pub undated_columns: usize,
    /// True when no day header was found and the fixed range was used
    pub fallback_day_range: bool,
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    pub sheet: Sheet,
    /// Ledger assignments read from the source, in sheet order
    pub ledger: Vec<Assignment>,
    pub report: PipelineReport,
}

/// The full rebuild, parameterised by a layout
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    layout: Layout,
    year: Option<i32>,
}

impl Pipeline {
    pub fn new(layout: Layout) -> Self {
        Self { layout, year: None }
    }

    /// Force the year used for day headers instead of inferring it
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run every stage on a copy of `source`
    pub fn run(&self, source: &Sheet) -> PipelineOutput {
        let layout = &self.layout;
        let mut report = PipelineReport {
            rows_in: source.max_row(),
            ..Default::default()
        };

        let scan = extract_ledger_from_sheet(source, layout.label_column);
        let year = self
            .year
            .unwrap_or_else(|| infer_year(source, layout.label_column, layout.default_year));
        report.ledger_assignments = scan.assignments.len();
        report.year = year;
        info!(
            assignments = scan.assignments.len(),
            orphans = scan.orphan_lines,
            invalid_dates = scan.invalid_dates,
            year,
            "ledger extracted"
        );

        let filtered = rebuild(source, ColumnBound::All, |cells| !is_noise_row(cells, layout));
        report.noise_rows_dropped = filtered.dropped;
        let mut sheet = filtered.sheet;
        info!(dropped = filtered.dropped, rows = sheet.max_row(), "noise rows filtered");

        let cleared = clear_residual_header(&mut sheet, layout);
        debug!(cleared, "residual header cleared");

        let pairs = insert_name_rows(&mut sheet, layout);
        report.name_pairs_inserted = pairs.len();
        info!(pairs = pairs.len(), rows = sheet.max_row(), "name rows inserted");

        let cleared = clear_placeholders_in_name_rows(&mut sheet, layout);
        debug!(cleared, "placeholders cleared");

        let days = detect_day_columns(&sheet, layout);
        report.day_columns = days.len();
        report.fallback_day_range = !days.detected;
        let last_day = days.last().unwrap_or(layout.fallback_last_day_column);
        info!(
            columns = days.len(),
            last = last_day,
            fallback = !days.detected,
            "day columns detected"
        );

        let index = LedgerIndex::new(&scan.assignments);
        let fill = fill_names(&mut sheet, layout, &days, &index, year);
        report.fixed_rows_filled = fill.fixed_rows;
        report.substitute_rows_filled = fill.substitute_rows;
        report.ledger_cells_filled = fill.ledger_cells;
        report.undated_columns = fill.undated_columns;
        info!(
            fixed = fill.fixed_rows,
            substitutes = fill.substitute_rows,
            ledger_cells = fill.ledger_cells,
            undated = fill.undated_columns,
            "names filled"
        );

        report.hours_rows = reflow_hours(&mut sheet, layout, &days);

        let compacted = rebuild(&sheet, ColumnBound::UpTo(last_day), |cells| {
            !is_blank_row(cells)
        });
        report.blank_rows_dropped = compacted.dropped;
        let mut sheet = compacted.sheet;
        info!(dropped = compacted.dropped, rows = sheet.max_row(), "blank rows removed");

        let merges = merge_blocks(&mut sheet, layout);
        report.blocks_merged = merges.merged;
        report.merges_skipped = merges.skipped;
        info!(merged = merges.merged, skipped = merges.skipped, "blocks merged");

        clear_residual_header(&mut sheet, layout);
        clear_placeholders_in_name_rows(&mut sheet, layout);

        report.rows_out = sheet.max_row();
        info!(rows_in = report.rows_in, rows_out = report.rows_out, "pipeline finished");

        PipelineOutput {
            sheet,
            ledger: scan.assignments,
            report,
        }
    }
}
