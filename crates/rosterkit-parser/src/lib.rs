//! # rosterkit-parser
//!
//! Readers for roster workbooks.
//!
//! This crate provides:
//! - Text folding (`text`): accents, spacing, placeholder labels, markers
//! - Day header parsing and year inference (`dates`)
//! - Substitute ledger extraction (`ledger`)
//! - Layout validation (`validate`)
//! - XLSX input (`xlsx`)
//!
//! ## Example
//!
//! ```rust
//! use rosterkit_parser::{extract_ledger, parse_header_date};
//!
//! let scan = extract_ledger([
//!     "Remplaçant 1 G1",
//!     "01/03/2025 : DUPONT Marie",
//! ]);
//! assert_eq!(scan.assignments[0].surname, "DUPONT");
//!
//! let day = parse_header_date("L01 Mars", 2025).unwrap();
//! assert_eq!(day, scan.assignments[0].date);
//! ```

pub mod dates;
pub mod ledger;
pub mod text;
pub mod validate;
pub mod xlsx;

pub use dates::{detect_day_columns, header_date, infer_year, parse_header_date, DayColumns};
pub use ledger::{
    extract_ledger, extract_ledger_from_sheet, LedgerExtractor, LedgerIndex, LedgerScan,
    LedgerState,
};
pub use text::{fold, fold_group, is_placeholder, strip_leading_label};
pub use validate::validate_layout;
pub use xlsx::read_workbook;

use thiserror::Error;

/// Workbook reading error
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a readable workbook: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheet: {0}")]
    NoWorksheet(String),
}
