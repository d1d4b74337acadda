//! # rosterkit-core
//!
//! Core model for the rosterkit roster normalizer.
//!
//! This crate provides:
//! - Sheet model: `Sheet`, `Cell`, `CellValue`, `MergeRange`
//! - Value-type styling: `CellStyle` and its parts
//! - Ledger records: `Assignment`
//! - Layout configuration: `Layout`
//! - Layout diagnostics, error types and the `SheetWriter` trait
//!
//! ## Example
//!
//! ```rust
//! use rosterkit_core::{Sheet, MergeRange};
//!
//! let mut sheet = Sheet::from_rows([["DUPONT Marie", "", "", "Hor."]]);
//! sheet.insert_rows(2, 2);
//! sheet.set_value(2, 4, "Nom");
//! sheet.set_value(3, 4, "Prénom");
//! assert_eq!(sheet.max_row(), 3);
//! sheet.merge(MergeRange::vertical(1, 1, 3)).unwrap();
//! ```

pub mod layout;
pub mod sheet;
pub mod style;

pub use layout::{ConfigError, FontSpec, Layout};
pub use sheet::{column_letter, Cell, CellValue, ColIndex, MergeRange, RowIndex, Sheet};
pub use style::{
    Alignment, BorderLine, Borders, CellStyle, Fill, Font, HorizontalAlign, Protection, Rgb,
    VerticalAlign,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day format used by ledger lines and resolved day headers
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// Ledger
// ============================================================================

/// One substitute-staff assignment read from the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Day covered by the substitute
    pub date: NaiveDate,
    /// Group label as written above the ledger lines (line breaks flattened)
    pub group: String,
    pub surname: String,
    pub given_name: String,
}

impl Assignment {
    /// `dd/mm/yyyy` rendering of the date
    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Layout problems found before processing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    /// R001: the sheet has no rows at all
    EmptySheet,
    /// R002: nothing in the header row at the first day column
    NoDayHeaders,
    /// R003: day headers exist but none resolves to a date
    NoParseableDayHeader,
    /// R004: no `Act. jour` marker, so no name rows will be inserted
    NoActivityMarker,
    /// R005: no `Hor.` marker, so no block will be merged
    NoHoursMarker,
    /// R006: ledger lines found before any group marker
    LedgerLineWithoutGroup,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::EmptySheet => "R001",
            DiagnosticCode::NoDayHeaders => "R002",
            DiagnosticCode::NoParseableDayHeader => "R003",
            DiagnosticCode::NoActivityMarker => "R004",
            DiagnosticCode::NoHoursMarker => "R005",
            DiagnosticCode::LedgerLineWithoutGroup => "R006",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            hint: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Info,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output of a finished sheet
pub trait SheetWriter {
    type Output;

    /// Serialize the sheet to the output format
    fn write(&self, sheet: &Sheet) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Sheet manipulation error
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Invalid merge range: {0}")]
    InvalidMerge(String),

    #[error("Merge range {range} overlaps {existing}")]
    MergeOverlap { range: String, existing: String },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
