//! # rosterkit-render
//!
//! Output backends for rebuilt rosters.
//!
//! This crate provides:
//! - XLSX planning output (`excel`)
//! - Ledger artifacts in CSV or JSON (`ledger`)
//! - Atomic file writes (`output`)
//!
//! ## Example
//!
//! ```rust
//! use rosterkit_core::{Sheet, SheetWriter};
//! use rosterkit_render::XlsxWriter;
//!
//! let sheet = Sheet::from_rows([vec!["DUPONT\nMarie", "", "", "Hor.", "8h -\n12h"]]);
//! let bytes = XlsxWriter::new().write(&sheet).unwrap();
//! assert_eq!(&bytes[..2], b"PK");
//! ```

pub mod excel;
pub mod ledger;
pub mod output;

pub use excel::{format_for, XlsxWriter};
pub use ledger::{render_ledger, write_csv, write_json, LedgerFormat, LEDGER_HEADER};
pub use output::{default_ledger_path, default_output_path, write_all_atomic, write_atomic};
