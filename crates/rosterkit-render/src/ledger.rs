//! Ledger artifact writers
//!
//! The CSV form has one record per assignment under a fixed header:
//!
//! ```text
//! date,group,surname,given_name
//! 04/03/2025,Remplaçant 1 G1,MARTIN,Jean
//! ```

use std::io::Write;

use rosterkit_core::{Assignment, RenderError};
use serde::Serialize;

/// Column names of the CSV artifact
pub const LEDGER_HEADER: [&str; 4] = ["date", "group", "surname", "given_name"];

/// Serialization of the ledger artifact
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LedgerFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Serialize)]
struct LedgerRecord<'a> {
    date: String,
    group: &'a str,
    surname: &'a str,
    given_name: &'a str,
}

impl<'a> From<&'a Assignment> for LedgerRecord<'a> {
    fn from(a: &'a Assignment) -> Self {
        Self {
            date: a.date_key(),
            group: &a.group,
            surname: &a.surname,
            given_name: &a.given_name,
        }
    }
}

fn csv_error(e: csv::Error) -> RenderError {
    RenderError::Format(format!("CSV: {e}"))
}

/// Write assignments as CSV; the header is written even when there are none
pub fn write_csv<W: Write>(assignments: &[Assignment], out: W) -> Result<(), RenderError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(LEDGER_HEADER).map_err(csv_error)?;
    for assignment in assignments {
        writer
            .serialize(LedgerRecord::from(assignment))
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write assignments as a pretty-printed JSON array
pub fn write_json<W: Write>(assignments: &[Assignment], out: W) -> Result<(), RenderError> {
    let records: Vec<LedgerRecord<'_>> = assignments.iter().map(LedgerRecord::from).collect();
    serde_json::to_writer_pretty(out, &records)
        .map_err(|e| RenderError::Format(format!("JSON: {e}")))
}

/// Render the ledger in the requested format
pub fn render_ledger(
    assignments: &[Assignment],
    format: LedgerFormat,
) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Vec::new();
    match format {
        LedgerFormat::Csv => write_csv(assignments, &mut buffer)?,
        LedgerFormat::Json => {
            write_json(assignments, &mut buffer)?;
            buffer.push(b'\n');
        }
    }
    Ok(buffer)
}
