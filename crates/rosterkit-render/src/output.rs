//! File output
//!
//! Bytes go to a temporary file next to the destination, which is renamed
//! over the destination once fully written. A failed run leaves no partial
//! file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use rosterkit_core::RenderError;
use tempfile::NamedTempFile;
use tracing::debug;

fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile, RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// Atomically write `bytes` to `path`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    write_all_atomic(&[(path, bytes)])
}

/// Write several files, each atomically.
///
/// Every file is staged before any is moved into place, so a failure while
/// writing leaves all destinations untouched.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<(), RenderError> {
    let staged = files
        .iter()
        .map(|(path, bytes)| stage(path, bytes))
        .collect::<Result<Vec<_>, _>>()?;
    for (file, (path, bytes)) in staged.into_iter().zip(files) {
        file.persist(path).map_err(|e| RenderError::Io(e.error))?;
        debug!(path = %path.display(), bytes = bytes.len(), "file written");
    }
    Ok(())
}

/// `<stem>_planning.xlsx` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_planning.xlsx", file_stem(input)))
}

/// `<stem>_ledger.csv` next to the planning workbook, `<stem>` taken from the input
pub fn default_ledger_path(input: &Path, planning: &Path) -> PathBuf {
    planning.with_file_name(format!("{}_ledger.csv", file_stem(input)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster".into())
}
