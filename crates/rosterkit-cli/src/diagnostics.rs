//! Layout diagnostics on the terminal
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/info allowed) |
//! | 1 | Failure: an error was emitted, or a command failed |
//!
//! `--strict` escalates warnings to errors, so a drifted layout exits 1.

use std::io::Write;
use std::process;

use rosterkit_core::{Diagnostic, Severity};
use serde::Serialize;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Policy
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticConfig {
    /// Warnings become errors
    pub strict: bool,
    /// Only errors are printed
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        if self.strict && severity == Severity::Warning {
            Severity::Error
        } else {
            severity
        }
    }

    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || self.effective_severity(severity) == Severity::Error
    }
}

// ============================================================================
// Emitters
// ============================================================================

/// rustc-style diagnostics, one block per finding
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    error_count: usize,
    warning_count: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        // stderr may be closed
        let _ = self.write_diagnostic(diagnostic);
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        let severity = self.config.effective_severity(diagnostic.severity);
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => {}
        }
        if !self.config.should_show(diagnostic.severity) {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{}[{}]: {}",
            severity,
            diagnostic.code.as_str(),
            diagnostic.message
        )?;
        if let Some(hint) = &diagnostic.hint {
            writeln!(self.writer, "   = hint: {}", hint)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Machine-readable form of a diagnostic
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl JsonDiagnostic {
    pub fn new(diagnostic: &Diagnostic, config: &DiagnosticConfig) -> Self {
        Self {
            code: diagnostic.code.as_str(),
            severity: config.effective_severity(diagnostic.severity),
            message: diagnostic.message.clone(),
            hint: diagnostic.hint.clone(),
        }
    }
}

/// Diagnostics as a JSON array, after policy
pub fn to_json(
    diagnostics: &[Diagnostic],
    config: &DiagnosticConfig,
) -> serde_json::Result<(String, ExitCode)> {
    let items: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| JsonDiagnostic::new(d, config))
        .filter(|d| config.should_show(d.severity))
        .collect();
    let errors = diagnostics
        .iter()
        .filter(|d| config.effective_severity(d.severity) == Severity::Error)
        .count();
    Ok((
        serde_json::to_string_pretty(&items)?,
        ExitCode::from_error_count(errors),
    ))
}
