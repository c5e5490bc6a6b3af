//! Per-file outcomes and run diagnostics.
//!
//! A compilation run never raises across the batch boundary for a single bad file. Each file
//! resolves to a [`FileOutcome`], and anything worth telling the operator is recorded as a
//! [`CompileDiagnostic`] on the run's [`CompileReport`].

use crate::properties::Bubble;
use std::path::PathBuf;

/// What happened to one discovered evidence file.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// A new bubble was produced and the file was recorded in the ledger.
    Compiled(Bubble),
    /// The relative path is already in the ledger (or was compiled earlier this run).
    AlreadyLogged,
    /// The file could not be processed this run. It stays unlogged and will be retried.
    Failed(String),
}

/// Diagnostic information produced during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileDiagnostic {
    Info(String),
    Warning(String),
    /// A per-file failure.
    Error {
        path: String,
        message: String,
    },
}

impl CompileDiagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}

/// A file the run could not compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub relative_path: String,
    pub message: String,
}

/// Summary of a single compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Evidence files found under the root.
    pub discovered: usize,
    /// Bubbles produced by this run, in processing order.
    pub bubbles: Vec<Bubble>,
    /// Files skipped because the ledger already held them.
    pub skipped: Vec<String>,
    pub failures: Vec<FileFailure>,
    /// Ledger rows that could not be appended, with their cause.
    pub ledger_failures: Vec<FileFailure>,
    pub diagnostics: Vec<CompileDiagnostic>,
    /// Where the bubble artifact was written, if this run wrote it.
    pub bubbles_written: Option<PathBuf>,
    /// Size of the bubble artifact after the write (equals `bubbles.len()` in overwrite mode).
    pub artifact_len: Option<usize>,
}

impl CompileReport {
    pub fn compiled(&self) -> usize {
        self.bubbles.len()
    }

    pub fn push(&mut self, diagnostic: CompileDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let listed = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.relative_path, f.message))
            .collect::<Vec<String>>()
            .join("; ");
        Some(format!(
            "{} file(s) could not be compiled: {listed}",
            self.failures.len()
        ))
    }
}
