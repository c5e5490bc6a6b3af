//! Read-only summary counters over the ledger and the bubble artifact.

use crate::{
    artifact::BubbleArtifact,
    codec::discovery::scan_evidence_files,
    config::CompilerConfig,
    ledger::Ledger,
    paths::relative_key,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// Snapshot of compilation state. Computing it never mutates anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationStats {
    /// Size of the dedup set.
    pub total_processed_files: usize,
    /// Records in the bubble artifact; zero when it is absent or unreadable.
    pub total_bubbles: usize,
    pub bubbles_file_exists: bool,
    pub log_file_exists: bool,
    pub evidence_root_exists: bool,
    /// Evidence files currently discoverable under the root.
    pub evidence_files: usize,
}

impl fmt::Display for CompilationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  total_processed_files: {}", self.total_processed_files)?;
        writeln!(f, "  total_bubbles: {}", self.total_bubbles)?;
        writeln!(f, "  bubbles_file_exists: {}", self.bubbles_file_exists)?;
        writeln!(f, "  log_file_exists: {}", self.log_file_exists)?;
        writeln!(f, "  evidence_root_exists: {}", self.evidence_root_exists)?;
        write!(f, "  evidence_files: {}", self.evidence_files)
    }
}

pub struct StatsReporter<'a> {
    config: &'a CompilerConfig,
}

impl<'a> StatsReporter<'a> {
    pub fn new(config: &'a CompilerConfig) -> Self {
        StatsReporter { config }
    }

    /// Stats with the dedup set read fresh from the ledger.
    pub fn report(&self) -> CompilationStats {
        let processed = Ledger::new(self.config.ledger_path()).load();
        self.report_with(&processed)
    }

    /// Stats against a dedup set the caller already holds.
    pub fn report_with(&self, processed: &BTreeSet<String>) -> CompilationStats {
        let artifact = BubbleArtifact::new(self.config.bubbles_path());
        CompilationStats {
            total_processed_files: processed.len(),
            total_bubbles: artifact.len(),
            bubbles_file_exists: artifact.exists(),
            log_file_exists: self.config.ledger_path().exists(),
            evidence_root_exists: self.config.evidence_root.exists(),
            evidence_files: self.evidence_files().len(),
        }
    }

    /// Relative paths of the discoverable evidence files, in walk order.
    pub fn evidence_files(&self) -> Vec<String> {
        let root = &self.config.evidence_root;
        scan_evidence_files(root, &self.config.extensions)
            .iter()
            .filter_map(|path| relative_key(root, path).ok())
            .collect()
    }

    /// The first `n` evidence files, for a short listing.
    pub fn sample_files(&self, n: usize) -> Vec<String> {
        self.evidence_files().into_iter().take(n).collect()
    }
}
