use crate::{
    artifact::BubbleArtifact,
    codec::{
        diagnostic::{CompileDiagnostic, CompileReport, FileFailure, FileOutcome},
        discovery::scan_evidence_files,
        fingerprint::fingerprint_file,
        layout::LayoutGenerator,
        links::extract_links,
    },
    config::CompilerConfig,
    error::MindseyeError,
    ledger::Ledger,
    logging::RunLog,
    paths::{file_stem_string, relative_key},
    properties::Bubble,
    stats::{CompilationStats, StatsReporter},
};
use chrono::{Local, NaiveDateTime};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

/// Marker appended to descriptions cut at the configured limit.
pub const ELLIPSIS: &str = "...";

/// Compiles an evidence tree into bubbles, at most once per relative path.
///
/// ## Run Sequence
///
/// A call to [`compile`](Self::compile) scans the evidence root, then visits each discovered file
/// in walk order:
///
/// 1. Skip it if its relative path is in the dedup set (loaded from the ledger when the compiler
///    was created, and extended with every file compiled since).
/// 2. Fingerprint the bytes. A failure leaves the file unlogged so the next run retries it.
/// 3. Read the text and derive the bubble: title, truncated description, links, layout,
///    companion image and creation stamp.
/// 4. Append a ledger row.
/// 5. Add the bubble to the batch and the path to the dedup set.
///
/// If the batch is non-empty the bubble artifact is then committed per the configured
/// [`SnapshotMode`](crate::config::SnapshotMode). A run that finds nothing new still succeeds.
///
/// ## Failure Handling
///
/// Per-file problems become [`FileOutcome::Failed`] and are gathered in the returned
/// [`CompileReport`]. Only output that cannot be committed fails the run. Ledger rows already
/// appended are not rolled back.
///
/// ## Concurrency
///
/// There is no cross-process locking. Callers must not run two compilers against one output
/// directory at the same time.
pub struct EvidenceCompiler {
    config: CompilerConfig,
    ledger: Ledger,
    artifact: BubbleArtifact,
    processed: BTreeSet<String>,
    layout: LayoutGenerator,
    run_log: Option<RunLog>,
}

impl EvidenceCompiler {
    /// Create a compiler and load the dedup set from the ledger.
    pub fn new(config: CompilerConfig) -> Result<Self, MindseyeError> {
        config.validate()?;
        let ledger = Ledger::new(config.ledger_path());
        let artifact = BubbleArtifact::new(config.bubbles_path());
        let processed = ledger.load();
        Ok(EvidenceCompiler {
            config,
            ledger,
            artifact,
            processed,
            layout: LayoutGenerator::default(),
            run_log: None,
        })
    }

    /// Convenience constructor for the two-path orchestration contract.
    pub fn simple(
        evidence_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, MindseyeError> {
        Self::new(CompilerConfig::new(evidence_root, output_dir))
    }

    /// Route this compiler's events to its own process log (`compiler.log` by default).
    pub fn with_process_log(mut self, echo_stderr: bool) -> Result<Self, MindseyeError> {
        self.run_log = Some(RunLog::open(self.config.process_log_path(), echo_stderr)?);
        Ok(self)
    }

    pub fn with_layout_generator(mut self, layout: LayoutGenerator) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn artifact(&self) -> &BubbleArtifact {
        &self.artifact
    }

    /// Relative paths known to be compiled.
    pub fn processed(&self) -> &BTreeSet<String> {
        &self.processed
    }

    pub fn is_processed(&self, relative_path: &str) -> bool {
        self.processed.contains(relative_path)
    }

    /// Run one compilation over the evidence root.
    pub fn compile(&mut self) -> Result<CompileReport, MindseyeError> {
        match self.run_log.clone() {
            Some(run_log) => run_log.in_scope(|| self.run()),
            None => self.run(),
        }
    }

    /// Read-only counters derived from the dedup set and the bubble artifact.
    pub fn stats(&self) -> CompilationStats {
        StatsReporter::new(&self.config).report_with(&self.processed)
    }

    fn run(&mut self) -> Result<CompileReport, MindseyeError> {
        let root = self.config.evidence_root.clone();
        let span = tracing::info_span!("compile", root = %root.display());
        let _guard = span.enter();
        tracing::info!("[Compiler] Starting evidence compilation...");

        let mut report = CompileReport::default();
        let files = scan_evidence_files(&root, &self.config.extensions);
        report.discovered = files.len();
        if files.is_empty() {
            let message = if root.exists() {
                format!("No evidence files found under {root:?}")
            } else {
                format!("Evidence root directory {root:?} does not exist")
            };
            tracing::warn!("[Compiler] {}", message);
            report.push(CompileDiagnostic::warning(message));
            return Ok(report);
        }

        for path in files {
            let relative = match relative_key(&root, &path) {
                Ok(relative) => relative,
                Err(e) => {
                    let shown = path.to_string_lossy().into_owned();
                    tracing::error!("[Compiler] Cannot key {:?}: {}", path, e);
                    report.push(CompileDiagnostic::error(&shown, e.to_string()));
                    report.failures.push(FileFailure {
                        relative_path: shown,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            match self.compile_file(&path, &relative, &mut report) {
                FileOutcome::AlreadyLogged => {
                    tracing::info!("[Compiler] Skipping already processed file: {}", relative);
                    report.push(CompileDiagnostic::info(format!(
                        "Skipped already processed file {relative}"
                    )));
                    report.skipped.push(relative);
                }
                FileOutcome::Failed(message) => {
                    tracing::error!("[Compiler] Error processing file {}: {}", relative, message);
                    report.push(CompileDiagnostic::error(&relative, &message));
                    report.failures.push(FileFailure {
                        relative_path: relative,
                        message,
                    });
                }
                FileOutcome::Compiled(bubble) => {
                    self.processed.insert(relative);
                    report.bubbles.push(bubble);
                }
            }
        }

        if let Some(summary) = report.error_summary() {
            tracing::warn!("[Compiler] {}", summary);
        }

        if report.bubbles.is_empty() {
            tracing::info!("[Compiler] No new files to process");
            return Ok(report);
        }

        let artifact_len = self
            .artifact
            .commit(&report.bubbles, self.config.snapshot_mode)
            .map_err(|e| {
                tracing::error!(
                    "[Compiler] Error saving bubbles file {:?}: {}",
                    self.artifact.path(),
                    e
                );
                MindseyeError::Persistence(format!(
                    "could not write {:?}: {e}",
                    self.artifact.path()
                ))
            })?;
        report.bubbles_written = Some(self.artifact.path().to_path_buf());
        report.artifact_len = Some(artifact_len);
        tracing::info!(
            "[Compiler] Successfully compiled {} bubbles to {:?}",
            report.compiled(),
            self.artifact.path()
        );

        if let Some(first) = report.ledger_failures.first() {
            return Err(MindseyeError::Ledger(format!(
                "{} ledger row(s) could not be appended to {:?}; first: {}: {}",
                report.ledger_failures.len(),
                self.ledger.path(),
                first.relative_path,
                first.message
            )));
        }

        Ok(report)
    }

    /// Steps 1-4 of the run sequence for one file.
    fn compile_file(
        &mut self,
        path: &Path,
        relative: &str,
        report: &mut CompileReport,
    ) -> FileOutcome {
        if self.processed.contains(relative) {
            return FileOutcome::AlreadyLogged;
        }
        tracing::info!("[Compiler] Processing file: {}", relative);

        let fingerprint = match fingerprint_file(path) {
            Ok(fp) => fp,
            Err(e) => return FileOutcome::Failed(format!("could not fingerprint: {e}")),
        };
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return FileOutcome::Failed(format!(
                    "could not read text: {}",
                    MindseyeError::from(e)
                ))
            }
        };

        let now = Local::now().naive_local();
        let bubble = self.assemble_bubble(path, relative, &content, now);

        if let Err(e) = self.ledger.record(relative, &fingerprint, now) {
            tracing::error!(
                "[Ledger] Could not append {} to {:?}: {}",
                relative,
                self.ledger.path(),
                e
            );
            report.push(CompileDiagnostic::warning(format!(
                "Ledger append failed for {relative}: {e}"
            )));
            report.ledger_failures.push(FileFailure {
                relative_path: relative.to_string(),
                message: e.to_string(),
            });
        }

        FileOutcome::Compiled(bubble)
    }

    fn assemble_bubble(
        &mut self,
        path: &Path,
        relative: &str,
        content: &str,
        created: NaiveDateTime,
    ) -> Bubble {
        let title = file_stem_string(path);
        let description = truncate_description(content, self.config.description_limit);
        let urls = extract_links(content);
        let image = self.companion_image(&title);
        let layout = self.layout.new_layout();
        Bubble::new(relative, title, description, layout, urls, image, created)
    }

    /// `images/<stem>.png` (relative to the evidence root) if that file exists, else empty.
    pub fn companion_image(&self, stem: &str) -> String {
        let file_name = format!("{stem}.{}", self.config.image_extension);
        if self.config.images_root().join(&file_name).exists() {
            format!("{}/{file_name}", self.config.images_dir)
        } else {
            String::new()
        }
    }
}

/// Cut `content` to `limit` characters, appending [`ELLIPSIS`] only when something was cut.
pub fn truncate_description(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &content[..byte_idx]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapshotMode;
    use tempfile::tempdir;
    use test_log::test;

    fn compiler_for(root: &Path, out: &Path) -> EvidenceCompiler {
        EvidenceCompiler::simple(root, out)
            .unwrap()
            .with_layout_generator(LayoutGenerator::seeded(1))
    }

    #[test]
    fn test_truncation_boundaries() {
        let exact = "x".repeat(500);
        assert_eq!(truncate_description(&exact, 500), exact);

        let long = "y".repeat(501);
        let cut = truncate_description(&long, 500);
        assert_eq!(cut.chars().count(), 503);
        assert!(cut.ends_with("y..."));

        assert_eq!(truncate_description("", 500), "");
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(600);
        let cut = truncate_description(&text, 500);
        assert_eq!(cut.chars().count(), 503);
        assert!(cut.starts_with("éé"));
    }

    #[test]
    fn test_new_compiler_loads_ledger() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        let out = dir.path().join("out");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();

        let mut first = compiler_for(&root, &out);
        assert!(!first.is_processed("a.txt"));
        first.compile().unwrap();

        let second = compiler_for(&root, &out);
        assert!(second.is_processed("a.txt"));
        assert_eq!(second.processed().len(), 1);
    }

    #[test]
    fn test_companion_image_probe() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        fs::create_dir_all(root.join("images")).unwrap();
        fs::write(root.join("images").join("incident.png"), b"\x89PNG").unwrap();

        let compiler = compiler_for(&root, dir.path());
        assert_eq!(compiler.companion_image("incident"), "images/incident.png");
        assert_eq!(compiler.companion_image("other"), "");
    }

    #[test]
    fn test_invalid_utf8_is_a_retryable_failure() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        let out = dir.path().join("out");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("bad.txt"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(root.join("good.md"), "fine").unwrap();

        let mut compiler = compiler_for(&root, &out);
        let report = compiler.compile().unwrap();
        assert_eq!(report.compiled(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].relative_path, "bad.txt");
        assert!(report.diagnostics.iter().any(|d| d.is_error()));
        assert!(!compiler.is_processed("bad.txt"));
        assert!(!compiler.ledger().load().contains("bad.txt"));

        // Fixing the file lets the next run pick it up.
        fs::write(root.join("bad.txt"), "now readable").unwrap();
        let report = compiler.compile().unwrap();
        assert_eq!(report.compiled(), 1);
        assert_eq!(report.bubbles[0].title, "bad");
        assert_eq!(report.skipped, vec!["good.md".to_string()]);
    }

    #[test]
    fn test_accumulate_mode_keeps_prior_bubbles() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        let out = dir.path().join("out");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let config = CompilerConfig::new(&root, &out).with_snapshot_mode(SnapshotMode::Accumulate);
        let mut compiler = EvidenceCompiler::new(config).unwrap();
        compiler.compile().unwrap();

        fs::write(root.join("b.txt"), "b").unwrap();
        let report = compiler.compile().unwrap();
        assert_eq!(report.compiled(), 1);
        assert_eq!(report.artifact_len, Some(2));
        assert_eq!(compiler.artifact().len(), 2);
    }

    #[test]
    fn test_unwritable_artifact_fails_the_run() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let mut config = CompilerConfig::new(&root, &out);
        // A directory where the artifact file should be makes the final rename fail.
        config.bubbles_file = "blocked".to_string();
        fs::create_dir_all(out.join("blocked").join("occupied")).unwrap();

        let mut compiler = EvidenceCompiler::new(config).unwrap();
        let res = compiler.compile();
        assert!(matches!(res, Err(MindseyeError::Persistence(_))));
        // The ledger row stays; there is no rollback across the batch.
        assert!(compiler.ledger().load().contains("a.txt"));
    }

    #[test]
    fn test_ledger_append_failure_commits_artifact_then_fails() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("evidence");
        let out = dir.path().join("out");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b.md"), "b").unwrap();
        // A directory where the ledger file should be makes every append fail.
        fs::create_dir_all(out.join("compiler_log.csv")).unwrap();

        let mut compiler = compiler_for(&root, &out);
        let res = compiler.compile();
        assert!(matches!(res, Err(MindseyeError::Ledger(_))));

        let written = compiler.artifact().load().unwrap();
        let sources: Vec<&str> = written.iter().map(|b| b.source.as_str()).collect();
        assert_eq!(sources, vec!["a.txt", "b.md"]);
        assert!(compiler.is_processed("a.txt"));
        assert!(compiler.is_processed("b.md"));

        // The in-memory set still keeps the same instance from compiling them again.
        let report = compiler.compile().unwrap();
        assert_eq!(report.compiled(), 0);
        assert_eq!(report.skipped.len(), 2);
    }
}
