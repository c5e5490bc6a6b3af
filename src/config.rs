use crate::error::MindseyeError;
use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

/// Conventional name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "mindseye.toml";

/// How the bubble artifact is committed at the end of a run that produced new bubbles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    /// Replace the artifact with this run's bubbles only.
    #[default]
    Overwrite,
    /// Merge this run's bubbles into the existing artifact, keyed by source path.
    Accumulate,
}

/// Everything a compilation run needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub evidence_root: PathBuf,
    pub output_dir: PathBuf,
    pub bubbles_file: String,
    pub ledger_file: String,
    pub process_log: String,
    /// Subdirectory of the evidence root probed for companion images.
    pub images_dir: String,
    pub image_extension: String,
    /// Evidence file extensions, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Maximum description length in characters before the ellipsis is appended.
    pub description_limit: usize,
    pub snapshot_mode: SnapshotMode,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            evidence_root: PathBuf::from("/evidence"),
            output_dir: PathBuf::from("."),
            bubbles_file: "bubbles.json".to_string(),
            ledger_file: "compiler_log.csv".to_string(),
            process_log: "compiler.log".to_string(),
            images_dir: "images".to_string(),
            image_extension: "png".to_string(),
            extensions: vec!["txt".to_string(), "md".to_string()],
            description_limit: 500,
            snapshot_mode: SnapshotMode::Overwrite,
        }
    }
}

impl CompilerConfig {
    pub fn new(evidence_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        CompilerConfig {
            evidence_root: evidence_root.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_snapshot_mode(mut self, mode: SnapshotMode) -> Self {
        self.snapshot_mode = mode;
        self
    }

    /// Load a config from a toml file. A missing file yields the defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, MindseyeError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read compiler config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(CompilerConfig::default());
        }
        let content = read_to_string(path)?;
        let config: CompilerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, MindseyeError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), MindseyeError> {
        if self.extensions.is_empty() {
            return Err(MindseyeError::Config(
                "at least one evidence extension is required".to_string(),
            ));
        }
        for (name, value) in [
            ("bubbles_file", &self.bubbles_file),
            ("ledger_file", &self.ledger_file),
            ("process_log", &self.process_log),
        ] {
            if value.trim().is_empty() {
                return Err(MindseyeError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn bubbles_path(&self) -> PathBuf {
        self.output_dir.join(&self.bubbles_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.output_dir.join(&self.ledger_file)
    }

    pub fn process_log_path(&self) -> PathBuf {
        self.output_dir.join(&self.process_log)
    }

    pub fn images_root(&self) -> PathBuf {
        self.evidence_root.join(&self.images_dir)
    }
}
