//! Process log sink owned by a compiler instance.
//!
//! The pipeline never installs a global subscriber. A [`RunLog`] wraps its own
//! [`tracing::Dispatch`] writing plain-text lines to the process log file (and optionally to
//! stderr); [`EvidenceCompiler`](crate::codec::EvidenceCompiler) enters it for the duration of a
//! run. Two compilers with different output directories therefore log to different files even
//! inside one process.

use crate::error::MindseyeError;
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::Dispatch;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct RunLog {
    dispatch: Dispatch,
    path: PathBuf,
}

impl RunLog {
    /// Append to `path`, creating it and its parent directory if needed.
    ///
    /// The level filter honours `RUST_LOG` and defaults to `info`.
    pub fn open<P: AsRef<Path>>(path: P, echo_stderr: bool) -> Result<Self, MindseyeError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file));
        let stderr_layer = echo_stderr.then(|| fmt::layer().with_writer(std::io::stderr));

        let subscriber = Registry::default()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer);

        Ok(RunLog {
            dispatch: Dispatch::new(subscriber),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` with this sink as the current thread's default subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
