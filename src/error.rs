use std::{fmt, io, path::StripPrefixError};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum MindseyeError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Ledger error: {0}")]
    Ledger(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource: {0}")]
    PermissionDenied(String),
    #[error("Could not commit compiled output: {0}")]
    Persistence(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl MindseyeError {
    /// Whether the error should abort a run, as opposed to being recorded against a single file.
    pub fn is_run_level(&self) -> bool {
        matches!(
            self,
            MindseyeError::Config(_) | MindseyeError::Ledger(_) | MindseyeError::Persistence(_)
        )
    }
}

impl From<StripPrefixError> for MindseyeError {
    fn from(src: StripPrefixError) -> MindseyeError {
        MindseyeError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl From<toml::de::Error> for MindseyeError {
    fn from(src: toml::de::Error) -> MindseyeError {
        MindseyeError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for MindseyeError {
    fn from(src: toml::ser::Error) -> MindseyeError {
        MindseyeError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for MindseyeError {
    fn from(src: JsonError) -> MindseyeError {
        MindseyeError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<csv::Error> for MindseyeError {
    fn from(src: csv::Error) -> MindseyeError {
        match src.kind() {
            csv::ErrorKind::Io(io_err) => MindseyeError::Io(format!("CSV IOError: {io_err}")),
            _ => MindseyeError::Serialization(format!("CSV (de)serialization error: {src}")),
        }
    }
}

impl From<walkdir::Error> for MindseyeError {
    fn from(src: walkdir::Error) -> MindseyeError {
        let path = src
            .path()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "<unknown>".to_string());
        MindseyeError::Io(format!("Directory walk failed at {path}: {src}"))
    }
}

impl From<io::Error> for MindseyeError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => MindseyeError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => MindseyeError::PermissionDenied(format!("{x}")),
            io::ErrorKind::InvalidData => {
                MindseyeError::Serialization(format!("Invalid UTF-8 text: {x}"))
            }
            _ => MindseyeError::Io(format!("IOError: {}: {x}", x.kind())),
        }
    }
}

impl From<fmt::Error> for MindseyeError {
    fn from(x: fmt::Error) -> Self {
        MindseyeError::Custom(format!("{x}"))
    }
}

impl From<RegexError> for MindseyeError {
    fn from(x: RegexError) -> Self {
        MindseyeError::Serialization(format!("Regex parse failed: {x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn io_error_kinds_map_to_variants() {
        let not_found: MindseyeError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(not_found, MindseyeError::NotFound(_)));

        let denied: MindseyeError = io::Error::new(io::ErrorKind::PermissionDenied, "no").into();
        assert!(matches!(denied, MindseyeError::PermissionDenied(_)));

        let other: MindseyeError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(other, MindseyeError::Io(_)));
        assert!(!other.is_run_level());
    }

    #[test]
    fn persistence_errors_are_run_level() {
        assert!(MindseyeError::Persistence("disk full".into()).is_run_level());
        assert!(MindseyeError::Ledger("append failed".into()).is_run_level());
    }
}
