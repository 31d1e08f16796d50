//! Error types for reduce invocations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for reduce operations
pub type Result<T> = std::result::Result<T, ReduceError>;

/// A record that could not be written to the output artifact.
#[derive(Debug)]
pub struct RecordWriteFailure {
    /// Position of the record in the result sequence.
    pub index: usize,
    /// Key of the record, for diagnostics.
    pub key: String,
    pub error: io::Error,
}

/// Reduce error types
#[derive(Error, Debug)]
pub enum ReduceError {
    /// An expected intermediate file could not be opened
    #[error("missing source #{source_index}: cannot open {}: {source}", .path.display())]
    MissingSource {
        path: PathBuf,
        source_index: usize,
        source: io::Error,
    },

    /// A partition's result file could not be opened for reading back
    #[error("missing result of partition {partition}: cannot open {}: {source}", .path.display())]
    MissingResult {
        path: PathBuf,
        partition: usize,
        source: io::Error,
    },

    /// The output artifact could not be created
    #[error("cannot create output {}: {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    /// Some result records were not written
    #[error(
        "incomplete output {}: {written} records written, {} failed",
        .path.display(),
        .failures.len()
    )]
    IncompleteOutput {
        path: PathBuf,
        written: usize,
        failures: Vec<RecordWriteFailure>,
    },

    /// Configuration could not be interpreted
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReduceError {
    /// Whether re-running the same invocation may succeed.
    ///
    /// Missing inputs and output failures depend on the environment; a bad
    /// configuration fails the same way every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MissingSource { .. }
            | Self::MissingResult { .. }
            | Self::CreateOutput { .. }
            | Self::IncompleteOutput { .. } => true,
            Self::InvalidConfig(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_message_names_the_file() {
        let err = ReduceError::MissingSource {
            path: PathBuf::from("mrtmp.j-1-0"),
            source_index: 1,
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("mrtmp.j-1-0"), "{msg}");
        assert!(msg.contains("#1"), "{msg}");
        assert!(err.is_retryable());
    }

    #[test]
    fn invalid_config_is_not_retryable() {
        assert!(!ReduceError::InvalidConfig("bad".into()).is_retryable());
    }
}
