//! Error types for workload operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::shape::TreeShape;

/// Errors that can occur while loading state or growing a tree.
///
/// All of them are terminal for the current run.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// Filesystem create/read/write/remove failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state record exists but cannot be parsed.
    #[error("Corrupt state record at {path}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested shape is smaller than the recorded one in some dimension.
    #[error("Cannot shrink tree from ({on_disk}) to ({desired})")]
    ShrinkUnsupported { on_disk: TreeShape, desired: TreeShape },

    /// A previous run left its progress marker set.
    #[error("Found an unfinished earlier run recorded at {path}, on-disk state is unknown")]
    InterruptedPriorRun { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Discriminant of a [`WorkloadError`], for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    CorruptState,
    ShrinkUnsupported,
    InterruptedPriorRun,
    InvalidConfig,
}

impl WorkloadError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::CorruptState { .. } => ErrorKind::CorruptState,
            Self::ShrinkUnsupported { .. } => ErrorKind::ShrinkUnsupported,
            Self::InterruptedPriorRun { .. } => ErrorKind::InterruptedPriorRun,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path() {
        let err = WorkloadError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_shrink_message() {
        let err = WorkloadError::ShrinkUnsupported {
            on_disk: TreeShape::new(2, 2, 2),
            desired: TreeShape::new(1, 2, 2),
        };
        assert_eq!(err.kind(), ErrorKind::ShrinkUnsupported);
        assert!(err.to_string().contains("depth=2 breadth=2 files=2"));
    }
}
