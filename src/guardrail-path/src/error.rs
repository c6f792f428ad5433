//! Path validation errors.

use std::io;
use std::path::PathBuf;

use guardrail_common::ErrorCategory;
use thiserror::Error;

/// Errors produced by path validation and the file/directory checks.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("path cannot be empty")]
    Empty,

    /// A `..` segment was found, before or after normalization.
    #[error("path traversal detected: {path}")]
    Traversal { path: String },

    #[error("relative paths are not allowed: {path}")]
    RelativeNotAllowed { path: String },

    /// The allowed directories are deliberately not listed.
    #[error("path is not under allowed directories")]
    OutsideAllowedDirs,

    #[error("failed to resolve {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("too many levels of symbolic links: {}", .path.display())]
    TooManySymlinks { path: PathBuf },

    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("file is not readable: {}", .path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory not found: {}", .0.display())]
    DirNotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("directory is not writable: {}", .path.display())]
    DirNotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;

impl PathError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PathError::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse category of this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PathError::Empty => ErrorCategory::Format,
            // A missing or wrong-kind entry is a property of the input, not a
            // failing filesystem.
            PathError::Traversal { .. }
            | PathError::RelativeNotAllowed { .. }
            | PathError::OutsideAllowedDirs
            | PathError::FileNotFound(_)
            | PathError::NotAFile(_)
            | PathError::DirNotFound(_)
            | PathError::NotADirectory(_) => ErrorCategory::Policy,
            PathError::Io { .. }
            | PathError::CurrentDir(_)
            | PathError::TooManySymlinks { .. }
            | PathError::FileNotReadable { .. }
            | PathError::DirNotWritable { .. } => ErrorCategory::Io,
        }
    }

    /// Whether the error means the path simply does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            PathError::FileNotFound(_) | PathError::DirNotFound(_) => true,
            PathError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(PathError::Empty.category(), ErrorCategory::Format);
        assert_eq!(
            PathError::Traversal {
                path: "../x".to_string()
            }
            .category(),
            ErrorCategory::Policy
        );
        assert_eq!(PathError::OutsideAllowedDirs.category(), ErrorCategory::Policy);
        assert_eq!(
            PathError::io("/x", io::Error::from(io::ErrorKind::PermissionDenied)).category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_not_found_is_not_an_io_failure() {
        for err in [
            PathError::FileNotFound(PathBuf::from("/nope")),
            PathError::DirNotFound(PathBuf::from("/nope")),
            PathError::NotAFile(PathBuf::from("/etc")),
            PathError::NotADirectory(PathBuf::from("/etc/passwd")),
        ] {
            assert_eq!(err.category(), ErrorCategory::Policy, "{err}");
            assert!(err.category().is_caller_error());
        }
    }

    #[test]
    fn test_messages() {
        let err = PathError::Traversal {
            path: "../etc/passwd".to_string(),
        };
        assert!(err.to_string().contains("traversal"));
        assert!(PathError::OutsideAllowedDirs.to_string().contains("allowed"));
        assert!(PathError::Empty.to_string().contains("empty"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(PathError::FileNotFound(PathBuf::from("/x")).is_not_found());
        assert!(PathError::io("/x", io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(!PathError::io("/x", io::Error::from(io::ErrorKind::PermissionDenied)).is_not_found());
        assert!(!PathError::Empty.is_not_found());
    }
}
