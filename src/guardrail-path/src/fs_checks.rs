//! Existence and permission checks for files and directories.
//!
//! These complement [`crate::validate_path`]: validate the path first, then
//! check that it is the kind of entry the caller expects.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::trace;

use crate::error::{PathError, PathResult};

/// Check that `path` exists and is a regular file.
pub fn ensure_file_exists(path: impl AsRef<Path>) -> PathResult<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PathError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(PathError::io(path, e)),
    };

    if !metadata.is_file() {
        return Err(PathError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Check that `path` is a regular file that can be opened for reading.
pub fn ensure_file_readable(path: impl AsRef<Path>) -> PathResult<()> {
    let path = path.as_ref();
    ensure_file_exists(path)?;

    File::open(path).map_err(|source| PathError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Check that `path` exists and is a directory.
pub fn ensure_dir_exists(path: impl AsRef<Path>) -> PathResult<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PathError::DirNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(PathError::io(path, e)),
    };

    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Check that `path` is a directory in which files can be created.
///
/// Permission bits are not trusted; a randomly named scratch file is created
/// and removed instead.
pub fn ensure_dir_writable(path: impl AsRef<Path>) -> PathResult<()> {
    let path = path.as_ref();
    ensure_dir_exists(path)?;

    let scratch = tempfile::Builder::new()
        .prefix(".guardrail-write-check-")
        .tempfile_in(path)
        .map_err(|source| PathError::DirNotWritable {
            path: path.to_path_buf(),
            source,
        })?;
    trace!(scratch = %scratch.path().display(), "scratch file created");

    scratch.close().map_err(|source| PathError::DirNotWritable {
        path: path.to_path_buf(),
        source,
    })
}
