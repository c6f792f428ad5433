//! Path validation against traversal and symlink escape.
//!
//! Validation order (first failure wins):
//! 1. Non-empty input
//! 2. Raw `..` substring check (when traversal checking is on)
//! 3. Relative input check (when relative paths are not allowed)
//! 4. Absolutize against the current directory, clean lexically
//! 5. Structural `..` segment check on the cleaned path
//! 6. Resolve symlinks through the deepest existing ancestor, following
//!    dangling links to their targets
//! 7. Containment in an allowed directory, compared by whole components
//!
//! The returned path reflects the filesystem at validation time. A symlink
//! swapped in afterwards is not detected.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{PathError, PathResult};
use crate::fs::{Filesystem, OsFilesystem};
use crate::normalize::{absolutize, clean_path, contains_traversal_segment, is_within_dir};
use crate::options::PathOptions;

/// Dangling symlinks followed while resolving one path.
const MAX_SYMLINK_HOPS: usize = 40;

/// Reusable path validator.
#[derive(Debug, Clone)]
pub struct PathValidator<F = OsFilesystem> {
    options: PathOptions,
    fs: F,
}

impl PathValidator<OsFilesystem> {
    /// Create a validator backed by the real filesystem.
    pub fn new(options: PathOptions) -> Self {
        Self::with_filesystem(options, OsFilesystem)
    }
}

impl Default for PathValidator<OsFilesystem> {
    fn default() -> Self {
        Self::new(PathOptions::default())
    }
}

impl<F: Filesystem> PathValidator<F> {
    /// Create a validator with a custom filesystem.
    pub fn with_filesystem(options: PathOptions, fs: F) -> Self {
        Self { options, fs }
    }

    /// Get the options.
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Validate a path, returning its absolute, cleaned and symlink-resolved
    /// form.
    pub fn validate(&self, input: &str) -> PathResult<PathBuf> {
        self.validate_inner(input).inspect_err(log_rejection)
    }

    fn validate_inner(&self, input: &str) -> PathResult<PathBuf> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        if self.options.check_traversal && input.contains("..") {
            return Err(traversal(input));
        }

        let raw = Path::new(input);
        if !self.options.allow_relative && !raw.is_absolute() {
            return Err(PathError::RelativeNotAllowed {
                path: input.to_string(),
            });
        }

        let absolute = self.absolute(raw)?;

        if self.options.check_traversal && contains_traversal_segment(&absolute) {
            return Err(traversal(input));
        }

        let resolved = self.resolve(&absolute)?;
        trace!(input, resolved = %resolved.display(), "path resolved");

        if self.options.is_restricted() {
            let allowed = self.allowed_dirs();
            if !allowed.iter().any(|dir| is_within_dir(&resolved, dir)) {
                return Err(PathError::OutsideAllowedDirs);
            }
        }

        Ok(resolved)
    }

    fn absolute(&self, path: &Path) -> PathResult<PathBuf> {
        if path.is_absolute() {
            return Ok(clean_path(path));
        }
        let cwd = self.fs.current_dir().map_err(PathError::CurrentDir)?;
        Ok(absolutize(path, &cwd))
    }

    /// Resolve symlinks in `path`.
    ///
    /// An existing path resolves to its real path. Otherwise the deepest
    /// existing ancestor is resolved and the missing components re-appended,
    /// so a symlinked parent directory is still followed. A dangling symlink
    /// on the way is replaced by its target, so a link to a file that does
    /// not exist yet is judged by where a write would land. A path with no
    /// existing ancestor is returned as is.
    fn resolve(&self, path: &Path) -> PathResult<PathBuf> {
        self.resolve_with_hops(path, MAX_SYMLINK_HOPS)
    }

    fn resolve_with_hops(&self, path: &Path, hops_left: usize) -> PathResult<PathBuf> {
        let mut existing = path;
        let mut missing: Vec<OsString> = Vec::new();

        let mut real = loop {
            match self.fs.real_path(existing) {
                Ok(real) => break real,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(PathError::io(existing, e)),
            }

            match self.fs.read_link(existing) {
                Ok(target) => break self.follow_dangling(existing, &target, hops_left)?,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput
                    ) => {}
                Err(e) => return Err(PathError::io(existing, e)),
            }

            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return Ok(path.to_path_buf()),
            }
        };

        for name in missing.iter().rev() {
            real.push(name);
        }
        Ok(real)
    }

    /// Resolve the target of a symlink whose target does not exist.
    ///
    /// A relative target is taken relative to the real directory holding the
    /// link.
    fn follow_dangling(&self, link: &Path, target: &Path, hops_left: usize) -> PathResult<PathBuf> {
        if hops_left == 0 {
            return Err(PathError::TooManySymlinks {
                path: link.to_path_buf(),
            });
        }

        let dir = match link.parent() {
            Some(parent) => self
                .fs
                .real_path(parent)
                .map_err(|e| PathError::io(parent, e))?,
            None => PathBuf::from(link),
        };
        let joined = absolutize(target, &dir);
        trace!(link = %link.display(), target = %joined.display(), "following dangling symlink");

        self.resolve_with_hops(&joined, hops_left - 1)
    }

    /// Allowed directories in resolved form. Entries that cannot be made
    /// absolute or resolved are skipped.
    fn allowed_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.options.allowed_dirs.len());
        for dir in &self.options.allowed_dirs {
            if dir.as_os_str().is_empty() {
                continue;
            }
            let resolved = self
                .absolute(dir)
                .and_then(|absolute| self.resolve(&absolute));
            match resolved {
                Ok(resolved) => dirs.push(resolved),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unresolvable allowed directory")
                }
            }
        }
        dirs
    }
}

/// Validate a path against the real filesystem.
pub fn validate_path(input: &str, options: &PathOptions) -> PathResult<PathBuf> {
    PathValidator::new(options.clone()).validate(input)
}

fn traversal(input: &str) -> PathError {
    PathError::Traversal {
        path: input.to_string(),
    }
}

fn log_rejection(err: &PathError) {
    debug!(category = %err.category(), reason = %err, "path rejected");
}
