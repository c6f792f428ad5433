//! Path validation options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options controlling path validation.
///
/// The default accepts relative paths, checks for traversal and places no
/// restriction on the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Accept relative paths (resolved against the current directory).
    pub allow_relative: bool,

    /// Directories the path must live in. Empty means unrestricted.
    pub allowed_dirs: Vec<PathBuf>,

    /// Reject `..` segments.
    pub check_traversal: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_relative: true,
            allowed_dirs: Vec::new(),
            check_traversal: true,
        }
    }
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject relative input.
    pub fn allow_relative(mut self, allow: bool) -> Self {
        self.allow_relative = allow;
        self
    }

    /// Add an allowed directory.
    pub fn allow_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.allowed_dirs.push(dir.into());
        self
    }

    /// Replace the allowed directory list.
    pub fn allowed_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.allowed_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable traversal checking.
    pub fn check_traversal(mut self, check: bool) -> Self {
        self.check_traversal = check;
        self
    }

    /// Whether an allowlist is configured.
    pub fn is_restricted(&self) -> bool {
        !self.allowed_dirs.is_empty()
    }
}
