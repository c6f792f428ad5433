//! Filesystem seam used by the path validator.
//!
//! Path validation only needs three things from the filesystem: the current
//! directory, the real (symlink-resolved) path of an existing entry and the
//! target of a symlink, which may not exist yet.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem lookups needed for path validation.
pub trait Filesystem: Send + Sync {
    /// Directory relative paths are resolved against.
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Absolute path with every symlink resolved.
    ///
    /// Must fail with [`io::ErrorKind::NotFound`] when the path does not exist.
    fn real_path(&self, path: &Path) -> io::Result<PathBuf>;

    /// Target of the symlink at `path`, as stored in the link.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when nothing exists at `path`
    /// and with [`io::ErrorKind::InvalidInput`] when it is not a symlink.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn current_dir(&self) -> io::Result<PathBuf> {
        (**self).current_dir()
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).real_path(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).read_link(path)
    }
}

/// The operating system's filesystem.
///
/// Canonicalization goes through `dunce` so Windows results are plain paths
/// rather than `\\?\` verbatim paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Real(PathBuf),
    Error(io::ErrorKind),
}

/// In-memory filesystem with a fixed set of existing paths.
///
/// Every registered path maps to its real path. Lookups are exact: a path
/// that is not registered does not exist. Symlinks also remember their raw
/// target so dangling links can be modelled.
#[derive(Debug, Clone)]
pub struct StaticFilesystem {
    cwd: PathBuf,
    entries: HashMap<PathBuf, Entry>,
    links: HashMap<PathBuf, PathBuf>,
}

impl StaticFilesystem {
    /// Create an empty filesystem with the given current directory.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            entries: HashMap::new(),
            links: HashMap::new(),
        }
    }

    /// Register a regular entry whose real path is itself.
    pub fn with_entry(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.entries.insert(path.clone(), Entry::Real(path));
        self
    }

    /// Register a symlink resolving to `target`.
    pub fn with_symlink(mut self, link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let (link, target) = (link.into(), target.into());
        self.links.insert(link.clone(), target.clone());
        self.entries.insert(link, Entry::Real(target));
        self
    }

    /// Register a symlink whose target does not exist. `target` may be
    /// relative to the link's directory.
    pub fn with_dangling_symlink(
        mut self,
        link: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        let link = link.into();
        self.entries.remove(&link);
        self.links.insert(link, target.into());
        self
    }

    /// Make lookups of `path` fail with `kind`.
    pub fn with_error(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.entries.insert(path.into(), Entry::Error(kind));
        self
    }
}

impl Filesystem for StaticFilesystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        match self.entries.get(path) {
            Some(Entry::Real(real)) => Ok(real.clone()),
            Some(Entry::Error(kind)) => Err(io::Error::from(*kind)),
            None => Err(not_found(path)),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        if let Some(target) = self.links.get(path) {
            return Ok(target.clone());
        }
        match self.entries.get(path) {
            Some(Entry::Real(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a symlink", path.display()),
            )),
            Some(Entry::Error(kind)) => Err(io::Error::from(*kind)),
            None => Err(not_found(path)),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}
