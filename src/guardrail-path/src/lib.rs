//! Path traversal and symlink escape protection for guardrail.
//!
//! [`validate_path`] turns an untrusted path string into an absolute, cleaned,
//! symlink-resolved path, rejecting:
//! - `..` sequences, both in the raw input and after normalization
//! - Relative paths, when configured
//! - Paths outside the allowed directories, compared by whole components so
//!   `/tmp/app2` is not inside `/tmp/app`
//! - Symlinks (including symlinked parent directories) that lead outside the
//!   allowed directories
//!
//! # Example
//!
//! ```rust,no_run
//! use guardrail_path::{PathOptions, validate_path};
//!
//! let options = PathOptions::new().allow_dir("/srv/uploads");
//! let path = validate_path("/srv/uploads/report.pdf", &options)?;
//! # Ok::<(), guardrail_path::PathError>(())
//! ```

pub mod error;
pub mod fs;
pub mod fs_checks;
pub mod normalize;
pub mod options;
pub mod validate;

pub use error::{PathError, PathResult};
pub use fs::{Filesystem, OsFilesystem, StaticFilesystem};
pub use fs_checks::{ensure_dir_exists, ensure_dir_writable, ensure_file_exists, ensure_file_readable};
pub use normalize::{absolutize, clean_path, contains_traversal_segment, is_within_dir};
pub use options::PathOptions;
pub use validate::{PathValidator, validate_path};
