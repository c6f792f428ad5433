//! Lexical path helpers. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components lexically.
///
/// `..` never climbs above the root of an absolute path. For relative paths
/// a leading `..` that cannot be popped is kept. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }

    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Join a relative path onto `base` and clean the result. Absolute paths are
/// only cleaned.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        clean_path(path)
    } else {
        clean_path(&base.join(path))
    }
}

/// Whether any component of the path is `..`.
pub fn contains_traversal_segment(path: &Path) -> bool {
    path.components().any(|c| c == Component::ParentDir)
}

/// Whether `path` is `dir` itself or lies below it.
///
/// Comparison is by whole components, so `/tmpfoo` is not within `/tmp`.
pub fn is_within_dir(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}
