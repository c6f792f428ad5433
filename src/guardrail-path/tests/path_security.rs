//! Path validation against a real filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use guardrail_common::ErrorCategory;
use guardrail_path::{PathError, PathOptions, PathValidator, StaticFilesystem, validate_path};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn real(path: &Path) -> PathBuf {
    dunce::canonicalize(path).expect("Failed to canonicalize")
}

fn str_of(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// `<tmp>/allowed/{data/file.txt}` and `<tmp>/outside/secret.txt`.
fn layout() -> (TempDir, PathBuf, PathBuf) {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let allowed = temp.path().join("allowed");
    let outside = temp.path().join("outside");
    fs::create_dir_all(allowed.join("data")).expect("Failed to create allowed dir");
    fs::create_dir_all(&outside).expect("Failed to create outside dir");
    fs::write(allowed.join("data").join("file.txt"), "ok").expect("Failed to write file");
    fs::write(outside.join("secret.txt"), "secret").expect("Failed to write file");
    (temp, real(&allowed), real(&outside))
}

// ============================================================================
// CONTAINMENT
// ============================================================================

mod containment {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_existing_file_inside_allowed_dir() {
        let (_temp, allowed, _) = layout();
        let options = PathOptions::new().allow_dir(&allowed);

        let file = allowed.join("data").join("file.txt");
        assert_eq!(validate_path(str_of(&file), &options).unwrap(), file);
    }

    #[test]
    fn test_new_file_inside_allowed_dir() {
        let (_temp, allowed, _) = layout();
        let options = PathOptions::new().allow_dir(&allowed);

        let file = allowed.join("new").join("deeper").join("out.log");
        assert_eq!(validate_path(str_of(&file), &options).unwrap(), file);
    }

    #[test]
    fn test_allowed_dir_itself() {
        let (_temp, allowed, _) = layout();
        let options = PathOptions::new().allow_dir(&allowed);
        assert_eq!(validate_path(str_of(&allowed), &options).unwrap(), allowed);
    }

    #[test]
    fn test_sibling_with_shared_prefix_rejected() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let app = temp.path().join("app");
        let app2 = temp.path().join("app2");
        fs::create_dir(&app).expect("Failed to create dir");
        fs::create_dir(&app2).expect("Failed to create dir");

        let options = PathOptions::new().allow_dir(&app);
        let err = validate_path(str_of(&app2), &options).unwrap_err();
        assert!(matches!(err, PathError::OutsideAllowedDirs));
        assert_eq!(err.category(), ErrorCategory::Policy);

        let not_yet = temp.path().join("appendix").join("x");
        assert!(validate_path(str_of(&not_yet), &options).is_err());
    }

    #[test]
    fn test_any_of_several_allowed_dirs() {
        let (_temp, allowed, outside) = layout();
        let options = PathOptions::new()
            .allow_dir("/definitely/not/here")
            .allow_dir(&outside)
            .allow_dir(&allowed);

        assert!(validate_path(str_of(&outside.join("secret.txt")), &options).is_ok());
        assert!(validate_path(str_of(&allowed.join("data")), &options).is_ok());
    }

    #[test]
    fn test_outside_message_hides_allowlist() {
        let (_temp, allowed, outside) = layout();
        let options = PathOptions::new().allow_dir(&allowed);

        let err = validate_path(str_of(&outside.join("secret.txt")), &options).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("allowed"));
        assert!(!message.contains(str_of(&allowed)));
    }
}

// ============================================================================
// SYMLINKS
// ============================================================================

#[cfg(unix)]
mod symlinks {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_symlinked_dir_escape() {
        let (_temp, allowed, outside) = layout();
        symlink(&outside, allowed.join("link")).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        let through = allowed.join("link").join("secret.txt");
        let err = validate_path(str_of(&through), &options).unwrap_err();
        assert!(err.to_string().contains("allowed"));

        // A file that does not exist yet behind the same link
        let new_file = allowed.join("link").join("planted.txt");
        assert!(validate_path(str_of(&new_file), &options).is_err());
    }

    #[test]
    fn test_symlinked_file_escape() {
        let (_temp, allowed, outside) = layout();
        symlink(outside.join("secret.txt"), allowed.join("innocent.txt"))
            .expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        assert!(validate_path(str_of(&allowed.join("innocent.txt")), &options).is_err());
    }

    #[test]
    fn test_symlink_within_allowed_dir_resolves() {
        let (_temp, allowed, _) = layout();
        symlink(allowed.join("data"), allowed.join("alias")).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        let resolved = validate_path(str_of(&allowed.join("alias").join("file.txt")), &options)
            .expect("symlink stays inside");
        assert_eq!(resolved, allowed.join("data").join("file.txt"));
    }

    #[test]
    fn test_dangling_file_symlink_escape() {
        let (_temp, allowed, outside) = layout();
        let link = allowed.join("innocent.txt");
        symlink(outside.join("planted.txt"), &link).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        let err = validate_path(str_of(&link), &options).unwrap_err();
        assert!(matches!(err, PathError::OutsideAllowedDirs));
        assert!(!outside.join("planted.txt").exists());

        // Still rejected once the target exists
        fs::write(outside.join("planted.txt"), "x").expect("Failed to write file");
        assert!(validate_path(str_of(&link), &options).is_err());
    }

    #[test]
    fn test_dangling_dir_symlink_escape() {
        let (_temp, allowed, outside) = layout();
        symlink(outside.join("later"), allowed.join("spool")).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        let through = allowed.join("spool").join("job.txt");
        assert!(matches!(
            validate_path(str_of(&through), &options),
            Err(PathError::OutsideAllowedDirs)
        ));

        fs::create_dir(outside.join("later")).expect("Failed to create dir");
        assert!(validate_path(str_of(&through), &options).is_err());
    }

    #[test]
    fn test_dangling_relative_symlink_inside() {
        let (_temp, allowed, _) = layout();
        symlink("data/next.txt", allowed.join("next")).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        assert_eq!(
            validate_path(str_of(&allowed.join("next")), &options).unwrap(),
            allowed.join("data").join("next.txt")
        );
    }

    #[test]
    fn test_dangling_relative_symlink_climbing_out() {
        let (_temp, allowed, _) = layout();
        symlink("../outside/new.txt", allowed.join("sneaky")).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&allowed);

        assert!(validate_path(str_of(&allowed.join("sneaky")), &options).is_err());
    }

    #[test]
    fn test_allowed_dir_given_as_symlink() {
        let (temp, allowed, _) = layout();
        let link = temp.path().join("current");
        symlink(&allowed, &link).expect("Failed to create symlink");
        let options = PathOptions::new().allow_dir(&link);

        let file = allowed.join("data").join("file.txt");
        assert_eq!(validate_path(str_of(&file), &options).unwrap(), file);
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

mod traversal {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_traversal_rejected_by_default() {
        for input in ["../etc/passwd", "a/../../b", "/srv/../etc", "..", "foo/.."] {
            let err = validate_path(input, &PathOptions::default()).expect_err(input);
            assert!(err.to_string().contains("traversal"), "{input}: {err}");
        }
    }

    #[test]
    fn test_traversal_allowed_when_disabled() {
        let fs = StaticFilesystem::new("/work/project").with_entry("/");
        let validator =
            PathValidator::with_filesystem(PathOptions::new().check_traversal(false), fs);

        for (input, expected) in [
            ("../etc/passwd", "/work/etc/passwd"),
            ("a/../../b", "/work/b"),
            ("/srv/../etc", "/etc"),
        ] {
            assert_eq!(validator.validate(input).unwrap(), PathBuf::from(expected));
        }
    }

    #[test]
    fn test_traversal_cannot_escape_allowlist_when_disabled() {
        let (_temp, allowed, _) = layout();
        let options = PathOptions::new().allow_dir(&allowed).check_traversal(false);

        let sneaky = format!("{}/../outside/secret.txt", str_of(&allowed));
        assert!(validate_path(&sneaky, &options).is_err());

        let harmless = format!("{}/data/../data/file.txt", str_of(&allowed));
        assert!(validate_path(&harmless, &options).is_ok());
    }
}

// ============================================================================
// IDEMPOTENCE
// ============================================================================

#[test]
fn test_repeat_validation_is_stable() {
    let (_temp, allowed, outside) = layout();
    let options = PathOptions::new().allow_dir(&allowed);
    let validator = PathValidator::new(options);

    for path in [
        allowed.join("data").join("file.txt"),
        allowed.join("missing").join("x"),
        outside.join("secret.txt"),
    ] {
        let first = validator.validate(str_of(&path)).map_err(|e| e.to_string());
        let second = validator.validate(str_of(&path)).map_err(|e| e.to_string());
        assert_eq!(first, second);
    }
}
