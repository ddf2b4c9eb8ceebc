//! Native path resolution
//!
//! Follows the whole path through the OS, symlinks included, so a path only
//! counts as valid when every component resolves.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::error::ValidationError;
use crate::validation::resolver::{PathResolver, PathStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeResolver;

impl PathResolver for NativeResolver {
    fn resolve(&self, path: &Path) -> Result<PathStatus, ValidationError> {
        match fs::metadata(path) {
            Ok(_) => Ok(PathStatus::Valid),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(PathStatus::Missing)
            }
            Err(e) => {
                debug!("Resolving {} failed: {}", path.display(), e);
                Ok(PathStatus::Unreachable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(NativeResolver.resolve(dir.path()).unwrap(), PathStatus::Valid);
    }

    #[test]
    fn missing_component_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let status = NativeResolver.resolve(&dir.path().join("a/b")).unwrap();
        assert_eq!(status, PathStatus::Missing);
    }

    #[test]
    fn file_used_as_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let status = NativeResolver.resolve(&file.join("child")).unwrap();
        assert_eq!(status, PathStatus::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

        assert_eq!(NativeResolver.resolve(&link).unwrap(), PathStatus::Missing);
    }
}
