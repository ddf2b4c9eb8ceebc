//! Host filesystem gateway
//!
//! Direct pass-through to `std::fs`. Any logic around these calls lives in
//! the validation, mount and mediation layers so it can be tested against
//! `MemoryFs` instead.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::gateway::api::{EntryKind, Filesystem};

#[derive(Debug, Default, Clone, Copy)]
pub struct HostFs;

impl HostFs {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for HostFs {
    fn entry_kind(&self, path: &Path) -> Result<EntryKind, FsError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| FsError::new("lstat", path, e))?;
        let file_type = metadata.file_type();

        Ok(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path).map_err(|e| FsError::new("mkdir", path, e))
    }

    fn remove_dir(&self, path: &Path, force: bool) -> Result<(), FsError> {
        if force {
            // A missing tree is already removed
            match fs::remove_dir_all(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other.map_err(|e| FsError::new("rmdir", path, e)),
            }
        } else {
            fs::remove_dir(path).map_err(|e| FsError::new("rmdir", path, e))
        }
    }

    #[cfg(unix)]
    fn symlink(&self, target: &Path, link: &Path) -> Result<(), FsError> {
        std::os::unix::fs::symlink(target, link).map_err(|e| FsError::new("symlink", link, e))
    }

    #[cfg(windows)]
    fn symlink(&self, target: &Path, link: &Path) -> Result<(), FsError> {
        let result = if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(|e| FsError::new("symlink", link, e))
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf, FsError> {
        fs::read_link(path).map_err(|e| FsError::new("readlink", path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_env() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn missing_path_does_not_exist() {
        let dir = setup_test_env();
        let fs = HostFs::new();

        assert!(!fs.exists(&dir.path().join("nope")).unwrap());
        assert!(!fs.exists(&dir.path().join("nope/deeper")).unwrap());
        assert!(fs.exists(dir.path()).unwrap());
    }

    #[test]
    fn create_dir_all_is_idempotent() {
        let dir = setup_test_env();
        let fs = HostFs::new();
        let path = dir.path().join("a/b/c");

        fs.create_dir_all(&path).unwrap();
        fs.create_dir_all(&path).unwrap();

        assert_eq!(fs.entry_kind(&path).unwrap(), EntryKind::Directory);
        let children: Vec<_> = std::fs::read_dir(dir.path().join("a/b")).unwrap().collect();
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn remove_dir_requires_force_for_non_empty() {
        let dir = setup_test_env();
        let fs = HostFs::new();
        let path = dir.path().join("full");
        fs.create_dir_all(&path.join("child")).unwrap();
        std::fs::write(path.join("file.txt"), b"data").unwrap();

        let err = fs.remove_dir(&path, false).unwrap_err();
        assert_eq!(err.op(), "rmdir");
        assert!(fs.exists(&path).unwrap());

        fs.remove_dir(&path, true).unwrap();
        assert!(!fs.exists(&path).unwrap());
    }

    #[test]
    fn remove_dir_refuses_files_without_force() {
        let dir = setup_test_env();
        let fs = HostFs::new();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"data").unwrap();

        assert!(fs.remove_dir(&file, false).is_err());
        assert!(fs.exists(&file).unwrap());
    }

    #[test]
    fn forced_remove_of_missing_path_succeeds() {
        let dir = setup_test_env();
        let fs = HostFs::new();

        fs.remove_dir(&dir.path().join("gone"), true).unwrap();
        assert!(fs.remove_dir(&dir.path().join("gone"), false).unwrap_err().is_not_found());
    }

    #[test]
    fn mkdir_rmdir_scenario() {
        let dir = setup_test_env();
        let fs = HostFs::new();
        let path = dir.path().join("mnt/data");

        assert!(!fs.exists(&path).unwrap());
        fs.create_dir_all(&path).unwrap();
        assert!(fs.exists(&path).unwrap());
        fs.remove_dir(&path, false).unwrap();
        assert!(!fs.exists(&path).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_round_trips_target() {
        let dir = setup_test_env();
        let fs = HostFs::new();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        fs.create_dir_all(&target).unwrap();

        fs.symlink(&target, &link).unwrap();

        assert_eq!(fs.entry_kind(&link).unwrap(), EntryKind::Symlink);
        assert_eq!(fs.read_link(&link).unwrap(), target);
        assert!(fs.symlink(&target, &link).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn read_link_on_directory_is_an_error() {
        let dir = setup_test_env();
        let err = HostFs::new().read_link(dir.path()).unwrap_err();
        assert_eq!(err.op(), "readlink");
        assert!(!err.is_not_found());
    }
}
