//! Filesystem primitive interface
//!
//! The capability set every layer above talks to. Implementations are plain
//! pass-throughs: no validation, no retries.

use std::path::{Path, PathBuf};

use crate::error::FsError;

/// Kind of a directory entry as seen by lstat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

pub trait Filesystem: Send + Sync {
    /// Kind of the entry at `path` without following a final symlink.
    fn entry_kind(&self, path: &Path) -> Result<EntryKind, FsError>;

    /// Creates `path` and all missing ancestors. Succeeds if already present.
    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;

    /// Removes an empty directory, or the whole tree when `force` is set.
    fn remove_dir(&self, path: &Path, force: bool) -> Result<(), FsError>;

    /// Creates `link` as a symbolic link pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path) -> Result<(), FsError>;

    fn read_link(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Whether anything exists at `path`. "Not found" is `Ok(false)`.
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        match self.entry_kind(path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
