//! In-memory filesystem gateway
//!
//! A tree of directories, files and symlinks behind a mutex. Error kinds
//! mirror what the host returns for the same operation so the layers above
//! behave identically against either gateway. Paths are normalised
//! lexically; intermediate symlinks are not followed.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::FsError;
use crate::gateway::api::{EntryKind, Filesystem};

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File,
    Symlink(PathBuf),
}

#[derive(Debug)]
pub struct MemoryFs {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Creates a filesystem holding only the root directory `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Directory);
        Self {
            nodes: Mutex::new(nodes),
        }
    }

    /// Creates an empty regular file. The parent directory must exist.
    pub fn create_file(&self, path: &Path) -> Result<(), FsError> {
        let path = normalize(path);
        let path = path.as_path();
        let mut nodes = self.lock();
        Self::check_parent(&nodes, "create", path)?;
        if nodes.contains_key(path) {
            return Err(fail("create", path, io::ErrorKind::AlreadyExists));
        }
        nodes.insert(path.to_path_buf(), Node::File);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_parent(
        nodes: &BTreeMap<PathBuf, Node>,
        op: &'static str,
        path: &Path,
    ) -> Result<(), FsError> {
        let Some(parent) = path.parent() else {
            return Err(fail(op, path, io::ErrorKind::AlreadyExists));
        };
        match nodes.get(parent) {
            Some(Node::Directory) => Ok(()),
            Some(_) => Err(fail(op, path, io::ErrorKind::NotADirectory)),
            None => Err(fail(op, path, io::ErrorKind::NotFound)),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn fail(op: &'static str, path: &Path, kind: io::ErrorKind) -> FsError {
    FsError::new(op, path, io::Error::from(kind))
}

impl Filesystem for MemoryFs {
    fn entry_kind(&self, path: &Path) -> Result<EntryKind, FsError> {
        let path = normalize(path);
        let path = path.as_path();
        match self.lock().get(path) {
            Some(Node::Directory) => Ok(EntryKind::Directory),
            Some(Node::File) => Ok(EntryKind::File),
            Some(Node::Symlink(_)) => Ok(EntryKind::Symlink),
            None => Err(fail("lstat", path, io::ErrorKind::NotFound)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        let path = normalize(path);
        let path = path.as_path();
        let mut nodes = self.lock();
        let mut ancestors: Vec<&Path> = path.ancestors().collect();
        ancestors.reverse();

        for ancestor in ancestors {
            match nodes.get(ancestor).cloned() {
                Some(Node::Directory) | Some(Node::Symlink(_)) => {}
                Some(Node::File) if ancestor == path => {
                    return Err(fail("mkdir", path, io::ErrorKind::AlreadyExists));
                }
                Some(Node::File) => return Err(fail("mkdir", path, io::ErrorKind::NotADirectory)),
                None => {
                    nodes.insert(ancestor.to_path_buf(), Node::Directory);
                }
            }
        }
        Ok(())
    }

    fn remove_dir(&self, path: &Path, force: bool) -> Result<(), FsError> {
        let path = normalize(path);
        let path = path.as_path();
        let mut nodes = self.lock();

        if force {
            nodes.retain(|key, _| !key.starts_with(path));
            return Ok(());
        }

        match nodes.get(path).cloned() {
            None => Err(fail("rmdir", path, io::ErrorKind::NotFound)),
            Some(Node::File) | Some(Node::Symlink(_)) => {
                Err(fail("rmdir", path, io::ErrorKind::NotADirectory))
            }
            Some(Node::Directory) => {
                if nodes.keys().any(|key| key.parent() == Some(path)) {
                    return Err(fail("rmdir", path, io::ErrorKind::DirectoryNotEmpty));
                }
                nodes.remove(path);
                Ok(())
            }
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<(), FsError> {
        let link = normalize(link);
        let link = link.as_path();
        let mut nodes = self.lock();
        if nodes.contains_key(link) {
            return Err(fail("symlink", link, io::ErrorKind::AlreadyExists));
        }
        Self::check_parent(&nodes, "symlink", link)?;
        nodes.insert(link.to_path_buf(), Node::Symlink(target.to_path_buf()));
        Ok(())
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf, FsError> {
        let path = normalize(path);
        let path = path.as_path();
        match self.lock().get(path) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(fail("readlink", path, io::ErrorKind::InvalidInput)),
            None => Err(fail("readlink", path, io::ErrorKind::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_host_directory_semantics() {
        let fs = MemoryFs::new();
        let path = Path::new("/mnt/data");

        assert!(!fs.exists(path).unwrap());
        fs.create_dir_all(path).unwrap();
        fs.create_dir_all(path).unwrap();
        assert_eq!(fs.entry_kind(Path::new("/mnt")).unwrap(), EntryKind::Directory);

        fs.create_file(&path.join("f")).unwrap();
        let err = fs.remove_dir(path, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::DirectoryNotEmpty);

        fs.remove_dir(path, true).unwrap();
        assert!(!fs.exists(path).unwrap());
        assert!(!fs.exists(&path.join("f")).unwrap());
        assert!(fs.exists(Path::new("/mnt")).unwrap());
    }

    #[test]
    fn forced_remove_does_not_touch_siblings_with_common_prefix() {
        let fs = MemoryFs::new();
        fs.create_dir_all(Path::new("/data")).unwrap();
        fs.create_dir_all(Path::new("/database")).unwrap();

        fs.remove_dir(Path::new("/data"), true).unwrap();

        assert!(fs.exists(Path::new("/database")).unwrap());
    }

    #[test]
    fn mkdir_through_a_file_fails() {
        let fs = MemoryFs::new();
        fs.create_file(Path::new("/f")).unwrap();

        let err = fs.create_dir_all(Path::new("/f/sub")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }

    #[test]
    fn symlink_needs_parent_and_free_name() {
        let fs = MemoryFs::new();

        let err = fs.symlink(Path::new("/t"), Path::new("/no/link")).unwrap_err();
        assert!(err.is_not_found());

        fs.symlink(Path::new("/t"), Path::new("/link")).unwrap();
        assert_eq!(fs.read_link(Path::new("/link")).unwrap(), PathBuf::from("/t"));
        let err = fs.symlink(Path::new("/t"), Path::new("/link")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn read_link_on_directory_is_invalid_input() {
        let fs = MemoryFs::new();
        let err = fs.read_link(Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
