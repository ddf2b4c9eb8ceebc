//! Request path checks
//!
//! Applied to every path a caller sends. `check_request_path` looks only at
//! the text and runs before any filesystem access. `check_confinement` then
//! follows the symlinks already on disk, so a link inside an allowed root
//! cannot carry a request outside it.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{FsError, ProxyError, RequestError};
use crate::gateway::{EntryKind, Filesystem};

/// Upper bound on symlinks followed while resolving one path.
const MAX_LINK_HOPS: usize = 40;

/// Rejects paths that are empty, carry control characters, are relative,
/// climb with `..`, or fall outside `allowed_roots` (when any are set).
pub fn check_request_path<'a>(
    raw: &'a str,
    allowed_roots: &[PathBuf],
) -> Result<&'a Path, RequestError> {
    if raw.is_empty() {
        return Err(RequestError::EmptyPath);
    }

    if raw.contains(['\0', '\r', '\n']) {
        return Err(RequestError::InvalidCharacters(raw.to_string()));
    }

    let path = Path::new(raw);
    if !path.is_absolute() {
        return Err(RequestError::NotAbsolute(raw.to_string()));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(RequestError::PathTraversal(raw.to_string()));
    }

    if !allowed_roots.is_empty() && !allowed_roots.iter().any(|root| path.starts_with(root)) {
        return Err(RequestError::OutsideAllowedRoots(raw.to_string()));
    }

    Ok(path)
}

/// Rejects `path` when the symlinks on its parent chain lead outside every
/// allowed root. The last component is not followed: operations act on a
/// link itself, never through it.
pub fn check_confinement<F: Filesystem + ?Sized>(
    fs: &F,
    path: &Path,
    allowed_roots: &[PathBuf],
) -> Result<(), ProxyError> {
    if allowed_roots.is_empty() {
        return Ok(());
    }

    let real = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve_links(fs, parent)?.join(name),
        _ => path.to_path_buf(),
    };

    for root in allowed_roots {
        if real.starts_with(resolve_links(fs, root)?) {
            return Ok(());
        }
    }

    Err(RequestError::OutsideAllowedRoots(path.display().to_string()).into())
}

/// Follows every symlink in `path` through the gateway. Components that do
/// not exist are kept as written.
pub fn resolve_links<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<PathBuf, FsError> {
    let mut hops = 0;
    resolve_with(fs, path, &mut hops)
}

fn resolve_with<F: Filesystem + ?Sized>(
    fs: &F,
    path: &Path,
    hops: &mut usize,
) -> Result<PathBuf, FsError> {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            // Everything before this point is already link-free
            Component::ParentDir => {
                resolved.pop();
                continue;
            }
            other => resolved.push(other.as_os_str()),
        }

        match fs.entry_kind(&resolved) {
            Ok(EntryKind::Symlink) => {}
            Ok(_) => continue,
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        }

        *hops += 1;
        if *hops > MAX_LINK_HOPS {
            return Err(FsError::new(
                "resolve",
                path,
                io::Error::other("too many levels of symbolic links"),
            ));
        }

        let target = fs.read_link(&resolved)?;
        let target = match resolved.parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target,
        };
        resolved = resolve_with(fs, &target, hops)?;
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryFs;

    #[test]
    fn accepts_plain_absolute_paths() {
        assert_eq!(
            check_request_path("/var/lib/data", &[]).unwrap(),
            Path::new("/var/lib/data")
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(check_request_path("", &[]), Err(RequestError::EmptyPath));
        assert!(matches!(
            check_request_path("/a\0b", &[]),
            Err(RequestError::InvalidCharacters(_))
        ));
        assert!(matches!(
            check_request_path("relative/dir", &[]),
            Err(RequestError::NotAbsolute(_))
        ));
        assert!(matches!(
            check_request_path("/var/lib/../../etc", &[]),
            Err(RequestError::PathTraversal(_))
        ));
    }

    #[test]
    fn allowed_roots_match_whole_components() {
        let roots = vec![PathBuf::from("/var/lib/kubelet")];

        assert!(check_request_path("/var/lib/kubelet", &roots).is_ok());
        assert!(check_request_path("/var/lib/kubelet/pods/x", &roots).is_ok());
        assert_eq!(
            check_request_path("/var/lib/kubelet-evil", &roots),
            Err(RequestError::OutsideAllowedRoots("/var/lib/kubelet-evil".into()))
        );
    }

    fn kubelet_fs() -> MemoryFs {
        let fs = MemoryFs::new();
        fs.create_dir_all(Path::new("/var/lib/kubelet/volumes/v1")).unwrap();
        fs.create_dir_all(Path::new("/etc")).unwrap();
        fs
    }

    #[test]
    fn links_leaving_the_root_are_rejected() {
        let fs = kubelet_fs();
        let roots = vec![PathBuf::from("/var/lib/kubelet")];
        fs.symlink(Path::new("/etc"), Path::new("/var/lib/kubelet/escape"))
            .unwrap();
        fs.symlink(
            Path::new("../../../etc"),
            Path::new("/var/lib/kubelet/climb"),
        )
        .unwrap();

        for path in ["/var/lib/kubelet/escape/evil", "/var/lib/kubelet/climb/x/y"] {
            match check_confinement(&fs, Path::new(path), &roots) {
                Err(ProxyError::Request(RequestError::OutsideAllowedRoots(p))) => {
                    assert_eq!(p, path)
                }
                other => panic!("unexpected result for {}: {:?}", path, other),
            }
        }

        // The link itself lives inside the root
        assert!(check_confinement(&fs, Path::new("/var/lib/kubelet/escape"), &roots).is_ok());
    }

    #[test]
    fn links_staying_inside_the_root_are_followed() {
        let fs = kubelet_fs();
        let roots = vec![PathBuf::from("/var/lib/kubelet")];
        fs.symlink(
            Path::new("volumes/v1"),
            Path::new("/var/lib/kubelet/mnt"),
        )
        .unwrap();

        assert!(check_confinement(&fs, Path::new("/var/lib/kubelet/mnt/sub"), &roots).is_ok());
        assert_eq!(
            resolve_links(&fs, Path::new("/var/lib/kubelet/mnt/sub/deeper")).unwrap(),
            Path::new("/var/lib/kubelet/volumes/v1/sub/deeper")
        );
    }

    #[test]
    fn link_loops_are_an_error() {
        let fs = kubelet_fs();
        let roots = vec![PathBuf::from("/var/lib/kubelet")];
        fs.symlink(Path::new("/var/lib/kubelet/b"), Path::new("/var/lib/kubelet/a"))
            .unwrap();
        fs.symlink(Path::new("/var/lib/kubelet/a"), Path::new("/var/lib/kubelet/b"))
            .unwrap();

        assert!(matches!(
            check_confinement(&fs, Path::new("/var/lib/kubelet/a/x"), &roots),
            Err(ProxyError::Fs(_))
        ));
    }

    #[test]
    fn no_roots_means_no_resolution() {
        let fs = kubelet_fs();
        fs.symlink(Path::new("/etc"), Path::new("/var/lib/kubelet/escape"))
            .unwrap();

        assert!(check_confinement(&fs, Path::new("/var/lib/kubelet/escape/x"), &[]).is_ok());
    }
}
