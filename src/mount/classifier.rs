//! Mount-point classification
//!
//! Volumes are attached as directory symlinks pointing at a resolved device
//! path. A path counts as a mount point when:
//!  - it exists and
//!  - it is a symbolic link and
//!  - the target of the link exists.
//!
//! A dangling link is an unmounted or torn-down volume and reads as `false`,
//! so callers can poll this during unmount races.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::FsError;
use crate::gateway::{EntryKind, Filesystem};

/// Returns true if `path` is a mount point.
///
/// A missing `path` is `Ok(false)`. Other lstat failures propagate, as does a
/// failure to read the target of an existing link.
pub fn is_mount_point<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<bool, FsError> {
    let kind = match fs.entry_kind(path) {
        Ok(kind) => kind,
        Err(e) if e.is_not_found() => return Ok(false),
        Err(e) => return Err(e),
    };

    if kind != EntryKind::Symlink {
        return Ok(false);
    }

    let target = resolve_link_target(path, fs.read_link(path)?);
    let exists = fs.exists(&target)?;
    debug!(
        "{} links to {} (target exists: {})",
        path.display(),
        target.display(),
        exists
    );
    Ok(exists)
}

/// Relative targets are relative to the directory holding the link.
fn resolve_link_target(link: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match link.parent() {
        Some(parent) => parent.join(target),
        None => target,
    }
}
