//! Mediated proxy operations
//!
//! Each operation checks its request paths, evaluates the predicates its
//! contract requires, and only then performs a single gateway call. A failed
//! check means nothing was touched. Nothing is retried: a race between check
//! and mutation surfaces as the mutation's own error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::config::ServerConfig;
use crate::error::{ProxyError, RequestError};
use crate::gateway::{Filesystem, HostFs};
use crate::mediation::checks::{check_confinement, check_request_path};
use crate::mount;
use crate::validation::PathValidator;

#[derive(Clone)]
pub struct FsProxy {
    fs: Arc<dyn Filesystem>,
    validator: PathValidator,
    allowed_roots: Vec<PathBuf>,
}

impl FsProxy {
    pub fn new(fs: Arc<dyn Filesystem>, validator: PathValidator) -> Self {
        Self {
            fs,
            validator,
            allowed_roots: Vec::new(),
        }
    }

    /// Confines every request path to one of `roots`.
    pub fn with_allowed_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.allowed_roots = roots;
        self
    }

    /// Host filesystem with the configured resolver and roots.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Arc::new(HostFs::new()),
            PathValidator::from_config(&config.resolver),
        )
        .with_allowed_roots(config.allowed_roots.clone())
    }

    /// Text checks first, then the symlinks already on disk.
    fn check<'a>(&self, raw: &'a str) -> Result<&'a Path, ProxyError> {
        let path = check_request_path(raw, &self.allowed_roots)?;
        check_confinement(self.fs.as_ref(), path, &self.allowed_roots)?;
        Ok(path)
    }

    /// Whether anything exists at `path`.
    pub fn path_exists(&self, path: &str) -> Result<bool, ProxyError> {
        let path = self.check(path)?;
        let exists = self.fs.exists(path)?;
        debug!("PathExists {} -> {}", path.display(), exists);
        Ok(exists)
    }

    /// Whether every element of `path` resolves, including the connection
    /// behind a remote share.
    pub fn path_valid(&self, path: &str) -> Result<bool, ProxyError> {
        let path = self.check(path)?;
        let valid = self.validator.is_path_valid(path)?;
        debug!("PathValid {} -> {}", path.display(), valid);
        Ok(valid)
    }

    pub fn mkdir(&self, path: &str) -> Result<(), ProxyError> {
        let path = self.check(path)?;
        self.fs.create_dir_all(path)?;
        info!("Created directory {}", path.display());
        Ok(())
    }

    pub fn rmdir(&self, path: &str, force: bool) -> Result<(), ProxyError> {
        let path = self.check(path)?;
        if self.allowed_roots.iter().any(|root| root == path) {
            return Err(RequestError::ProtectedRoot(path.display().to_string()).into());
        }
        self.fs.remove_dir(path, force)?;
        info!("Removed directory {} (force: {})", path.display(), force);
        Ok(())
    }

    /// Creates `link` pointing at `target`. The link must not exist yet and
    /// the target must.
    pub fn link_path(&self, target: &str, link: &str) -> Result<(), ProxyError> {
        let target = self.check(target)?;
        let link = self.check(link)?;

        if self.fs.exists(link)? {
            return Err(RequestError::LinkAlreadyExists(link.display().to_string()).into());
        }
        if !self.fs.exists(target)? {
            return Err(RequestError::TargetNotFound(target.display().to_string()).into());
        }

        self.fs.symlink(target, link)?;
        info!("Linked {} -> {}", link.display(), target.display());
        Ok(())
    }

    pub fn is_mount_point(&self, path: &str) -> Result<bool, ProxyError> {
        let path = self.check(path)?;
        let mounted = mount::is_mount_point(self.fs.as_ref(), path)?;
        debug!("IsMountPoint {} -> {}", path.display(), mounted);
        Ok(mounted)
    }
}
