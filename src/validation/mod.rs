//! Path validation engine
//!
//! Decides whether every component of a path resolves, telling "never
//! existed" apart from "exists but currently unreachable". The resolution
//! mechanism is pluggable and chosen per path by configuration.

pub mod native;
pub mod resolver;
pub mod subprocess;

use std::path::Path;
use std::sync::Arc;

use log::warn;

use crate::config::{ResolverConfig, ResolverKind};
use crate::error::ValidationError;

pub use native::NativeResolver;
pub use resolver::{PathResolver, PathStatus};
pub use subprocess::SubprocessResolver;

#[derive(Clone)]
pub struct PathValidator {
    kind: ResolverKind,
    native: Arc<dyn PathResolver>,
    subprocess: Arc<dyn PathResolver>,
}

impl PathValidator {
    pub fn new(
        kind: ResolverKind,
        native: Arc<dyn PathResolver>,
        subprocess: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            kind,
            native,
            subprocess,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            config.kind,
            Arc::new(NativeResolver),
            Arc::new(SubprocessResolver::from_config(config)),
        )
    }

    /// Uses one resolver for every path.
    pub fn single(resolver: Arc<dyn PathResolver>) -> Self {
        Self::new(ResolverKind::Native, resolver.clone(), resolver)
    }

    fn resolver_for(&self, path: &Path) -> &dyn PathResolver {
        match self.kind {
            ResolverKind::Native => self.native.as_ref(),
            ResolverKind::Subprocess => self.subprocess.as_ref(),
            ResolverKind::Auto if is_remote_path(path) => self.subprocess.as_ref(),
            ResolverKind::Auto => self.native.as_ref(),
        }
    }

    pub fn resolve(&self, path: &Path) -> Result<PathStatus, ValidationError> {
        let status = self.resolver_for(path).resolve(path)?;
        if let PathStatus::Unreachable(reason) = &status {
            warn!("Path {} is unreachable: {}", path.display(), reason);
        }
        Ok(status)
    }

    /// Whether all elements of `path` exist and are reachable.
    pub fn is_path_valid(&self, path: &Path) -> Result<bool, ValidationError> {
        Ok(self.resolve(path)?.is_valid())
    }
}

/// UNC-style share paths: `\\server\share` or `//server/share`.
pub fn is_remote_path(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.starts_with(r"\\") || raw.starts_with("//")
}
