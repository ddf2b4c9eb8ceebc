//! Path resolver interface

use std::fmt;
use std::path::Path;

use crate::error::ValidationError;

/// Outcome of resolving every component of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStatus {
    Valid,
    /// Some component does not exist.
    Missing,
    /// The path could not be reached, e.g. a remote share whose
    /// credentials were revoked.
    Unreachable(String),
}

impl PathStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, PathStatus::Valid)
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStatus::Valid => write!(f, "valid"),
            PathStatus::Missing => write!(f, "missing"),
            PathStatus::Unreachable(reason) => write!(f, "unreachable ({})", reason),
        }
    }
}

pub trait PathResolver: Send + Sync {
    fn resolve(&self, path: &Path) -> Result<PathStatus, ValidationError>;
}
