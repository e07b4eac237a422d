//! Directory provisioning effect

use std::path::Path;

use crate::core::{LogError, LogResult};

/// Guarantees that a log directory exists before file sinks are composed
///
/// Implementations report failure through the result; they must not panic.
pub trait DirectoryProvisioner: Send + Sync {
    /// Create `path` and any missing parents
    fn ensure(&self, path: &Path) -> LogResult<()>;
}

/// Provisioner backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProvisioner;

impl DirectoryProvisioner for FsProvisioner {
    fn ensure(&self, path: &Path) -> LogResult<()> {
        std::fs::create_dir_all(path).map_err(|source| LogError::Directory {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<F> DirectoryProvisioner for F
where
    F: Fn(&Path) -> LogResult<()> + Send + Sync,
{
    fn ensure(&self, path: &Path) -> LogResult<()> {
        self(path)
    }
}
