use crate::error::Result;
use std::path::{Path, PathBuf};

/// Unpacks an archive source into a working directory.
/// The batch processor depends on this rather than on a concrete tool, so
/// other extractors can be swapped in.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into a fresh directory under `work_root` and return it
    fn extract(&self, archive: &Path, work_root: &Path) -> Result<PathBuf>;

    /// Get the name of the extraction tool
    fn tool_name(&self) -> &'static str;
}
