//! Moving feed sources between staging directories

use crate::error::{FeedError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Move `src` to exactly `dest`. Never overwrites an existing destination.
///
/// Falls back to copy-and-delete for files when a rename is not possible,
/// e.g. across filesystems.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        return Err(FeedError::MissingFile(src.to_path_buf()));
    }
    if dest.exists() {
        return Err(FeedError::DestinationExists(dest.to_path_buf()));
    }

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if src.is_file() => {
            debug!("Rename of {} failed ({}), copying instead", src.display(), err);
            fs::copy(src, dest)?;
            fs::remove_file(src)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Move `src` into `dir`, keeping its file name.
///
/// Failures are logged and reported as `None`; the caller keeps using the
/// original location.
pub fn move_into(src: &Path, dir: &Path) -> Option<PathBuf> {
    let Some(name) = src.file_name() else {
        warn!("Unable to move {}: no file name", src.display());
        return None;
    };

    let dest = dir.join(name);
    match move_file(src, &dest) {
        Ok(()) => {
            debug!("Moved {} to {}", src.display(), dest.display());
            Some(dest)
        }
        Err(err) => {
            warn!("Unable to move {} to {}: {}", src.display(), dest.display(), err);
            None
        }
    }
}

/// Remove a scratch directory and everything in it; failures are only logged
pub fn discard_dir(dir: &Path) {
    match fs::remove_dir_all(dir) {
        Ok(()) => debug!("Removed {}", dir.display()),
        Err(err) => warn!("Unable to remove {}: {}", dir.display(), err),
    }
}
