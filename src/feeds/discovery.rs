//! Finding feed sources in a directory

use crate::error::{FeedError, Result};
use crate::feeds::types::SourceKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// XML and zip files directly inside `dir`, ordered by file name.
///
/// Feed files are named after their export timestamp, so name order is
/// chronological order. Comparison ignores case.
pub fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    discover(dir, |_| true)
}

pub fn discover_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    discover(dir, |kind| kind == SourceKind::Xml)
}

pub fn discover_zip_files(dir: &Path) -> Result<Vec<PathBuf>> {
    discover(dir, |kind| kind == SourceKind::Zip)
}

fn discover(dir: &Path, wanted: impl Fn(SourceKind) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FeedError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match SourceKind::from_path(&path) {
            Some(kind) if wanted(kind) => files.push(path),
            _ => debug!("Skipping {}", path.display()),
        }
    }

    files.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn lists_feeds_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "20240102.xml");
        touch(dir.path(), "20240101.ZIP");
        touch(dir.path(), "20240103.XML");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("sub.xml")).unwrap();

        let names: Vec<_> = discover_sources(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["20240101.ZIP", "20240102.xml", "20240103.XML"]);

        assert_eq!(discover_xml_files(dir.path()).unwrap().len(), 2);
        assert_eq!(discover_zip_files(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = discover_sources(Path::new("/nonexistent/incoming")).unwrap_err();
        assert!(err.is_preflight());
    }
}
