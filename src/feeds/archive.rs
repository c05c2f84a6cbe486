use crate::error::{FeedError, Result};
use crate::feeds::discovery::discover_xml_files;
use crate::feeds::traits::ArchiveExtractor;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

const ZIP_MIME: &str = "application/zip";

/// Extracts zip sources with the external `unzip` executable
#[derive(Debug, Clone)]
pub struct UnzipExtractor {
    program: PathBuf,
}

impl UnzipExtractor {
    /// Locate `unzip` on the PATH
    pub fn new() -> Result<Self> {
        Self::with_program("unzip")
    }

    /// Use a specific executable, given by name or path
    pub fn with_program(program: &str) -> Result<Self> {
        let program = which::which(program)
            .map_err(|err| FeedError::ExtractorUnavailable(format!("{}: {}", program, err)))?;
        Ok(Self { program })
    }
}

impl ArchiveExtractor for UnzipExtractor {
    fn extract(&self, archive: &Path, work_root: &Path) -> Result<PathBuf> {
        ensure_zip(archive)?;

        let dest = unique_work_dir(work_root, archive);
        info!("Extracting {} to {}", archive.display(), dest.display());

        let output = Command::new(&self.program)
            .arg("-q")
            .arg("-o")
            .arg(archive)
            .arg("-d")
            .arg(&dest)
            .output()
            .map_err(|err| {
                FeedError::Extraction(format!("failed to run {}: {}", self.program.display(), err))
            })?;

        if !output.status.success() {
            return Err(FeedError::Extraction(format!(
                "{} exited with {}: {}",
                self.tool_name(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if !dest.is_dir() {
            return Err(FeedError::Extraction(format!(
                "{} did not produce {}",
                self.tool_name(),
                dest.display()
            )));
        }

        Ok(dest)
    }

    fn tool_name(&self) -> &'static str {
        "unzip"
    }
}

/// Reject sources whose name does not map to the zip mime type
pub fn ensure_zip(path: &Path) -> Result<()> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.essence_str() != ZIP_MIME {
        return Err(FeedError::NotAnArchive {
            path: path.to_path_buf(),
            mime: mime.essence_str().to_string(),
        });
    }
    Ok(())
}

/// A directory path under `parent` that does not exist yet
pub fn unique_work_dir(parent: &Path, archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());

    loop {
        let candidate = parent.join(format!("{}-{}", stem, Uuid::new_v4().simple()));
        if !candidate.exists() {
            return candidate;
        }
    }
}

/// The listing document of an extracted archive; there must be exactly one
pub fn single_xml_file(dir: &Path) -> Result<PathBuf> {
    let mut files = discover_xml_files(dir)?;
    debug!("Found {} XML files in {}", files.len(), dir.display());
    if files.len() != 1 {
        return Err(FeedError::XmlFileCount {
            dir: dir.to_path_buf(),
            count: files.len(),
        });
    }
    Ok(files.remove(0))
}
