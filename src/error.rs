use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while ingesting feeds
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse empty document")]
    EmptyDocument,

    #[error("XML parse error: {0}")]
    XmlParse(String),

    #[error("document is not valid in its declared encoding: {0}")]
    Encoding(String),

    #[error("directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("no files to process")]
    NoSources,

    #[error("{} is not a zip archive (detected {mime})", .path.display())]
    NotAnArchive { path: PathBuf, mime: String },

    #[error("archive extractor unavailable: {0}")]
    ExtractorUnavailable(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("expected exactly one XML file in {}, found {count}", .dir.display())]
    XmlFileCount { dir: PathBuf, count: usize },

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
}

impl FeedError {
    /// Pre-flight failures that stop a batch before any source is touched.
    ///
    /// Everything else is scoped to a single source: the batch records it
    /// and moves on, while direct parser callers still get it returned.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::MissingDirectory(_) | Self::NoSources | Self::ExtractorUnavailable(_)
        )
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::NonDecodable(_) => Self::Encoding(err.to_string()),
            _ => Self::XmlParse(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
