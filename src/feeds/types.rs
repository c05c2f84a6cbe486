use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where relative asset `file` attributes are resolved from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetBase {
    /// Directory containing the feed file being parsed
    SourceDir,
    /// Fixed directory
    Dir(PathBuf),
    /// Keep `file` attributes exactly as written
    Disabled,
}

impl Default for AssetBase {
    fn default() -> Self {
        Self::SourceDir
    }
}

/// Parser settings, built per parser instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Strip leading and trailing whitespace from text nodes
    #[serde(default = "default_trim_text")]
    pub trim_text: bool,
    #[serde(default)]
    pub asset_base: AssetBase,
}

fn default_trim_text() -> bool {
    true
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            trim_text: default_trim_text(),
            asset_base: AssetBase::default(),
        }
    }
}

/// Optional staging directories a source moves through
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageDirs {
    pub processing: Option<PathBuf>,
    pub completed: Option<PathBuf>,
    pub failed: Option<PathBuf>,
    /// Parent directory for archive extraction; the system temp dir when unset
    pub temp: Option<PathBuf>,
}

impl StageDirs {
    /// Every configured directory must already exist
    pub fn validate(&self) -> Result<()> {
        for dir in [&self.processing, &self.completed, &self.failed, &self.temp]
            .into_iter()
            .flatten()
        {
            if !dir.is_dir() {
                return Err(FeedError::MissingDirectory(dir.clone()));
            }
        }
        Ok(())
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Complete settings for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub incoming: PathBuf,
    #[serde(default)]
    pub stages: StageDirs,
    #[serde(default)]
    pub parser: ParserConfig,
}

impl ProcessorConfig {
    pub fn new(incoming: impl Into<PathBuf>) -> Self {
        Self {
            incoming: incoming.into(),
            stages: StageDirs::default(),
            parser: ParserConfig::default(),
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

/// Kind of batch input, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Xml,
    Zip,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xml" => Some(Self::Xml),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_ignores_case() {
        assert_eq!(SourceKind::from_path(Path::new("a/FEED.XML")), Some(SourceKind::Xml));
        assert_eq!(SourceKind::from_path(Path::new("b.Zip")), Some(SourceKind::Zip));
        assert_eq!(SourceKind::from_path(Path::new("c.xml.bak")), None);
        assert_eq!(SourceKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn validate_rejects_missing_stage_dir() {
        let dir = tempfile::tempdir().unwrap();
        let stages = StageDirs {
            completed: Some(dir.path().to_path_buf()),
            failed: Some(dir.path().join("nope")),
            ..Default::default()
        };
        let err = stages.validate().unwrap_err();
        assert!(matches!(err, FeedError::MissingDirectory(ref p) if p.ends_with("nope")));
        assert!(err.is_preflight());
    }

    #[test]
    fn config_loads_from_json_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(
            &path,
            r#"{"incoming": "/data/incoming", "stages": {"failed": "/data/failed"}}"#,
        )
        .unwrap();

        let config = ProcessorConfig::load(&path).unwrap();
        assert_eq!(config.incoming, PathBuf::from("/data/incoming"));
        assert_eq!(config.stages.failed, Some(PathBuf::from("/data/failed")));
        assert_eq!(config.stages.completed, None);
        assert!(config.parser.trim_text);
        assert_eq!(config.parser.asset_base, AssetBase::SourceDir);
    }
}
