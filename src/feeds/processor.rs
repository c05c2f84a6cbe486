use crate::error::{FeedError, Result};
use crate::feeds::archive::single_xml_file;
use crate::feeds::discovery::discover_sources;
use crate::feeds::lifecycle::{discard_dir, move_into};
use crate::feeds::mapper::FeedParser;
use crate::feeds::traits::ArchiveExtractor;
use crate::feeds::types::{AssetBase, ProcessorConfig, SourceKind, StageDirs};
use crate::models::Property;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Terminal state of one source in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    Completed { properties: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct SourceOutcome {
    /// Path the source was queued under
    pub source: PathBuf,
    /// Where the source ended up after relocation
    pub location: PathBuf,
    pub state: SourceState,
}

impl SourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.state, SourceState::Failed { .. })
    }
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// All parsed listings, in source order then document order
    pub properties: Vec<Property>,
    pub outcomes: Vec<SourceOutcome>,
}

impl BatchReport {
    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

#[derive(Debug, Clone)]
struct QueuedSource {
    path: PathBuf,
    kind: SourceKind,
}

/// Runs queued feed sources through extraction, parsing and relocation.
///
/// One failing source never stops the batch; it is logged, optionally moved
/// to the failed directory, and the next source is processed.
pub struct FeedProcessor {
    parser: FeedParser,
    stages: StageDirs,
    extractor: Option<Box<dyn ArchiveExtractor>>,
    sources: Vec<QueuedSource>,
    num_failed: usize,
}

impl FeedProcessor {
    pub fn new(parser: FeedParser, stages: StageDirs) -> Self {
        Self {
            parser,
            stages,
            extractor: None,
            sources: Vec::new(),
            num_failed: 0,
        }
    }

    /// Build a processor and queue everything in the configured incoming directory
    pub fn from_config(config: &ProcessorConfig) -> Result<Self> {
        let mut processor = Self::new(
            FeedParser::with_config(config.parser.clone()),
            config.stages.clone(),
        );
        processor.add_directory(&config.incoming)?;
        Ok(processor)
    }

    pub fn with_extractor(mut self, extractor: impl ArchiveExtractor + 'static) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Queue every XML and zip file in `dir`; returns how many were added
    pub fn add_directory(&mut self, dir: &Path) -> Result<usize> {
        let files = discover_sources(dir)?;
        let added = files.len();
        for file in files {
            self.add_file(&file)?;
        }
        info!("Queued {} files from {}", added, dir.display());
        Ok(added)
    }

    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(FeedError::MissingFile(path.to_path_buf()));
        }
        // Anything that is not a zip is handed to the parser as XML
        let kind = SourceKind::from_path(path).unwrap_or(SourceKind::Xml);
        self.sources.push(QueuedSource {
            path: path.to_path_buf(),
            kind,
        });
        Ok(())
    }

    pub fn reset(&mut self) {
        self.sources.clear();
        self.num_failed = 0;
    }

    pub fn file_count(&self) -> usize {
        self.sources.len()
    }

    pub fn incoming_files(&self) -> Vec<&Path> {
        self.sources.iter().map(|source| source.path.as_path()).collect()
    }

    /// Sources that failed in the last run
    pub fn failed_count(&self) -> usize {
        self.num_failed
    }

    /// Process every queued source.
    ///
    /// Errors are returned only for pre-flight problems, before any file has
    /// been moved: no sources, a missing stage directory, or archives queued
    /// without an extractor.
    pub fn process(&mut self) -> Result<BatchReport> {
        self.num_failed = 0;

        if self.sources.is_empty() {
            return Err(FeedError::NoSources);
        }
        self.stages.validate()?;
        if self.extractor.is_none() && self.sources.iter().any(|s| s.kind == SourceKind::Zip) {
            return Err(FeedError::ExtractorUnavailable(
                "zip sources queued but no extractor configured".to_string(),
            ));
        }

        info!("Processing {} files", self.sources.len());

        let mut report = BatchReport::default();
        for source in &self.sources {
            let outcome = self.process_source(source, &mut report.properties);
            if outcome.is_failed() {
                self.num_failed += 1;
            }
            report.outcomes.push(outcome);
        }

        info!(
            "Processed {} properties from {} files ({} failed)",
            report.properties.len(),
            self.sources.len(),
            self.num_failed
        );
        Ok(report)
    }

    fn process_source(&self, source: &QueuedSource, properties: &mut Vec<Property>) -> SourceOutcome {
        info!("Processing file: {}", source.path.display());

        let mut location = source.path.clone();
        if let Some(processing) = &self.stages.processing {
            match move_into(&location, processing) {
                Some(moved) => location = moved,
                None => warn!("Continuing with {} in place", location.display()),
            }
        }

        let state = match self.parse_source(&location, source.kind) {
            Ok(parsed) => {
                info!("Processed {} properties within file", parsed.len());
                let count = parsed.len();
                properties.extend(parsed);
                if let Some(completed) = &self.stages.completed {
                    location = move_into(&location, completed).unwrap_or(location);
                }
                SourceState::Completed { properties: count }
            }
            Err(err) => {
                error!("Error parsing file {}: {}", location.display(), err);
                if let Some(failed) = &self.stages.failed {
                    location = move_into(&location, failed).unwrap_or(location);
                }
                SourceState::Failed {
                    reason: err.to_string(),
                }
            }
        };

        debug!("{} -> {:?}", source.path.display(), state);
        SourceOutcome {
            source: source.path.clone(),
            location,
            state,
        }
    }

    fn parse_source(&self, location: &Path, kind: SourceKind) -> Result<Vec<Property>> {
        match kind {
            SourceKind::Xml => self.parser.parse_file(location),
            SourceKind::Zip => {
                let extractor = self.extractor.as_ref().ok_or_else(|| {
                    FeedError::ExtractorUnavailable("no extractor configured".to_string())
                })?;
                let work_dir = extractor.extract(location, &self.stages.temp_dir())?;
                let parsed = single_xml_file(&work_dir).and_then(|xml| {
                    // Archive assets sit next to the extracted document
                    let asset_dir = match self.parser.config().asset_base {
                        AssetBase::Disabled => None,
                        _ => Some(work_dir.as_path()),
                    };
                    self.parser.parse_file_with_assets(&xml, asset_dir)
                });
                if parsed.is_err() {
                    discard_dir(&work_dir);
                }
                parsed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::types::ParserConfig;
    use std::fs;

    const GOOD: &str = r#"<propertyList><residential><uniqueID>A1</uniqueID></residential><rental><uniqueID>A2</uniqueID></rental></propertyList>"#;

    /// Copies a prepared directory instead of unpacking anything
    struct CopyExtractor {
        files: Vec<(&'static str, &'static str)>,
    }

    impl ArchiveExtractor for CopyExtractor {
        fn extract(&self, archive: &Path, work_root: &Path) -> Result<PathBuf> {
            let dest = crate::feeds::archive::unique_work_dir(work_root, archive);
            fs::create_dir(&dest)?;
            for (name, body) in &self.files {
                fs::write(dest.join(name), body)?;
            }
            Ok(dest)
        }

        fn tool_name(&self) -> &'static str {
            "copy"
        }
    }

    #[test]
    fn empty_batch_is_fatal() {
        let mut processor = FeedProcessor::new(FeedParser::new(), StageDirs::default());
        assert!(matches!(processor.process(), Err(FeedError::NoSources)));
    }

    #[test]
    fn missing_stage_dir_is_checked_before_moving() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("a.xml");
        fs::write(&feed, GOOD).unwrap();

        let stages = StageDirs {
            processing: Some(dir.path().to_path_buf()),
            failed: Some(dir.path().join("missing")),
            ..Default::default()
        };
        let mut processor = FeedProcessor::new(FeedParser::new(), stages);
        processor.add_file(&feed).unwrap();

        assert!(matches!(processor.process(), Err(FeedError::MissingDirectory(_))));
        assert!(feed.exists());
    }

    #[test]
    fn add_file_requires_existing_file() {
        let mut processor = FeedProcessor::new(FeedParser::new(), StageDirs::default());
        assert!(matches!(
            processor.add_file(Path::new("/nonexistent/a.xml")),
            Err(FeedError::MissingFile(_))
        ));
        assert_eq!(processor.file_count(), 0);
    }

    #[test]
    fn zip_without_extractor_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        fs::write(&archive, b"PK").unwrap();

        let mut processor = FeedProcessor::new(FeedParser::new(), StageDirs::default());
        processor.add_file(&archive).unwrap();
        let err = processor.process().unwrap_err();
        assert!(err.is_preflight());
    }

    #[test]
    fn archive_sources_are_extracted_and_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("feed.zip");
        fs::write(&archive, b"PK").unwrap();
        let temp = tempfile::tempdir().unwrap();

        let stages = StageDirs {
            temp: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let mut processor = FeedProcessor::new(FeedParser::new(), stages).with_extractor(CopyExtractor {
            files: vec![
                (
                    "listing.xml",
                    r#"<propertyList><land><images><img id="m" file="m.jpg"/></images></land></propertyList>"#,
                ),
                ("m.jpg", "jpeg"),
            ],
        });
        processor.add_file(&archive).unwrap();

        let report = processor.process().unwrap();
        assert_eq!(report.properties.len(), 1);
        let image = report.properties[0].main_image().unwrap();
        assert!(image.exists());
        assert!(image.local_path().unwrap().starts_with(temp.path()));
    }

    #[test]
    fn archive_with_two_documents_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        fs::write(&archive, b"PK").unwrap();
        let feed = dir.path().join("b.xml");
        fs::write(&feed, GOOD).unwrap();
        let temp = tempfile::tempdir().unwrap();

        let stages = StageDirs {
            temp: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let mut processor = FeedProcessor::new(FeedParser::new(), stages).with_extractor(CopyExtractor {
            files: vec![("one.xml", GOOD), ("two.xml", GOOD)],
        });
        processor.add_file(&archive).unwrap();
        processor.add_file(&feed).unwrap();

        let report = processor.process().unwrap();
        assert_eq!(report.properties.len(), 2);
        assert_eq!(processor.failed_count(), 1);
        assert!(matches!(
            &report.outcomes[0].state,
            SourceState::Failed { reason } if reason.contains("found 2")
        ));
        // The failed extraction leaves nothing behind in the temp dir
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn archive_assets_resolve_against_extraction_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("feed.zip");
        fs::write(&archive, b"PK").unwrap();
        let temp = tempfile::tempdir().unwrap();

        let parser = FeedParser::with_config(ParserConfig {
            asset_base: AssetBase::Dir(PathBuf::from("/elsewhere")),
            ..Default::default()
        });
        let stages = StageDirs {
            temp: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let mut processor = FeedProcessor::new(parser, stages).with_extractor(CopyExtractor {
            files: vec![
                (
                    "listing.xml",
                    r#"<propertyList><land><images><img id="m" file="m.jpg"/></images></land></propertyList>"#,
                ),
                ("m.jpg", "jpeg"),
            ],
        });
        processor.add_file(&archive).unwrap();

        let report = processor.process().unwrap();
        let image = report.properties[0].main_image().unwrap();
        assert!(image.local_path().unwrap().starts_with(temp.path()));
        assert!(image.exists());
        // Successful extractions are kept for their assets
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn archive_that_fails_to_parse_is_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("feed.zip");
        fs::write(&archive, b"PK").unwrap();
        let temp = tempfile::tempdir().unwrap();

        let stages = StageDirs {
            temp: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let mut processor = FeedProcessor::new(FeedParser::new(), stages).with_extractor(CopyExtractor {
            files: vec![("listing.xml", "<propertyList><land>")],
        });
        processor.add_file(&archive).unwrap();

        let report = processor.process().unwrap();
        assert!(report.outcomes[0].is_failed());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn reset_clears_queue() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("a.xml");
        fs::write(&feed, GOOD).unwrap();

        let mut processor = FeedProcessor::new(FeedParser::new(), StageDirs::default());
        processor.add_file(&feed).unwrap();
        assert_eq!(processor.incoming_files(), vec![feed.as_path()]);

        processor.reset();
        assert_eq!(processor.file_count(), 0);
        assert_eq!(processor.failed_count(), 0);
    }
}
