pub mod archive;
pub mod discovery;
pub mod lifecycle;
pub mod mapper;
pub mod processor;
pub mod traits;
pub mod types;
pub mod xml;

pub use archive::UnzipExtractor;
pub use mapper::FeedParser;
pub use processor::{BatchReport, FeedProcessor, SourceOutcome, SourceState};
pub use traits::ArchiveExtractor;
pub use types::{AssetBase, ParserConfig, ProcessorConfig, SourceKind, StageDirs};
