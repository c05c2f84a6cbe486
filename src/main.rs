use anyhow::Context;
use clap::Parser;
use feed_scout::feeds::{AssetBase, FeedProcessor, ProcessorConfig, UnzipExtractor};
use feed_scout::models::Property;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "feed-scout")]
#[command(about = "Import real-estate listing feeds into JSON")]
#[command(version)]
struct Cli {
    /// JSON settings file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding incoming XML/zip feeds
    #[arg(short, long, env = "FEED_INCOMING_DIR")]
    incoming: Option<PathBuf>,

    /// Feeds are moved here while being processed
    #[arg(long, env = "FEED_PROCESSING_DIR")]
    processing: Option<PathBuf>,

    /// Feeds are moved here once parsed
    #[arg(long, env = "FEED_COMPLETED_DIR")]
    completed: Option<PathBuf>,

    /// Feeds that fail to parse are moved here
    #[arg(long, env = "FEED_FAILED_DIR")]
    failed: Option<PathBuf>,

    /// Parent directory for extracted archives
    #[arg(long, env = "FEED_TEMP_DIR")]
    temp: Option<PathBuf>,

    /// Keep asset `file` attributes relative instead of resolving them
    #[arg(long)]
    no_asset_paths: bool,

    /// Where to write all parsed listings
    #[arg(short, long, default_value = "properties.json")]
    output: PathBuf,

    /// Also write one JSON file per listing into this directory
    #[arg(long)]
    split_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(ProcessorConfig, PathBuf, Option<PathBuf>)> {
        let mut config = match (&self.config, &self.incoming) {
            (Some(path), _) => ProcessorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            (None, Some(incoming)) => ProcessorConfig::new(incoming),
            (None, None) => anyhow::bail!("--incoming or --config is required"),
        };

        if let Some(incoming) = self.incoming {
            config.incoming = incoming;
        }
        let stages = &mut config.stages;
        stages.processing = self.processing.or(stages.processing.take());
        stages.completed = self.completed.or(stages.completed.take());
        stages.failed = self.failed.or(stages.failed.take());
        stages.temp = self.temp.or(stages.temp.take());
        if self.no_asset_paths {
            config.parser.asset_base = AssetBase::Disabled;
        }

        Ok((config, self.output, self.split_dir))
    }
}

fn build_processor(config: &ProcessorConfig) -> anyhow::Result<FeedProcessor> {
    let mut processor = FeedProcessor::from_config(config)
        .with_context(|| format!("Failed to queue feeds from {}", config.incoming.display()))?;

    // Plain XML batches run without unzip installed
    match UnzipExtractor::new() {
        Ok(extractor) => processor = processor.with_extractor(extractor),
        Err(err) => warn!("{}", err),
    }
    Ok(processor)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let (config, output, split_dir) = cli.into_config()?;
    info!("Feed Scout - importing from {}", config.incoming.display());

    let report = tokio::task::spawn_blocking(move || {
        let mut processor = build_processor(&config)?;
        processor.process().context("Batch could not start")
    })
    .await
    .context("Feed processing task panicked")??;

    for property in &report.properties {
        println!(
            "[{}] {}: {}",
            property.unique_id, property.property_type, property.headline
        );
    }
    for outcome in report.failed() {
        warn!("Failed: {} ({:?})", outcome.source.display(), outcome.state);
    }

    let json = serde_json::to_string_pretty(&report.properties)?;
    tokio::fs::write(&output, json).await?;
    info!(
        "Saved {} properties to {}",
        report.properties.len(),
        output.display()
    );

    if let Some(dir) = split_dir {
        save_each(&dir, &report.properties).await?;
    }

    Ok(())
}

async fn save_each(dir: &Path, properties: &[Property]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    for (i, property) in properties.iter().enumerate() {
        let name = if property.unique_id.is_empty() {
            format!("listing_{}.json", i)
        } else {
            format!("{}.json", sanitize(&property.unique_id))
        };
        let json = serde_json::to_string_pretty(property)?;
        tokio::fs::write(dir.join(name), json).await?;
    }
    info!("Saved {} listing files to {}", properties.len(), dir.display());
    Ok(())
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
