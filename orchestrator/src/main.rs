use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value};
use tracing::info;

use docstore::{DocumentStore, MemoryStore};
use inference::{HeuristicEntityExtractor, LexiconSentimentModel};

use orchestrator::{pipeline, PipelineConfig, ScoringDriver, StoreRecordSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding an array of raw records to ingest before running
    #[arg(long)]
    input: Option<PathBuf>,

    /// Skip the word-frequency aggregation pass
    #[arg(long)]
    skip_word_frequency: bool,

    /// Skip the sentiment scoring pass
    #[arg(long)]
    skip_scoring: bool,

    /// Records per inference call
    #[arg(long)]
    model_batch_size: Option<usize>,

    /// Examined records between progress reports / throttle pauses
    #[arg(long)]
    throttle_interval: Option<usize>,

    /// Throttle pause in seconds
    #[arg(long)]
    throttle_secs: Option<u64>,

    /// Records pulled from the source per fetch
    #[arg(long)]
    fetch_size: Option<usize>,

    /// Write the resulting collections to this JSON file
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = PipelineConfig::from_env_or_default();
    if let Some(size) = args.model_batch_size {
        config.model_batch_size = size;
    }
    if let Some(interval) = args.throttle_interval {
        config.throttle_interval = interval;
    }
    if let Some(secs) = args.throttle_secs {
        config.throttle_delay = Duration::from_secs(secs);
    }
    if let Some(size) = args.fetch_size {
        config.fetch_size = size;
    }
    config.validate()?;

    info!("Starting social text aggregation pipeline");
    info!(
        "Model batch size: {}, throttle every {} records",
        config.model_batch_size, config.throttle_interval
    );

    let store = MemoryStore::new();

    if let Some(path) = &args.input {
        ingest_records(&store, &config, path).await?;
    }

    if !args.skip_word_frequency {
        let mut source =
            StoreRecordSource::load(&store, &config.store.raw_collection, config.fetch_size)
                .await?;
        pipeline::run_word_frequency(&store, &config, &mut source).await?;
    }

    if !args.skip_scoring {
        let model = LexiconSentimentModel::new();
        let extractor = HeuristicEntityExtractor::new();
        let driver = ScoringDriver::new(&store, &model, &extractor, &config);

        let mut source =
            StoreRecordSource::load(&store, &config.store.raw_collection, config.fetch_size)
                .await?;
        let summary = driver.run(&mut source).await?;
        info!(
            "Run summary: scored={} skipped={} malformed={} batches={} failed={}",
            summary.scored,
            summary.skipped,
            summary.malformed,
            summary.batches,
            summary.failed_batches
        );
    }

    if let Some(path) = &args.dump {
        dump_collections(&store, &config, path).await?;
    }

    info!("Pipeline completed successfully");
    Ok(())
}

/// Load input records into the raw collection, stamping each with an
/// insert time.
async fn ingest_records(
    store: &dyn DocumentStore,
    config: &PipelineConfig,
    path: &PathBuf,
) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {:?}", path))?;
    let records: Vec<Value> =
        serde_json::from_str(&data).context("Input file must be a JSON array of records")?;

    let insert_time = aggregation::epoch_seconds();
    let total = records.len();
    for mut record in records {
        if let Some(fields) = record.as_object_mut() {
            fields.insert("insert_time".to_string(), json!(insert_time));
        }
        store.insert(&config.store.raw_collection, record).await?;
    }

    info!("Ingested {} records from {:?}", total, path);
    Ok(())
}

async fn dump_collections(
    store: &dyn DocumentStore,
    config: &PipelineConfig,
    path: &PathBuf,
) -> Result<()> {
    let names = [
        &config.store.raw_collection,
        &config.store.word_frequency_collection,
        &config.store.time_series_collection,
        &config.store.sentiment_collection,
        &config.store.analysis_log_collection,
        &config.store.entity_sentiment_collection,
    ];

    let mut dump = Map::new();
    for name in names {
        dump.insert(name.clone(), Value::Array(store.find(name).await?));
    }

    std::fs::write(path, serde_json::to_string_pretty(&Value::Object(dump))?)?;
    info!("Collections dumped to {:?}", path);
    Ok(())
}
