// src/main.rs
mod directory;
mod extractors;
mod harvest;
mod storage;
mod utils;

use clap::Parser;
use directory::ClientSettings;
use harvest::{HarvestConfig, Harvester};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storage::StorageManager;
use utils::AppError;

/// Harvests staff directories of school websites into a JSON result and portrait files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Registry file: '#School name' lines, each followed by its page URLs
    #[arg(short, long, default_value = "URLS.txt")]
    registry: PathBuf,

    /// Output directory for result.json, metadata and portraits
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Portrait folder name inside the output directory
    #[arg(long, default_value = "pics")]
    pic_folder: String,

    /// Comma-separated role substrings that exclude a person
    #[arg(long, value_delimiter = ',', default_value = "veileder,sfo,assistent,barneveileder")]
    blacklist: Vec<String>,

    /// Row workers per page (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Only write the result, don't download portraits
    #[arg(long)]
    skip_images: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting harvest with args: {:?}", args);

    // 3. Load the registry before anything touches the network
    let groups = harvest::load_registry(&args.registry, harvest::REGISTRY_MARKER)?;

    let config = HarvestConfig {
        blacklist: args.blacklist.clone(),
        workers: args.workers.unwrap_or_else(harvest::default_workers),
        client: ClientSettings {
            timeout: Duration::from_secs(args.timeout_secs),
            ..ClientSettings::default()
        },
    };
    if config.workers == 0 {
        return Err(AppError::Config("--workers must be at least 1".to_string()));
    }

    // 4. Initialize storage
    let storage = Arc::new(StorageManager::new(&args.output_dir, &args.pic_folder)?);

    // 5. Harvest every school and page
    let harvester = Harvester::new(&config)?;
    let report = harvester.run(&groups).await;

    // 6. Write the result and run metadata
    storage.save_records(&report.records)?;
    if let Err(e) = storage.save_run_metadata(&report) {
        tracing::error!("Failed to save run metadata: {}", e);
    }

    // 7. Portraits
    if args.skip_images {
        tracing::info!("Skipping portrait downloads");
    } else {
        let summary = harvest::download_images(
            harvester.client(),
            Arc::clone(&storage),
            &report.records,
            config.workers,
        )
        .await;
        tracing::info!(
            "Portraits saved: {}, failed: {}",
            summary.saved,
            summary.failed
        );
    }

    tracing::info!("{} staff records", report.records.len());
    Ok(())
}
