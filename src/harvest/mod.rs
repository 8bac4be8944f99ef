// src/harvest/mod.rs
pub mod dedup;
pub mod images;
pub mod page;
pub mod registry;

use crate::directory::{ClientSettings, DirectoryClient, PageGroup, StaffRecord};
use crate::extractors::RoleClassifier;
use crate::utils::error::FetchError;
use page::PageContext;
use std::sync::Arc;

pub use dedup::dedup_records;
pub use images::download_images;
pub use registry::{load_registry, REGISTRY_MARKER};

/// Explicit run configuration handed to the pipeline components.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub blacklist: Vec<String>,
    pub workers: usize,
    pub client: ClientSettings,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            blacklist: crate::extractors::role::DEFAULT_BLACKLIST
                .iter()
                .map(|t| t.to_string())
                .collect(),
            workers: default_workers(),
            client: ClientSettings::default(),
        }
    }
}

/// Worker-pool size matching the machine's parallelism.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// What a run produced, plus counters for the summary.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<StaffRecord>,
    pub duplicates_removed: usize,
    pub schools: usize,
    pub pages: usize,
    pub failed_pages: usize,
}

/// Walks the registry school by school, page by page.
pub struct Harvester {
    ctx: PageContext,
}

impl Harvester {
    pub fn new(config: &HarvestConfig) -> Result<Self, FetchError> {
        let client = DirectoryClient::new(&config.client)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: DirectoryClient, config: &HarvestConfig) -> Self {
        Self {
            ctx: PageContext {
                client,
                classifier: Arc::new(RoleClassifier::new(&config.blacklist)),
                workers: config.workers,
            },
        }
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.ctx.client
    }

    /// Harvests all groups in registry order and deduplicates once at the end.
    ///
    /// Pages run one after another; only rows inside a page run in
    /// parallel. A page that fails to load contributes nothing.
    pub async fn run(&self, groups: &[PageGroup]) -> HarvestReport {
        let mut report = HarvestReport {
            schools: groups.len(),
            ..HarvestReport::default()
        };
        let mut collected = Vec::new();

        for group in groups {
            tracing::info!("School: {}", group.school);

            for url in &group.urls {
                tracing::info!("Fetching {}", url);
                report.pages += 1;

                match page::harvest_page(&self.ctx, url, &group.school).await {
                    Ok(records) => {
                        tracing::info!("{} records from {}", records.len(), url);
                        collected.extend(records);
                    }
                    Err(e) => {
                        tracing::warn!("SKIPPED {}: {}", url, e);
                        report.failed_pages += 1;
                    }
                }
            }
        }

        let total = collected.len();
        report.records = dedup_records(collected);
        report.duplicates_removed = total - report.records.len();

        tracing::info!(
            "Harvest finished: {} records ({} duplicates removed), {} of {} pages failed",
            report.records.len(),
            report.duplicates_removed,
            report.failed_pages,
            report.pages
        );
        report
    }
}
