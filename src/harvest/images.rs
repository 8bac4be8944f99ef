// src/harvest/images.rs
use crate::directory::{DirectoryClient, StaffRecord};
use crate::storage::StorageManager;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageSummary {
    pub saved: usize,
    pub failed: usize,
}

/// Downloads every record's portrait and stores it, `workers` at a time.
/// A failed portrait is logged and skipped.
pub async fn download_images(
    client: &DirectoryClient,
    storage: Arc<StorageManager>,
    records: &[StaffRecord],
    workers: usize,
) -> ImageSummary {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for record in records {
        let permits = Arc::clone(&permits);
        let storage = Arc::clone(&storage);
        let client = client.clone();
        let name = record.name.clone();
        let url = record.image_url.clone();

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            let bytes = match client.download_image(&url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Failed to download portrait of {} ({}): {}", name, url, e);
                    return None;
                }
            };
            match storage.save_image(&name, &bytes) {
                Ok(path) => {
                    tracing::info!("Downloaded {} -> {}", name, path.display());
                    Some(())
                }
                Err(e) => {
                    tracing::warn!("Failed to save portrait of {}: {}", name, e);
                    None
                }
            }
        });
    }

    let mut summary = ImageSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(())) => summary.saved += 1,
            Ok(None) => summary.failed += 1,
            Err(e) => {
                tracing::warn!("Portrait task did not finish: {}", e);
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ClientSettings;

    fn record(name: &str, image_url: String) -> StaffRecord {
        StaffRecord {
            name: name.to_string(),
            image_url,
            school: "Nordby skole".to_string(),
            role: None,
            email: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn saves_what_downloads_and_skips_the_rest() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/bilder/ada.jpg")
            .with_body(b"ada-bytes".as_slice())
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/bilder/ola.jpg")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(StorageManager::new(dir.path(), "pics").unwrap());
        let client = DirectoryClient::new(&ClientSettings::default()).unwrap();
        let records = vec![
            record("Ada Lovelace", format!("{}/bilder/ada.jpg", server.url())),
            record("Ola Nordmann", format!("{}/bilder/ola.jpg", server.url())),
        ];

        let summary = download_images(&client, storage, &records, 2).await;

        assert_eq!(summary, ImageSummary { saved: 1, failed: 1 });
        let saved = std::fs::read(dir.path().join("pics").join("Ada-Lovelace.jpg")).unwrap();
        assert_eq!(saved, b"ada-bytes");
        assert!(!dir.path().join("pics").join("Ola-Nordmann.jpg").exists());
    }
}
