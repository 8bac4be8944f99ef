// src/storage/mod.rs
use crate::directory::StaffRecord;
use crate::harvest::HarvestReport;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

const RESULT_FILE: &str = "result.json";
const METADATA_FILE: &str = "result_meta.json";
const IMAGE_EXTENSION: &str = "jpg";

pub struct StorageManager {
    base_dir: PathBuf,
    pic_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager writing into `base_dir`, portraits into
    /// `base_dir/pic_folder`.
    pub fn new<P: AsRef<Path>>(base_dir: P, pic_folder: &str) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self {
            pic_dir: base_path.join(pic_folder),
            base_dir: base_path,
        })
    }

    /// Writes the harvested records as a JSON array.
    pub fn save_records(&self, records: &[StaffRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(RESULT_FILE);

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} records to {}", records.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves a summary of the run next to the result file.
    pub fn save_run_metadata(&self, report: &HarvestReport) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(METADATA_FILE);

        let metadata = serde_json::json!({
            "record_count": report.records.len(),
            "duplicates_removed": report.duplicates_removed,
            "school_count": report.schools,
            "page_count": report.pages,
            "failed_pages": report.failed_pages,
            "harvest_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Stores a portrait under a file name derived from the person's name.
    pub fn save_image(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        if !self.pic_dir.exists() {
            fs::create_dir_all(&self.pic_dir).map_err(StorageError::IoError)?;
        }

        let file_path = self.pic_dir.join(image_file_name(name));
        fs::write(&file_path, bytes).map_err(StorageError::IoError)?;
        Ok(file_path)
    }
}

/// "Kari Nordmann" -> "Kari-Nordmann.jpg". Path separators are replaced too.
pub fn image_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            ' ' => '-',
            '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{}.{}", stem, IMAGE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, role: Option<&str>) -> StaffRecord {
        StaffRecord {
            name: name.to_string(),
            image_url: "https://site.example/img/x.jpg".to_string(),
            school: "Nordby skole".to_string(),
            role: role.map(str::to_string),
            email: None,
            phone_number: None,
        }
    }

    #[test]
    fn file_names_are_filesystem_safe() {
        assert_eq!(image_file_name("Kari Nordmann"), "Kari-Nordmann.jpg");
        assert_eq!(image_file_name("A/B Hansen"), "A_B-Hansen.jpg");
    }

    #[test]
    fn records_round_trip_through_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out"), "pics").unwrap();
        let records = vec![
            record("Kari O'Neill", Some("Lærer \"fast\"")),
            record("Ola Nordmann", None),
        ];

        let path = storage.save_records(&records).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let parsed: Vec<StaffRecord> = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, records);
        assert!(!text.contains("null"));
    }

    #[test]
    fn portraits_land_in_pic_folder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path(), "pics").unwrap();

        let path = storage.save_image("Kari Nordmann", b"\xFF\xD8jpeg").unwrap();

        assert_eq!(path, dir.path().join("pics").join("Kari-Nordmann.jpg"));
        assert_eq!(fs::read(path).unwrap(), b"\xFF\xD8jpeg");
    }
}
