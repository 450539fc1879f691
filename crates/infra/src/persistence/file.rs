//! File-backed catalog repository.
//!
//! Layout of the data folder:
//! - `product{id}.json`: one [`ItemRecord`]
//! - `reviews{id}.jsonl`: one review per line, oldest first
//!
//! Reports go to `product{id}.txt` in the report folder.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use prodmgr_catalog::{Item, Review};
use prodmgr_core::ItemId;

use super::{CatalogRepository, ItemRecord, LoadedItem, PersistenceError, ReportSink};

#[derive(Debug, Clone)]
pub struct FileCatalogRepository {
    data_folder: PathBuf,
    report_folder: PathBuf,
}

impl FileCatalogRepository {
    pub fn new(data_folder: impl Into<PathBuf>, report_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            report_folder: report_folder.into(),
        }
    }

    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }

    pub fn report_folder(&self) -> &Path {
        &self.report_folder
    }

    pub fn item_path(&self, id: ItemId) -> PathBuf {
        self.data_folder.join(format!("product{id}.json"))
    }

    pub fn reviews_path(&self, id: ItemId) -> PathBuf {
        self.data_folder.join(format!("reviews{id}.jsonl"))
    }

    pub fn report_path(&self, id: ItemId) -> PathBuf {
        self.report_folder.join(format!("product{id}.txt"))
    }

    fn item_files(&self) -> Result<Vec<PathBuf>, PersistenceError> {
        let entries = match fs::read_dir(&self.data_folder) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(folder = %self.data_folder.display(), "data folder missing; nothing to load");
                return Ok(Vec::new());
            }
            Err(e) => return Err(PersistenceError::io(&self.data_folder, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::io(&self.data_folder, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("product") && name.ends_with(".json") {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_item(&self, path: &Path) -> Result<Item, PersistenceError> {
        let text = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        let record: ItemRecord =
            serde_json::from_str(&text).map_err(|e| PersistenceError::json(path, e))?;
        Ok(record.into_item()?)
    }

    /// Reviews for `id`; a missing file means no reviews, a bad line is skipped.
    fn load_reviews(&self, id: ItemId) -> Result<Vec<Review>, PersistenceError> {
        let path = self.reviews_path(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(&path, e)),
        };

        let mut reviews = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Review>(line) {
                Ok(review) => reviews.push(review),
                Err(e) => warn!(
                    file = %path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping malformed review"
                ),
            }
        }
        Ok(reviews)
    }
}

fn ensure_folder(folder: &Path) -> Result<(), PersistenceError> {
    fs::create_dir_all(folder).map_err(|e| PersistenceError::io(folder, e))
}

impl CatalogRepository for FileCatalogRepository {
    fn load_all(&self) -> Result<Vec<LoadedItem>, PersistenceError> {
        let mut loaded = Vec::new();
        for path in self.item_files()? {
            let item = match self.load_item(&path) {
                Ok(item) => item,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable item");
                    continue;
                }
            };
            let reviews = match self.load_reviews(item.item_id()) {
                Ok(reviews) => reviews,
                Err(e) => {
                    warn!(item_id = %item.item_id(), error = %e, "skipping reviews");
                    Vec::new()
                }
            };
            debug!(item_id = %item.item_id(), reviews = reviews.len(), "item loaded");
            loaded.push(LoadedItem { item, reviews });
        }
        Ok(loaded)
    }

    fn save(&self, item: &Item, reviews: &[Review]) -> Result<(), PersistenceError> {
        ensure_folder(&self.data_folder)?;

        let item_path = self.item_path(item.item_id());
        let json = serde_json::to_string_pretty(&ItemRecord::from(item))
            .map_err(|e| PersistenceError::json(&item_path, e))?;
        fs::write(&item_path, json).map_err(|e| PersistenceError::io(&item_path, e))?;

        let reviews_path = self.reviews_path(item.item_id());
        let mut lines = String::new();
        for review in reviews {
            let line =
                serde_json::to_string(review).map_err(|e| PersistenceError::json(&reviews_path, e))?;
            lines.push_str(&line);
            lines.push('\n');
        }
        fs::write(&reviews_path, lines).map_err(|e| PersistenceError::io(&reviews_path, e))?;
        Ok(())
    }
}

impl ReportSink for FileCatalogRepository {
    fn write_report(&self, id: ItemId, text: &str) -> Result<(), PersistenceError> {
        ensure_folder(&self.report_folder)?;
        let path = self.report_path(id);
        fs::write(&path, text).map_err(|e| PersistenceError::io(&path, e))?;
        debug!(item_id = %id, file = %path.display(), "report written");
        Ok(())
    }
}
