//! In-memory repository and report sink for tests/dev.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use prodmgr_catalog::{Item, Review};
use prodmgr_core::ItemId;

use super::{CatalogRepository, LoadedItem, PersistenceError, ReportSink};

#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    items: Mutex<BTreeMap<ItemId, LoadedItem>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn load_all(&self) -> Result<Vec<LoadedItem>, PersistenceError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.values().cloned().collect())
    }

    fn save(&self, item: &Item, reviews: &[Review]) -> Result<(), PersistenceError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(
            item.item_id(),
            LoadedItem {
                item: item.clone(),
                reviews: reviews.to_vec(),
            },
        );
        Ok(())
    }
}

/// Keeps the latest report per item.
#[derive(Debug, Default)]
pub struct InMemoryReportSink {
    reports: Mutex<BTreeMap<ItemId, String>>,
}

impl InMemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, id: ItemId) -> Option<String> {
        let reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        reports.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for InMemoryReportSink {
    fn write_report(&self, id: ItemId, text: &str) -> Result<(), PersistenceError> {
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        reports.insert(id, text.to_string());
        Ok(())
    }
}
