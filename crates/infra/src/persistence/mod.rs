//! Persistence collaborator: loading the catalog at startup and storing reports.
//!
//! The store is the only write path for live state; repositories only provide
//! the initial batch and receive rendered text.

pub mod file;
pub mod memory;

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use prodmgr_catalog::{Item, ItemVariant, Rateable, Rating, Review};
use prodmgr_core::{CatalogError, ItemId};

use crate::store::CatalogStore;

pub use file::FileCatalogRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryReportSink};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Persisted form of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub variant: ItemVariant,
    #[serde(default)]
    pub rating: Rating,
}

impl ItemRecord {
    /// Validate the record into an item snapshot.
    pub fn into_item(self) -> Result<Item, CatalogError> {
        let item = Item::new(self.id, self.name, self.price, self.variant)?;
        Ok(item.apply_rating(self.rating))
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.item_id(),
            name: item.name().to_string(),
            price: item.price(),
            variant: item.variant(),
            rating: item.rating(),
        }
    }
}

/// An item and its reviews, as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedItem {
    pub item: Item,
    pub reviews: Vec<Review>,
}

pub trait CatalogRepository: Send + Sync {
    /// Load every readable item. Malformed records are skipped, not fatal.
    fn load_all(&self) -> Result<Vec<LoadedItem>, PersistenceError>;

    fn save(&self, item: &Item, reviews: &[Review]) -> Result<(), PersistenceError>;
}

/// Destination for rendered reports.
pub trait ReportSink: Send + Sync {
    fn write_report(&self, id: ItemId, text: &str) -> Result<(), PersistenceError>;
}

/// Outcome of [`seed_store`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Load everything from `repository` into `store`.
///
/// Runs before any worker touches the store. Items the store rejects (e.g.
/// duplicate ids) are logged and skipped.
pub fn seed_store<S, R>(store: &S, repository: &R) -> Result<SeedSummary, PersistenceError>
where
    S: CatalogStore + ?Sized,
    R: CatalogRepository + ?Sized,
{
    let mut summary = SeedSummary::default();
    for loaded in repository.load_all()? {
        let id = loaded.item.item_id();
        match store.seed(loaded.item, loaded.reviews) {
            Ok(_) => summary.loaded += 1,
            Err(e) => {
                warn!(item_id = %id, error = %e, "skipping item during seed");
                summary.skipped += 1;
            }
        }
    }
    info!(loaded = summary.loaded, skipped = summary.skipped, "catalog seeded");
    Ok(summary)
}
