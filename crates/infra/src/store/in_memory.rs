use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use prodmgr_catalog::{Item, ItemVariant, Rateable, Rating, Review, aggregate_rating};
use prodmgr_core::{CatalogError, CatalogResult, ItemId};

use super::{CatalogStore, ItemFilter, ItemOrder};

/// Current snapshot of one item plus the reviews it was aggregated from.
#[derive(Debug)]
struct ItemSlot {
    item: Item,
    reviews: Vec<Review>,
}

impl ItemSlot {
    fn append(&mut self, review: Review) -> Item {
        self.reviews.push(review);
        let rating = aggregate_rating(&self.reviews);
        self.item = self.item.apply_rating(rating);
        self.item.clone()
    }
}

type SharedSlot = Arc<Mutex<ItemSlot>>;

/// In-memory catalog store with per-item exclusivity.
///
/// The id -> slot map sits behind a `RwLock` that is only written when an item
/// is created. Each slot has its own `Mutex`, so reviews for different items
/// never contend. Whole-catalog reads lock every slot in ascending id order,
/// which yields a point-in-time view without deadlocking against writers
/// (writers only ever hold one slot).
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    slots: RwLock<HashMap<ItemId, SharedSlot>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: ItemId) -> CatalogResult<SharedSlot> {
        let map = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id).cloned().ok_or(CatalogError::ItemNotFound(id))
    }

    fn insert(&self, slot: ItemSlot) -> CatalogResult<Item> {
        let id = slot.item.item_id();
        let published = slot.item.clone();
        let mut map = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match map.entry(id) {
            Entry::Occupied(_) => Err(CatalogError::DuplicateItem(id)),
            Entry::Vacant(v) => {
                v.insert(Arc::new(Mutex::new(slot)));
                Ok(published)
            }
        }
    }

    /// Copy every item, in id order, while holding all slot locks.
    fn copy_all(&self) -> Vec<Item> {
        let map = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<ItemId> = map.keys().copied().collect();
        ids.sort_unstable();

        let guards: Vec<MutexGuard<'_, ItemSlot>> = ids
            .iter()
            .filter_map(|id| map.get(id))
            .map(lock)
            .collect();

        guards.iter().map(|slot| slot.item.clone()).collect()
    }

    /// Items matching `filter`. The filter runs after every lock is released,
    /// so it may call back into the store.
    fn collect(&self, filter: ItemFilter<'_>) -> Vec<Item> {
        let mut items = self.copy_all();
        items.retain(|item| filter(item));
        items
    }
}

// A slot is only ever replaced wholesale by `ItemSlot::append`, which cannot
// panic between pushing the review and publishing the snapshot, so a poisoned
// slot still satisfies the rating/review invariant.
fn lock(slot: &SharedSlot) -> MutexGuard<'_, ItemSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CatalogStore for InMemoryCatalogStore {
    fn create_item(
        &self,
        id: ItemId,
        name: &str,
        price: Decimal,
        variant: ItemVariant,
    ) -> CatalogResult<Item> {
        let item = Item::new(id, name, price, variant)?;
        let created = self.insert(ItemSlot {
            item,
            reviews: Vec::new(),
        })?;
        info!(item_id = %id, name = %created.name(), "item created");
        Ok(created)
    }

    fn submit_review(&self, id: ItemId, rating: Rating, comment: &str) -> CatalogResult<Item> {
        let slot = self.slot(id)?;
        let (updated, count) = {
            let mut slot = lock(&slot);
            let updated = slot.append(Review::new(rating, comment));
            (updated, slot.reviews.len())
        };
        debug!(
            item_id = %id,
            review = rating.value(),
            rating = updated.rating().value(),
            reviews = count,
            "review submitted"
        );
        Ok(updated)
    }

    fn find(&self, id: ItemId) -> CatalogResult<Item> {
        let slot = self.slot(id)?;
        let item = lock(&slot).item.clone();
        Ok(item)
    }

    fn find_with_reviews(&self, id: ItemId) -> CatalogResult<(Item, Vec<Review>)> {
        let slot = self.slot(id)?;
        let slot = lock(&slot);
        Ok((slot.item.clone(), slot.reviews.clone()))
    }

    fn snapshot(&self, filter: ItemFilter<'_>, order: ItemOrder<'_>) -> Vec<Item> {
        let mut items = self.collect(filter);
        items.sort_by(|a, b| order(a, b));
        items
    }

    fn discount_totals(&self, today: NaiveDate) -> BTreeMap<Rating, Decimal> {
        self.collect(&super::all_items)
            .iter()
            .fold(BTreeMap::new(), |mut totals, item| {
                *totals.entry(item.rating()).or_insert(Decimal::ZERO) += item.discount(today);
                totals
            })
    }

    fn seed(&self, item: Item, reviews: Vec<Review>) -> CatalogResult<Item> {
        let id = item.item_id();
        let rating = aggregate_rating(&reviews);
        if item.rating() != Rating::NotRated && item.rating() != rating {
            warn!(
                item_id = %id,
                stored = item.rating().value(),
                computed = rating.value(),
                "persisted rating disagrees with reviews; using computed rating"
            );
        }
        let count = reviews.len();
        let seeded = self.insert(ItemSlot {
            item: item.apply_rating(rating),
            reviews,
        })?;
        debug!(item_id = %id, reviews = count, "item seeded");
        Ok(seeded)
    }

    fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
