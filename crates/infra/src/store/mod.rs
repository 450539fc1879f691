//! Concurrency-safe catalog storage.

pub mod in_memory;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use prodmgr_catalog::{Item, ItemVariant, Rating, Review};
use prodmgr_core::{CatalogResult, ItemId};

pub use in_memory::InMemoryCatalogStore;

/// Predicate used to select items for a snapshot. Runs on copies, after the
/// store's locks are released.
pub type ItemFilter<'a> = &'a dyn Fn(&Item) -> bool;

/// Comparator used to order a snapshot. Also runs outside the store's locks.
pub type ItemOrder<'a> = &'a dyn Fn(&Item, &Item) -> Ordering;

/// Keyed collection of items and their review sequences.
///
/// Every implementation must keep, for each id, the published snapshot's rating
/// equal to `aggregate_rating` of the stored reviews, and must never lose or
/// duplicate a submitted review, under any number of concurrent callers.
pub trait CatalogStore: Send + Sync {
    /// Insert a new unrated item. Fails with `DuplicateItem` if `id` exists.
    fn create_item(
        &self,
        id: ItemId,
        name: &str,
        price: Decimal,
        variant: ItemVariant,
    ) -> CatalogResult<Item>;

    /// Append a review and publish the re-aggregated snapshot as one atomic step.
    fn submit_review(&self, id: ItemId, rating: Rating, comment: &str) -> CatalogResult<Item>;

    /// Current snapshot of `id`.
    fn find(&self, id: ItemId) -> CatalogResult<Item>;

    /// Current snapshot of `id` together with the exact reviews it was computed from.
    fn find_with_reviews(&self, id: ItemId) -> CatalogResult<(Item, Vec<Review>)>;

    /// Point-in-time view of the items matching `filter`, sorted by `order`.
    fn snapshot(&self, filter: ItemFilter<'_>, order: ItemOrder<'_>) -> Vec<Item>;

    /// Discounts as of `today`, summed per current rating.
    fn discount_totals(&self, today: NaiveDate) -> BTreeMap<Rating, Decimal>;

    /// Batch-load an item and its existing reviews (startup seeding).
    ///
    /// The published rating is recomputed from `reviews`; whatever rating
    /// `item` carries is discarded.
    fn seed(&self, item: Item, reviews: Vec<Review>) -> CatalogResult<Item>;

    /// Number of items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn create_item(
        &self,
        id: ItemId,
        name: &str,
        price: Decimal,
        variant: ItemVariant,
    ) -> CatalogResult<Item> {
        (**self).create_item(id, name, price, variant)
    }

    fn submit_review(&self, id: ItemId, rating: Rating, comment: &str) -> CatalogResult<Item> {
        (**self).submit_review(id, rating, comment)
    }

    fn find(&self, id: ItemId) -> CatalogResult<Item> {
        (**self).find(id)
    }

    fn find_with_reviews(&self, id: ItemId) -> CatalogResult<(Item, Vec<Review>)> {
        (**self).find_with_reviews(id)
    }

    fn snapshot(&self, filter: ItemFilter<'_>, order: ItemOrder<'_>) -> Vec<Item> {
        (**self).snapshot(filter, order)
    }

    fn discount_totals(&self, today: NaiveDate) -> BTreeMap<Rating, Decimal> {
        (**self).discount_totals(today)
    }

    fn seed(&self, item: Item, reviews: Vec<Review>) -> CatalogResult<Item> {
        (**self).seed(item, reviews)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Selects every item.
pub fn all_items(_: &Item) -> bool {
    true
}

/// Orders items by ascending id.
pub fn by_id(a: &Item, b: &Item) -> Ordering {
    a.item_id().cmp(&b.item_id())
}
