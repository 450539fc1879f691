//! The demo walkthrough: four items, a dozen reviews.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use prodmgr_catalog::{ItemVariant, Rating};
use prodmgr_core::{CatalogError, CatalogResult, ItemId};
use prodmgr_infra::CatalogStore;

pub const TEA: ItemId = ItemId::new(101);
pub const COFFEE: ItemId = ItemId::new(102);
pub const CAKE: ItemId = ItemId::new(103);
pub const PIE: ItemId = ItemId::new(104);

/// Every id the walkthrough creates, ascending.
pub const ITEMS: [ItemId; 4] = [TEA, COFFEE, CAKE, PIE];

struct Entry {
    id: ItemId,
    name: &'static str,
    cents: i64,
    /// Days from today until expiry; `None` for durable items.
    expires_in: Option<u64>,
    reviews: &'static [(Rating, &'static str)],
}

const ENTRIES: [Entry; 4] = [
    Entry {
        id: TEA,
        name: "Tea",
        cents: 199,
        expires_in: None,
        reviews: &[
            (Rating::FourStar, "Nice hot cup of tea"),
            (Rating::FiveStar, "Fine tea"),
            (Rating::ThreeStar, "Rather weak tea"),
            (Rating::FiveStar, "Perfect tea"),
        ],
    },
    Entry {
        id: COFFEE,
        name: "Coffee",
        cents: 299,
        expires_in: None,
        reviews: &[
            (Rating::ThreeStar, "Coffee was ok"),
            (Rating::TwoStar, "Rather weak coffee"),
            (Rating::OneStar, "Where is the milk?"),
            (Rating::OneStar, "Just add some sugar"),
        ],
    },
    Entry {
        id: CAKE,
        name: "Cake",
        cents: 599,
        expires_in: Some(0),
        reviews: &[
            (Rating::FourStar, "Nice, yummy cake!"),
            (Rating::FiveStar, "Wow!"),
            (Rating::FiveStar, "Very nice cake"),
            (Rating::FiveStar, "Perfect!"),
        ],
    },
    Entry {
        id: PIE,
        name: "Pie",
        cents: 400,
        expires_in: Some(3),
        reviews: &[],
    },
];

/// Create the walkthrough items and submit their reviews.
///
/// Items already in the store (e.g. seeded from disk) are left as they are and
/// get no extra reviews. Returns how many items were created.
pub fn populate<S>(store: &S, today: NaiveDate) -> CatalogResult<usize>
where
    S: CatalogStore + ?Sized,
{
    let mut created = 0;
    for entry in &ENTRIES {
        let variant = match entry.expires_in {
            None => ItemVariant::Durable,
            Some(days) => ItemVariant::Perishable {
                expiry: today
                    .checked_add_days(Days::new(days))
                    .ok_or_else(|| CatalogError::validation("expiry date out of range"))?,
            },
        };

        match store.create_item(entry.id, entry.name, Decimal::new(entry.cents, 2), variant) {
            Ok(_) => created += 1,
            Err(CatalogError::DuplicateItem(id)) => {
                info!(item_id = %id, "item already in catalog; skipping");
                continue;
            }
            Err(e) => return Err(e),
        }

        for (rating, comment) in entry.reviews {
            store.submit_review(entry.id, *rating, comment)?;
        }
    }
    Ok(created)
}
