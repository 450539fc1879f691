//! Catalog items and their discount rule.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use prodmgr_core::{CatalogError, CatalogResult, Entity, ItemId};

use crate::rating::Rateable;
use crate::review::Rating;

/// Discount applied to eligible items: 10% of the price.
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Item variants differ only in their discount eligibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemVariant {
    /// Discounted only on its expiry date.
    Perishable { expiry: NaiveDate },
    /// Always discounted.
    Durable,
}

/// Immutable snapshot of a catalog entry.
///
/// Identity is the `id` alone (see [`Entity`]); `PartialEq` compares whole
/// snapshots and is not an identity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    price: Decimal,
    variant: ItemVariant,
    rating: Rating,
}

impl Item {
    /// Build an unrated item, validating its attributes.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        price: Decimal,
        variant: ItemVariant,
    ) -> CatalogResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::validation("name cannot be empty"));
        }
        if price < Decimal::ZERO {
            return Err(CatalogError::validation(format!(
                "price cannot be negative (item {id}, price {price})"
            )));
        }
        Ok(Self {
            id,
            name,
            price,
            variant,
            rating: Rating::NotRated,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn variant(&self) -> ItemVariant {
        self.variant
    }

    pub fn is_perishable(&self) -> bool {
        matches!(self.variant, ItemVariant::Perishable { .. })
    }

    /// Discount for this item as of `today`.
    ///
    /// Durable items always get `price * DISCOUNT_RATE` rounded half-up to cents.
    /// Perishable items get the same amount only on their expiry date.
    pub fn discount(&self, today: NaiveDate) -> Decimal {
        match self.variant {
            ItemVariant::Durable => self.standard_discount(),
            ItemVariant::Perishable { expiry } if expiry == today => self.standard_discount(),
            ItemVariant::Perishable { .. } => Decimal::ZERO,
        }
    }

    /// Date shown as "best before": the expiry of perishables, `today` otherwise.
    pub fn best_before(&self, today: NaiveDate) -> NaiveDate {
        match self.variant {
            ItemVariant::Perishable { expiry } => expiry,
            ItemVariant::Durable => today,
        }
    }

    fn standard_discount(&self) -> Decimal {
        (self.price * DISCOUNT_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Rateable for Item {
    fn rating(&self) -> Rating {
        self.rating
    }

    fn apply_rating(&self, rating: Rating) -> Self {
        Self {
            rating,
            ..self.clone()
        }
    }
}
