//! Ratings and customer reviews.

use serde::{Deserialize, Serialize};

use prodmgr_core::{CatalogError, ValueObject};

/// Star rating of an item or a single review.
///
/// `NotRated` doubles as the aggregate of an empty review sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    #[default]
    NotRated,
    OneStar,
    TwoStar,
    ThreeStar,
    FourStar,
    FiveStar,
}

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::NotRated,
        Rating::OneStar,
        Rating::TwoStar,
        Rating::ThreeStar,
        Rating::FourStar,
        Rating::FiveStar,
    ];

    /// Numeric value in `0..=5`.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Star label, e.g. `★★★☆☆` for three stars.
    pub fn stars(self) -> &'static str {
        match self {
            Rating::NotRated => "☆☆☆☆☆",
            Rating::OneStar => "★☆☆☆☆",
            Rating::TwoStar => "★★☆☆☆",
            Rating::ThreeStar => "★★★☆☆",
            Rating::FourStar => "★★★★☆",
            Rating::FiveStar => "★★★★★",
        }
    }

    /// Saturating conversion used by aggregation (values above 5 clamp to five stars).
    pub(crate) fn clamped(value: u32) -> Self {
        Self::ALL[value.min(5) as usize]
    }
}

impl TryFrom<u8> for Rating {
    type Error = CatalogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CatalogError::validation(format!("rating must be 0..=5, got {value}")))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.value()
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.stars())
    }
}

/// A single customer review. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    rating: Rating,
    comment: String,
}

impl Review {
    pub fn new(rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl ValueObject for Review {}
