//! Catalog domain module.
//!
//! This crate contains business rules for items, reviews and ratings,
//! implemented purely as deterministic domain logic (no IO, no clocks, no
//! storage). Anything time-dependent takes the current date as an argument.

pub mod item;
pub mod rating;
pub mod review;

pub use item::{DISCOUNT_RATE, Item, ItemVariant};
pub use rating::{Rateable, aggregate_rating};
pub use review::{Rating, Review};
