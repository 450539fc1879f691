//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values and never change after construction; to "modify" one,
//! build a new one.

/// Marker trait for value objects.
///
/// - **Value Object**: no identity (a `Review` with the same rating and comment
///   is the same review value)
/// - **Entity**: has identity (two `Item`s with the same id are the same
///   catalog entry, even if their names differ)
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Review {
///     rating: Rating,
///     comment: String,
/// }
///
/// impl ValueObject for Review {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
