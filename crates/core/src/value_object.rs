//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// construct a new value. Construction goes through a validating factory that
/// returns `DomainResult<Self>` rather than panicking, so only valid instances
/// can exist.
///
/// Example:
/// - `ItemIdentifier("ROPE-0001")` is a value object
/// - `Item { id: ItemId(...), .. }` is an entity
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
