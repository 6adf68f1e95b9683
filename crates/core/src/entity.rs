//! Entity and aggregate-root traits: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Aggregate root marker.
///
/// This is intentionally small so domain modules can decide how they model
/// state transitions without bringing in any infrastructure concerns. An
/// aggregate root is the only entity of its cluster that repositories load
/// and store directly.
pub trait AggregateRoot: Entity {}
