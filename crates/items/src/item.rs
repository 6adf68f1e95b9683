//! Item aggregate root: a tracked physical unit or numbered batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearbase_catalog::{CategoryId, MetadataRecord};
use gearbase_core::{AggregateRoot, Entity, EntityId, OrganizationId};

use crate::identifier::ItemIdentifier;
use crate::status::ItemStatus;

/// Item identifier (surrogate key; the human-facing code is
/// [`ItemIdentifier`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: a physical unit of equipment tracked through its
/// lifecycle and structural transformations.
///
/// Status is mutated only through the lifecycle use cases; items are never
/// hard-deleted (deletion is a soft flag with reason).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub organization_id: OrganizationId,
    pub category_id: CategoryId,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: ItemStatus,
    pub identifier: ItemIdentifier,
    pub has_unique_numbering: bool,
    pub is_composite: bool,
    pub metadata: MetadataRecord,
    pub image_url: Option<String>,
    /// Transformation this item was produced by, when it exists as the
    /// byproduct of one (subdivision result, deterioration's discarded twin).
    pub origin_transformation_id: Option<EntityId>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deletion_reason: Option<String>,
}

impl Item {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this item may be linked as a component of a composite:
    /// physically whole, available, and not itself an assembly.
    pub fn can_be_component(&self) -> bool {
        !self.is_composite && self.status.is_available() && !self.is_deleted()
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Item {}

/// Creation payload: an item without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub organization_id: OrganizationId,
    pub category_id: CategoryId,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: ItemStatus,
    pub identifier: ItemIdentifier,
    pub has_unique_numbering: bool,
    pub is_composite: bool,
    pub metadata: MetadataRecord,
    pub image_url: Option<String>,
    pub origin_transformation_id: Option<EntityId>,
}

/// Partial update payload; `None` fields are left untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub brand: Option<Option<String>>,
    pub model: Option<Option<String>>,
    pub status: Option<ItemStatus>,
    pub metadata: Option<MetadataRecord>,
    pub image_url: Option<Option<String>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deletion_reason: Option<String>,
}

impl ItemPatch {
    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearbase_catalog::CategoryId;

    fn test_item(status: ItemStatus, is_composite: bool) -> Item {
        Item {
            id: ItemId::new(EntityId::new()),
            organization_id: OrganizationId::new(),
            category_id: CategoryId::new(EntityId::new()),
            name: "Cuerda 60m".to_string(),
            brand: None,
            model: None,
            status,
            identifier: ItemIdentifier::parse("ROPE-0001").unwrap(),
            has_unique_numbering: true,
            is_composite,
            metadata: MetadataRecord::new(),
            image_url: None,
            origin_transformation_id: None,
            deleted_at: None,
            deletion_reason: None,
        }
    }

    #[test]
    fn available_simple_items_qualify_as_components() {
        assert!(test_item(ItemStatus::Available, false).can_be_component());
    }

    #[test]
    fn composites_never_qualify_as_components() {
        assert!(!test_item(ItemStatus::Available, true).can_be_component());
    }

    #[test]
    fn non_available_items_never_qualify_as_components() {
        assert!(!test_item(ItemStatus::Reserved, false).can_be_component());
        assert!(!test_item(ItemStatus::Donated, false).can_be_component());
    }

    #[test]
    fn soft_deleted_items_never_qualify_as_components() {
        let mut item = test_item(ItemStatus::Available, false);
        item.deleted_at = Some(Utc::now());
        item.deletion_reason = Some("lost during inventory".to_string());
        assert!(item.is_deleted());
        assert!(!item.can_be_component());
    }
}
