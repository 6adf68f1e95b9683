//! Parent/child link between a composite item and its physical parts.

use serde::{Deserialize, Serialize};

use gearbase_core::{Entity, EntityId};

use crate::item::ItemId;

/// Component link identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemComponentId(pub EntityId);

impl ItemComponentId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemComponentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Expresses that one non-composite item is physically part of a composite.
///
/// A component item is referenced by at most one link (no multi-parenting);
/// the use cases enforce this before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemComponent {
    pub id: ItemComponentId,
    pub parent_item_id: ItemId,
    pub component_item_id: ItemId,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl Entity for ItemComponent {
    type Id = ItemComponentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Creation payload: a link without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItemComponent {
    pub parent_item_id: ItemId,
    pub component_item_id: ItemId,
    pub quantity: u32,
    pub notes: Option<String>,
}
