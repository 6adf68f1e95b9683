//! Category entity: per-kind rules and metadata shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearbase_core::{AggregateRoot, Entity, EntityId, OrganizationId};

use crate::name::CategoryName;
use crate::schema::MetadataSchema;

/// Category identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub EntityId);

impl CategoryId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A kind of equipment: defines the metadata shape and which lifecycle
/// operations items of this kind allow.
///
/// Categories are administered by organization admins and soft-deleted;
/// items referencing a deleted category keep their `category_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub organization_id: OrganizationId,
    pub name: CategoryName,
    pub slug: String,
    pub requires_unique_numbering: bool,
    pub can_be_composite: bool,
    pub can_be_subdivided: bool,
    pub metadata_schema: MetadataSchema,
    /// Schema field holding "the" magnitude subdivided or damaged (e.g.
    /// `length`). When unset, callers fall back to a unit-name heuristic.
    pub quantity_field: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Category {}

/// Creation payload: a category without identity or derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub organization_id: OrganizationId,
    pub name: CategoryName,
    pub requires_unique_numbering: bool,
    pub can_be_composite: bool,
    pub can_be_subdivided: bool,
    pub metadata_schema: MetadataSchema,
    pub quantity_field: Option<String>,
}

/// Partial update payload; `None` fields are left untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<CategoryName>,
    pub requires_unique_numbering: Option<bool>,
    pub can_be_composite: Option<bool>,
    pub can_be_subdivided: Option<bool>,
    pub metadata_schema: Option<MetadataSchema>,
    pub quantity_field: Option<Option<String>>,
}
