//! Ports consumed by the use cases, implemented by infrastructure adapters.
//!
//! Declarative trait interfaces keep the core free of storage-technology
//! types (dependency inversion): use cases receive trait objects at
//! construction and never see what backs them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gearbase_catalog::{Category, CategoryId, CategoryPatch, NewCategory};
use gearbase_core::{OrganizationId, UserId};
use gearbase_items::{
    Item, ItemComponent, ItemId, ItemIdentifier, ItemPatch, NewItem, NewItemComponent,
};
use gearbase_transformations::{
    NewTransformation, Transformation, TransformationId, TransformationItem,
};

/// Infrastructure-level failure surfaced by an adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("record not found")]
    NotFound,

    /// A storage-level unique constraint rejected a write. Carries the
    /// offending natural key so racing writers fail deterministically.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type PortResult<T> = Result<T, PortError>;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: CategoryId) -> PortResult<Option<Category>>;
    async fn find_all(&self, organization_id: OrganizationId) -> PortResult<Vec<Category>>;
    async fn create(&self, category: NewCategory) -> PortResult<Category>;
    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> PortResult<Category>;
    /// Soft delete: stamps `deleted_at`, items keep their `category_id`.
    async fn soft_delete(&self, id: CategoryId, deleted_at: DateTime<Utc>) -> PortResult<()>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Adapters must back the identifier with a hard uniqueness constraint
    /// among non-deleted items, not just an existence check.
    async fn create(&self, item: NewItem) -> PortResult<Item>;
    async fn find_by_id(&self, id: ItemId) -> PortResult<Option<Item>>;
    async fn find_by_identifier(&self, identifier: &ItemIdentifier) -> PortResult<Option<Item>>;
    async fn update(&self, id: ItemId, patch: ItemPatch) -> PortResult<Item>;
    async fn exists_by_identifier(&self, identifier: &ItemIdentifier) -> PortResult<bool>;
}

#[async_trait]
pub trait TransformationRepository: Send + Sync {
    async fn create(&self, transformation: NewTransformation) -> PortResult<Transformation>;
    async fn find_by_id(&self, id: TransformationId) -> PortResult<Option<Transformation>>;
    async fn add_source_item(
        &self,
        transformation_id: TransformationId,
        item_id: ItemId,
        quantity: f64,
        notes: Option<String>,
    ) -> PortResult<TransformationItem>;
    async fn add_result_item(
        &self,
        transformation_id: TransformationId,
        item_id: ItemId,
        quantity: f64,
        notes: Option<String>,
    ) -> PortResult<TransformationItem>;
    async fn items_for(&self, transformation_id: TransformationId) -> PortResult<Vec<TransformationItem>>;
}

#[async_trait]
pub trait ItemComponentRepository: Send + Sync {
    async fn create(&self, component: NewItemComponent) -> PortResult<ItemComponent>;
    async fn find_by_parent(&self, parent_item_id: ItemId) -> PortResult<Vec<ItemComponent>>;
    async fn find_by_component(&self, component_item_id: ItemId) -> PortResult<Vec<ItemComponent>>;
    /// Removes every link under the parent, returning how many were removed.
    async fn delete_for_parent(&self, parent_item_id: ItemId) -> PortResult<u32>;
}

/// Binary image attached to an item at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Image storage with externally visible state: uploads must be compensated
/// (deleted) by the caller if the owning write fails partway.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn upload(&self, image: ImageUpload, identifier_hint: &str) -> PortResult<String>;
    async fn delete(&self, url: &str) -> PortResult<()>;
}

/// Resolves the acting user, supplied by an external auth collaborator.
#[async_trait]
pub trait CurrentUser: Send + Sync {
    async fn current_user_id(&self) -> PortResult<UserId>;
}

/// Time source; injected so transformation timestamps stay deterministic in
/// tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Scoped all-or-nothing write boundary.
///
/// Every multi-write use case brackets its write sequence with
/// `begin`/`commit` and calls `rollback` on failure, so the adapter can
/// guarantee that either every write of one operation commits or none do.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> PortResult<()>;
    async fn commit(&self) -> PortResult<()>;
    async fn rollback(&self) -> PortResult<()>;
}
