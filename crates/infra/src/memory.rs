//! In-memory store backing every repository port.
//!
//! Intended for tests/dev. Not optimized for performance. Two guarantees the
//! application layer relies on:
//!
//! - item identifiers are a **hard** unique constraint among non-deleted
//!   rows, enforced inside `create` (racing writers fail deterministically);
//! - the unit of work snapshots every table on `begin` and restores it on
//!   `rollback`, so one operation's writes commit or vanish together.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gearbase_app::{
    CategoryRepository, ItemComponentRepository, ItemRepository, PortError, PortResult,
    TransformationRepository, UnitOfWork,
};
use gearbase_catalog::{Category, CategoryId, CategoryPatch, NewCategory};
use gearbase_core::{EntityId, OrganizationId};
use gearbase_items::{
    Item, ItemComponent, ItemComponentId, ItemId, ItemIdentifier, ItemPatch, NewItem,
    NewItemComponent,
};
use gearbase_transformations::{
    NewTransformation, Role, Transformation, TransformationId, TransformationItem,
    TransformationItemId,
};

#[derive(Debug, Default, Clone)]
struct Tables {
    categories: HashMap<CategoryId, Category>,
    items: HashMap<ItemId, Item>,
    transformations: HashMap<TransformationId, Transformation>,
    transformation_items: Vec<TransformationItem>,
    components: HashMap<ItemComponentId, ItemComponent>,
}

/// Single shared in-memory store implementing every repository port plus the
/// unit of work.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    snapshot: Mutex<Option<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PortResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> PortResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))
    }

    fn identifier_taken(tables: &Tables, identifier: &ItemIdentifier) -> bool {
        tables
            .items
            .values()
            .any(|item| item.deleted_at.is_none() && &item.identifier == identifier)
    }

    fn add_transformation_item(
        &self,
        transformation_id: TransformationId,
        item_id: ItemId,
        role: Role,
        quantity: f64,
        notes: Option<String>,
    ) -> PortResult<TransformationItem> {
        let mut tables = self.write()?;
        if !tables.transformations.contains_key(&transformation_id) {
            return Err(PortError::NotFound);
        }
        let row = TransformationItem {
            id: TransformationItemId::new(EntityId::new()),
            transformation_id,
            item_id,
            role,
            quantity,
            notes,
        };
        tables.transformation_items.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
impl InMemoryStore {
    pub(crate) fn item_count(&self) -> usize {
        self.tables.read().map(|t| t.items.len()).unwrap_or(0)
    }

    pub(crate) fn transformation_count(&self) -> usize {
        self.tables.read().map(|t| t.transformations.len()).unwrap_or(0)
    }

    pub(crate) fn component_count(&self) -> usize {
        self.tables.read().map(|t| t.components.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_id(&self, id: CategoryId) -> PortResult<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn find_all(&self, organization_id: OrganizationId) -> PortResult<Vec<Category>> {
        let tables = self.read()?;
        let mut all: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.organization_id == organization_id && !c.is_deleted())
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(all)
    }

    async fn create(&self, category: NewCategory) -> PortResult<Category> {
        let mut tables = self.write()?;
        let slug = category.name.to_slug();
        let created = Category {
            id: CategoryId::new(EntityId::new()),
            organization_id: category.organization_id,
            name: category.name,
            slug,
            requires_unique_numbering: category.requires_unique_numbering,
            can_be_composite: category.can_be_composite,
            can_be_subdivided: category.can_be_subdivided,
            metadata_schema: category.metadata_schema,
            quantity_field: category.quantity_field,
            deleted_at: None,
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> PortResult<Category> {
        let mut tables = self.write()?;
        let category = tables.categories.get_mut(&id).ok_or(PortError::NotFound)?;
        if let Some(name) = patch.name {
            category.slug = name.to_slug();
            category.name = name;
        }
        if let Some(v) = patch.requires_unique_numbering {
            category.requires_unique_numbering = v;
        }
        if let Some(v) = patch.can_be_composite {
            category.can_be_composite = v;
        }
        if let Some(v) = patch.can_be_subdivided {
            category.can_be_subdivided = v;
        }
        if let Some(schema) = patch.metadata_schema {
            category.metadata_schema = schema;
        }
        if let Some(field) = patch.quantity_field {
            category.quantity_field = field;
        }
        Ok(category.clone())
    }

    async fn soft_delete(&self, id: CategoryId, deleted_at: DateTime<Utc>) -> PortResult<()> {
        let mut tables = self.write()?;
        let category = tables.categories.get_mut(&id).ok_or(PortError::NotFound)?;
        category.deleted_at = Some(deleted_at);
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, item: NewItem) -> PortResult<Item> {
        let mut tables = self.write()?;
        // Hard constraint, not just an application-level existence check.
        if Self::identifier_taken(&tables, &item.identifier) {
            return Err(PortError::UniqueViolation(item.identifier.to_string()));
        }
        let created = Item {
            id: ItemId::new(EntityId::new()),
            organization_id: item.organization_id,
            category_id: item.category_id,
            name: item.name,
            brand: item.brand,
            model: item.model,
            status: item.status,
            identifier: item.identifier,
            has_unique_numbering: item.has_unique_numbering,
            is_composite: item.is_composite,
            metadata: item.metadata,
            image_url: item.image_url,
            origin_transformation_id: item.origin_transformation_id,
            deleted_at: None,
            deletion_reason: None,
        };
        tables.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: ItemId) -> PortResult<Option<Item>> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &ItemIdentifier) -> PortResult<Option<Item>> {
        let tables = self.read()?;
        Ok(tables
            .items
            .values()
            .find(|item| item.deleted_at.is_none() && &item.identifier == identifier)
            .cloned())
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> PortResult<Item> {
        let mut tables = self.write()?;
        let item = tables.items.get_mut(&id).ok_or(PortError::NotFound)?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(brand) = patch.brand {
            item.brand = brand;
        }
        if let Some(model) = patch.model {
            item.model = model;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(metadata) = patch.metadata {
            item.metadata = metadata;
        }
        if let Some(image_url) = patch.image_url {
            item.image_url = image_url;
        }
        if let Some(deleted_at) = patch.deleted_at {
            item.deleted_at = Some(deleted_at);
        }
        if let Some(reason) = patch.deletion_reason {
            item.deletion_reason = Some(reason);
        }
        Ok(item.clone())
    }

    async fn exists_by_identifier(&self, identifier: &ItemIdentifier) -> PortResult<bool> {
        let tables = self.read()?;
        Ok(Self::identifier_taken(&tables, identifier))
    }
}

#[async_trait]
impl TransformationRepository for InMemoryStore {
    async fn create(&self, transformation: NewTransformation) -> PortResult<Transformation> {
        let mut tables = self.write()?;
        let created = Transformation {
            id: TransformationId::new(EntityId::new()),
            organization_id: transformation.organization_id,
            performed_by: transformation.performed_by,
            performed_at: transformation.performed_at,
            reason: transformation.reason,
            notes: transformation.notes,
            details: transformation.details,
        };
        tables.transformations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: TransformationId) -> PortResult<Option<Transformation>> {
        Ok(self.read()?.transformations.get(&id).cloned())
    }

    async fn add_source_item(
        &self,
        transformation_id: TransformationId,
        item_id: ItemId,
        quantity: f64,
        notes: Option<String>,
    ) -> PortResult<TransformationItem> {
        self.add_transformation_item(transformation_id, item_id, Role::Source, quantity, notes)
    }

    async fn add_result_item(
        &self,
        transformation_id: TransformationId,
        item_id: ItemId,
        quantity: f64,
        notes: Option<String>,
    ) -> PortResult<TransformationItem> {
        self.add_transformation_item(transformation_id, item_id, Role::Result, quantity, notes)
    }

    async fn items_for(&self, transformation_id: TransformationId) -> PortResult<Vec<TransformationItem>> {
        let tables = self.read()?;
        Ok(tables
            .transformation_items
            .iter()
            .filter(|row| row.transformation_id == transformation_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ItemComponentRepository for InMemoryStore {
    async fn create(&self, component: NewItemComponent) -> PortResult<ItemComponent> {
        let mut tables = self.write()?;
        let created = ItemComponent {
            id: ItemComponentId::new(EntityId::new()),
            parent_item_id: component.parent_item_id,
            component_item_id: component.component_item_id,
            quantity: component.quantity,
            notes: component.notes,
        };
        tables.components.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_parent(&self, parent_item_id: ItemId) -> PortResult<Vec<ItemComponent>> {
        let tables = self.read()?;
        Ok(tables
            .components
            .values()
            .filter(|c| c.parent_item_id == parent_item_id)
            .cloned()
            .collect())
    }

    async fn find_by_component(&self, component_item_id: ItemId) -> PortResult<Vec<ItemComponent>> {
        let tables = self.read()?;
        Ok(tables
            .components
            .values()
            .filter(|c| c.component_item_id == component_item_id)
            .cloned()
            .collect())
    }

    async fn delete_for_parent(&self, parent_item_id: ItemId) -> PortResult<u32> {
        let mut tables = self.write()?;
        let before = tables.components.len();
        tables
            .components
            .retain(|_, c| c.parent_item_id != parent_item_id);
        Ok((before - tables.components.len()) as u32)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn begin(&self) -> PortResult<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?;
        if snapshot.is_some() {
            return Err(PortError::Backend("a unit of work is already open".to_string()));
        }
        *snapshot = Some(self.read()?.clone());
        Ok(())
    }

    async fn commit(&self) -> PortResult<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?;
        if snapshot.take().is_none() {
            return Err(PortError::Backend("no open unit of work".to_string()));
        }
        Ok(())
    }

    async fn rollback(&self) -> PortResult<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?;
        let saved = snapshot
            .take()
            .ok_or_else(|| PortError::Backend("no open unit of work".to_string()))?;
        *self.write()? = saved;
        Ok(())
    }
}
