//! Create one item, or a numbered batch of items, of a category.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gearbase_catalog::{Category, CategoryId, MetadataRecord, validate_metadata};
use gearbase_core::OrganizationId;
use gearbase_items::{ItemId, ItemIdentifier, ItemStatus, NewItem};

use crate::error::OperationError;
use crate::ports::{CategoryRepository, ImageStorage, ImageUpload, ItemRepository, UnitOfWork};

/// Largest batch a single call may create.
pub const MAX_BATCH: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub organization_id: OrganizationId,
    pub category_id: CategoryId,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub identifier_base: String,
    pub quantity: u32,
    pub has_unique_numbering: bool,
    pub status: ItemStatus,
    pub metadata: MetadataRecord,
    pub image: Option<ImageUpload>,
}

/// One unit created by the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: ItemId,
    pub identifier: ItemIdentifier,
    pub name: String,
}

pub struct CreateItemUseCase {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
    storage: Arc<dyn ImageStorage>,
    uow: Arc<dyn UnitOfWork>,
}

impl CreateItemUseCase {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn ItemRepository>,
        storage: Arc<dyn ImageStorage>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            categories,
            items,
            storage,
            uow,
        }
    }

    pub async fn execute(&self, input: CreateItemInput) -> Result<Vec<CreatedItem>, OperationError> {
        let (category, base) = self.check_preconditions(&input).await?;

        // External side effect before the write sequence; compensated with a
        // delete if the batch fails.
        let image_url = match &input.image {
            Some(image) => Some(self.storage.upload(image.clone(), base.as_str()).await?),
            None => None,
        };

        self.uow.begin().await?;
        match self.create_units(&input, &category, &base, image_url.clone(), false).await {
            Ok(created) => {
                self.uow.commit().await?;
                info!(category = %category.slug, count = created.len(), "items created");
                Ok(created)
            }
            Err(err) => {
                let _ = self.uow.rollback().await;
                if let Some(url) = image_url {
                    if let Err(delete_err) = self.storage.delete(&url).await {
                        warn!(%url, error = %delete_err, "compensating image delete failed");
                    }
                }
                Err(err)
            }
        }
    }

    /// Shared entry for the composite flow: same checks and unit creation,
    /// but the caller owns the unit of work and the composite flag.
    pub(crate) async fn check_preconditions(
        &self,
        input: &CreateItemInput,
    ) -> Result<(Category, ItemIdentifier), OperationError> {
        if input.quantity < 1 || input.quantity > MAX_BATCH {
            return Err(OperationError::InvalidQuantity(format!(
                "quantity must be between 1 and {MAX_BATCH}"
            )));
        }
        if input.quantity > 1 && !input.has_unique_numbering {
            return Err(OperationError::InvalidQuantity(
                "batches larger than one require unique numbering".to_string(),
            ));
        }

        let category = self
            .categories
            .find_by_id(input.category_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or(OperationError::CategoryNotFound(input.category_id))?;

        if category.requires_unique_numbering && !input.has_unique_numbering {
            return Err(OperationError::CategoryRule(format!(
                "category '{}' requires unique numbering",
                category.name
            )));
        }

        let violations = validate_metadata(&category.metadata_schema, &input.metadata);
        if !violations.is_empty() {
            return Err(OperationError::InvalidMetadata { violations });
        }

        let base = ItemIdentifier::parse(&input.identifier_base)?;
        Ok((category, base))
    }

    pub(crate) async fn create_units(
        &self,
        input: &CreateItemInput,
        category: &Category,
        base: &ItemIdentifier,
        image_url: Option<String>,
        is_composite: bool,
    ) -> Result<Vec<CreatedItem>, OperationError> {
        let mut created = Vec::with_capacity(input.quantity as usize);
        for index in 1..=input.quantity {
            let identifier = if input.has_unique_numbering {
                ItemIdentifier::generate_unique(base.as_str(), index)?
            } else {
                base.clone()
            };

            if self.items.exists_by_identifier(&identifier).await? {
                return Err(OperationError::DuplicateItemIdentifier(identifier.to_string()));
            }

            let item = self
                .items
                .create(NewItem {
                    organization_id: input.organization_id,
                    category_id: category.id,
                    name: input.name.clone(),
                    brand: input.brand.clone(),
                    model: input.model.clone(),
                    status: input.status,
                    identifier,
                    has_unique_numbering: input.has_unique_numbering,
                    is_composite,
                    metadata: input.metadata.clone(),
                    image_url: image_url.clone(),
                    origin_transformation_id: None,
                })
                .await?;

            created.push(CreatedItem {
                id: item.id,
                identifier: item.identifier,
                name: item.name,
            });
        }
        Ok(created)
    }
}
