//! Subdivide one item into smaller items (e.g. cutting a rope).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use gearbase_core::UserId;
use gearbase_items::{Item, ItemId, ItemIdentifier, ItemPatch, ItemStatus, NewItem};
use gearbase_transformations::{
    NewTransformation, SubdivisionPart, TransformationDetails, TransformationId,
};

use crate::error::OperationError;
use crate::ports::{
    CategoryRepository, Clock, CurrentUser, ItemRepository, TransformationRepository, UnitOfWork,
};
use crate::quantity::{numeric_value, resolve_quantity_field};
use crate::use_cases::create_item::CreatedItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionSpec {
    pub identifier: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivideItemInput {
    pub source_item_id: ItemId,
    pub subdivisions: Vec<SubdivisionSpec>,
    pub unit: String,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivideItemOutput {
    pub transformation_id: TransformationId,
    pub created: Vec<CreatedItem>,
}

pub struct SubdivideItemUseCase {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl SubdivideItemUseCase {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn ItemRepository>,
        transformations: Arc<dyn TransformationRepository>,
        current_user: Arc<dyn CurrentUser>,
        clock: Arc<dyn Clock>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            categories,
            items,
            transformations,
            current_user,
            clock,
            uow,
        }
    }

    pub async fn execute(&self, input: SubdivideItemInput) -> Result<SubdivideItemOutput, OperationError> {
        let source = self
            .items
            .find_by_id(input.source_item_id)
            .await?
            .filter(|i| !i.is_deleted())
            .ok_or(OperationError::ItemNotFound(input.source_item_id))?;

        let category = self
            .categories
            .find_by_id(source.category_id)
            .await?
            .ok_or(OperationError::CategoryNotFound(source.category_id))?;

        // The category rule wins over the status check: a non-subdividable
        // kind is rejected the same way whatever state the item is in.
        if !category.can_be_subdivided {
            return Err(OperationError::CategoryRule(format!(
                "category '{}' does not allow subdivision",
                category.name
            )));
        }

        if !source.status.is_available() {
            return Err(OperationError::ItemNotAvailable {
                item: source.id,
                status: source.status,
            });
        }

        if input.subdivisions.len() < 2 {
            return Err(OperationError::InvalidQuantity(
                "subdivision requires at least two parts".to_string(),
            ));
        }

        let (field, original_value) = resolve_quantity_field(&category, &input.unit, &source.metadata)
            .and_then(|f| numeric_value(&source.metadata, &f).map(|v| (f, v)))
            .ok_or_else(|| {
                OperationError::CategoryRule(format!(
                    "cannot determine which metadata field unit '{}' refers to",
                    input.unit
                ))
            })?;

        let performed_by = self.current_user.current_user_id().await?;
        let performed_at = self.clock.now();

        self.uow.begin().await?;
        match self
            .perform(&input, &source, &field, original_value, performed_by, performed_at)
            .await
        {
            Ok(output) => {
                self.uow.commit().await?;
                info!(
                    source = %source.identifier,
                    parts = output.created.len(),
                    "item subdivided"
                );
                Ok(output)
            }
            Err(err) => {
                let _ = self.uow.rollback().await;
                Err(err)
            }
        }
    }

    async fn perform(
        &self,
        input: &SubdivideItemInput,
        source: &Item,
        field: &str,
        original_value: f64,
        performed_by: UserId,
        performed_at: DateTime<Utc>,
    ) -> Result<SubdivideItemOutput, OperationError> {
        let transformation = self
            .transformations
            .create(NewTransformation {
                organization_id: source.organization_id,
                performed_by,
                performed_at,
                reason: input.reason.clone(),
                notes: input.notes.clone(),
                details: TransformationDetails::Subdivision {
                    original_value,
                    unit: input.unit.clone(),
                    parts: input
                        .subdivisions
                        .iter()
                        .map(|s| SubdivisionPart {
                            identifier: s.identifier.clone(),
                            value: s.value,
                        })
                        .collect(),
                },
            })
            .await?;

        self.transformations
            .add_source_item(transformation.id, source.id, original_value, None)
            .await?;

        self.items
            .update(source.id, ItemPatch::status(ItemStatus::Subdivided))
            .await?;

        let mut created = Vec::with_capacity(input.subdivisions.len());
        for spec in &input.subdivisions {
            let identifier = ItemIdentifier::parse(&spec.identifier)?;
            // Abort before creating further items: no partial subdivisions.
            if self.items.exists_by_identifier(&identifier).await? {
                return Err(OperationError::DuplicateItemIdentifier(identifier.to_string()));
            }

            let mut metadata = source.metadata.clone();
            metadata.insert(field.to_string(), json!(spec.value));

            let item = self
                .items
                .create(NewItem {
                    organization_id: source.organization_id,
                    category_id: source.category_id,
                    name: source.name.clone(),
                    brand: source.brand.clone(),
                    model: source.model.clone(),
                    status: ItemStatus::Available,
                    identifier,
                    has_unique_numbering: source.has_unique_numbering,
                    is_composite: false,
                    metadata,
                    image_url: None,
                    origin_transformation_id: Some(transformation.id.0),
                })
                .await?;

            self.transformations
                .add_result_item(transformation.id, item.id, spec.value, None)
                .await?;

            created.push(CreatedItem {
                id: item.id,
                identifier: item.identifier,
                name: item.name,
            });
        }

        Ok(SubdivideItemOutput {
            transformation_id: transformation.id,
            created,
        })
    }
}
