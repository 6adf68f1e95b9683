//! Donate a batch of items to another organization or group.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use gearbase_items::{Item, ItemId, ItemPatch, ItemStatus};
use gearbase_transformations::{NewTransformation, TransformationDetails, TransformationId};

use crate::error::OperationError;
use crate::ports::{Clock, CurrentUser, ItemRepository, TransformationRepository, UnitOfWork};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonateItemsInput {
    pub item_ids: Vec<ItemId>,
    pub location: String,
    pub recipients: Vec<String>,
    pub reason: String,
    pub recoverable: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonateItemsOutput {
    pub transformation_id: TransformationId,
    pub donated: Vec<ItemId>,
}

pub struct DonateItemsUseCase {
    items: Arc<dyn ItemRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl DonateItemsUseCase {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        transformations: Arc<dyn TransformationRepository>,
        current_user: Arc<dyn CurrentUser>,
        clock: Arc<dyn Clock>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            items,
            transformations,
            current_user,
            clock,
            uow,
        }
    }

    pub async fn execute(&self, input: DonateItemsInput) -> Result<DonateItemsOutput, OperationError> {
        if input.item_ids.is_empty() {
            return Err(OperationError::InvalidQuantity(
                "donation requires at least one item".to_string(),
            ));
        }

        // All checks complete before any write: a mismatched batch aborts
        // with every item untouched.
        let mut batch: Vec<Item> = Vec::with_capacity(input.item_ids.len());
        for item_id in &input.item_ids {
            let item = self
                .items
                .find_by_id(*item_id)
                .await?
                .filter(|i| !i.is_deleted())
                .ok_or(OperationError::ItemNotFound(*item_id))?;
            batch.push(item);
        }

        let organization_id = batch[0].organization_id;
        if batch.iter().any(|i| i.organization_id != organization_id) {
            return Err(OperationError::OrganizationMismatch);
        }

        for item in &batch {
            if matches!(
                item.status,
                ItemStatus::Donated | ItemStatus::Reserved | ItemStatus::InUse
            ) {
                return Err(OperationError::ItemNotAvailable {
                    item: item.id,
                    status: item.status,
                });
            }
        }

        let performed_by = self.current_user.current_user_id().await?;
        let performed_at = self.clock.now();

        self.uow.begin().await?;
        let result: Result<TransformationId, OperationError> = async {
            let transformation = self
                .transformations
                .create(NewTransformation {
                    organization_id,
                    performed_by,
                    performed_at,
                    reason: input.reason.clone(),
                    notes: input.notes.clone(),
                    details: TransformationDetails::Donation {
                        location: input.location.clone(),
                        recipients: input.recipients.clone(),
                        recoverable: input.recoverable,
                    },
                })
                .await?;

            for item in &batch {
                self.transformations
                    .add_source_item(
                        transformation.id,
                        item.id,
                        1.0,
                        Some(format!("Donado a {}", input.location)),
                    )
                    .await?;
                self.items
                    .update(item.id, ItemPatch::status(ItemStatus::Donated))
                    .await?;
            }

            Ok(transformation.id)
        }
        .await;

        match result {
            Ok(transformation_id) => {
                self.uow.commit().await?;
                info!(count = batch.len(), location = %input.location, "items donated");
                Ok(DonateItemsOutput {
                    transformation_id,
                    donated: batch.into_iter().map(|i| i.id).collect(),
                })
            }
            Err(err) => {
                let _ = self.uow.rollback().await;
                Err(err)
            }
        }
    }
}
