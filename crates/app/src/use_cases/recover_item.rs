//! Recover a lost item, or reclaim a recoverable donation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use gearbase_items::{Item, ItemId, ItemPatch, ItemStatus};
use gearbase_transformations::{
    NewTransformation, Role, TransformationDetails, TransformationId,
};

use crate::error::OperationError;
use crate::ports::{Clock, CurrentUser, ItemRepository, TransformationRepository, UnitOfWork};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverItemInput {
    pub item_id: ItemId,
    /// Required when recovering a donated item: the donation being reversed.
    pub donation_transformation_id: Option<TransformationId>,
    pub reason: String,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverItemOutput {
    pub transformation_id: TransformationId,
    pub item_id: ItemId,
}

pub struct RecoverItemUseCase {
    items: Arc<dyn ItemRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl RecoverItemUseCase {
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

    pub async fn execute(&self, input: RecoverItemInput) -> Result<RecoverItemOutput, OperationError> {
        let item = self
            .items
            .find_by_id(input.item_id)
            .await?
            .filter(|i| !i.is_deleted())
            .ok_or(OperationError::ItemNotFound(input.item_id))?;

        match item.status {
            ItemStatus::Lost => {}
            ItemStatus::Donated => self.check_recoverable_donation(&input, &item).await?,
            status => {
                return Err(OperationError::NotRecoverable(format!(
                    "item {} is {status}, only lost or recoverably donated items can be recovered",
                    item.id
                )));
            }
        }

        let performed_by = self.current_user.current_user_id().await?;
        let performed_at = self.clock.now();

        self.uow.begin().await?;
        let result: Result<TransformationId, OperationError> = async {
            let transformation = self
                .transformations
                .create(NewTransformation {
                    organization_id: item.organization_id,
                    performed_by,
                    performed_at,
                    reason: input.reason.clone(),
                    notes: input.notes.clone(),
                    details: TransformationDetails::Recovery {
                        location: input.location.clone(),
                        condition: input.condition.clone(),
                    },
                })
                .await?;
            self.transformations
                .add_source_item(transformation.id, item.id, 1.0, None)
                .await?;
            self.items
                .update(item.id, ItemPatch::status(ItemStatus::Available))
                .await?;
            Ok(transformation.id)
        }
        .await;

        match result {
            Ok(transformation_id) => {
                self.uow.commit().await?;
                info!(item = %item.identifier, "item recovered");
                Ok(RecoverItemOutput {
                    transformation_id,
                    item_id: item.id,
                })
            }
            Err(err) => {
                let _ = self.uow.rollback().await;
                Err(err)
            }
        }
    }

    /// A donated item only comes back when the originating donation was
    /// flagged recoverable and actually lists this item as a source.
    async fn check_recoverable_donation(
        &self,
        input: &RecoverItemInput,
        item: &Item,
    ) -> Result<(), OperationError> {
        let donation_id = input.donation_transformation_id.ok_or_else(|| {
            OperationError::NotRecoverable(
                "recovering a donated item requires the originating donation".to_string(),
            )
        })?;

        let donation = self
            .transformations
            .find_by_id(donation_id)
            .await?
            .ok_or(OperationError::TransformationNotFound(donation_id))?;

        if donation.organization_id != item.organization_id {
            return Err(OperationError::OrganizationMismatch);
        }

        let recoverable = match &donation.details {
            TransformationDetails::Donation { recoverable, .. } => *recoverable,
            _ => {
                return Err(OperationError::NotRecoverable(format!(
                    "transformation {donation_id} is not a donation"
                )));
            }
        };
        if !recoverable {
            return Err(OperationError::NotRecoverable(
                "the donation was not flagged recoverable".to_string(),
            ));
        }

        let listed = self
            .transformations
            .items_for(donation_id)
            .await?
            .iter()
            .any(|row| row.item_id == item.id && row.role == Role::Source);
        if !listed {
            return Err(OperationError::NotRecoverable(format!(
                "item {} is not part of donation {donation_id}",
                item.id
            )));
        }

        Ok(())
    }
}
