//! Report an item as lost.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use gearbase_items::{ItemId, ItemPatch, ItemStatus};
use gearbase_transformations::{NewTransformation, TransformationDetails, TransformationId};

use crate::error::OperationError;
use crate::ports::{Clock, CurrentUser, ItemRepository, TransformationRepository, UnitOfWork};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItemLostInput {
    pub item_id: ItemId,
    pub circumstances: String,
    pub last_seen_location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItemLostOutput {
    pub transformation_id: TransformationId,
    pub item_id: ItemId,
}

pub struct ReportItemLostUseCase {
    items: Arc<dyn ItemRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl ReportItemLostUseCase {
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

    pub async fn execute(
        &self,
        input: ReportItemLostInput,
    ) -> Result<ReportItemLostOutput, OperationError> {
        let item = self
            .items
            .find_by_id(input.item_id)
            .await?
            .filter(|i| !i.is_deleted())
            .ok_or(OperationError::ItemNotFound(input.item_id))?;

        if item.status.is_terminal() {
            return Err(OperationError::TerminalStatus {
                item: item.id,
                status: item.status,
            });
        }
        // Items in custody go through the return workflow first; subdivided
        // items no longer exist as a single physical unit.
        if !(item.status.is_available() || item.status == ItemStatus::Maintenance) {
            return Err(OperationError::ItemNotAvailable {
                item: item.id,
                status: item.status,
            });
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
                    reason: input.circumstances.clone(),
                    notes: input.notes.clone(),
                    details: TransformationDetails::Loss {
                        last_seen_location: input.last_seen_location.clone(),
                        circumstances: input.circumstances.clone(),
                    },
                })
                .await?;
            self.transformations
                .add_source_item(transformation.id, item.id, 1.0, None)
                .await?;
            self.items
                .update(item.id, ItemPatch::status(ItemStatus::Lost))
                .await?;
            Ok(transformation.id)
        }
        .await;

        match result {
            Ok(transformation_id) => {
                self.uow.commit().await?;
                info!(item = %item.identifier, "item reported lost");
                Ok(ReportItemLostOutput {
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
}
