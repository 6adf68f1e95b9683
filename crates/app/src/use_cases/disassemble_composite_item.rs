//! Disassemble a composite item, releasing its components.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use gearbase_items::{ItemId, ItemPatch, ItemStatus};
use gearbase_transformations::{NewTransformation, TransformationDetails, TransformationId};

use crate::error::OperationError;
use crate::ports::{
    Clock, CurrentUser, ItemComponentRepository, ItemRepository, TransformationRepository,
    UnitOfWork,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisassembleCompositeItemInput {
    pub item_id: ItemId,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisassembleCompositeItemOutput {
    pub transformation_id: TransformationId,
    pub released: Vec<ItemId>,
}

pub struct DisassembleCompositeItemUseCase {
    items: Arc<dyn ItemRepository>,
    components: Arc<dyn ItemComponentRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl DisassembleCompositeItemUseCase {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        components: Arc<dyn ItemComponentRepository>,
        transformations: Arc<dyn TransformationRepository>,
        current_user: Arc<dyn CurrentUser>,
        clock: Arc<dyn Clock>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            items,
            components,
            transformations,
            current_user,
            clock,
            uow,
        }
    }

    pub async fn execute(
        &self,
        input: DisassembleCompositeItemInput,
    ) -> Result<DisassembleCompositeItemOutput, OperationError> {
        let item = self
            .items
            .find_by_id(input.item_id)
            .await?
            .filter(|i| !i.is_deleted())
            .ok_or(OperationError::ItemNotFound(input.item_id))?;

        if !item.is_composite {
            return Err(OperationError::CategoryRule(format!(
                "item {} is not a composite",
                item.identifier
            )));
        }
        if item.status.is_terminal() {
            return Err(OperationError::TerminalStatus {
                item: item.id,
                status: item.status,
            });
        }
        if !(item.status.is_available() || item.status == ItemStatus::Maintenance) {
            return Err(OperationError::ItemNotAvailable {
                item: item.id,
                status: item.status,
            });
        }

        let links = self.components.find_by_parent(item.id).await?;
        if links.is_empty() {
            return Err(OperationError::CategoryRule(format!(
                "composite {} has no linked components",
                item.identifier
            )));
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
                    details: TransformationDetails::Disassembly {
                        released_components: links.len() as u32,
                    },
                })
                .await?;

            self.transformations
                .add_source_item(transformation.id, item.id, 1.0, None)
                .await?;
            // Components were never status-mutated by assembly, so releasing
            // the links is enough to make them linkable again.
            for link in &links {
                self.transformations
                    .add_result_item(
                        transformation.id,
                        link.component_item_id,
                        f64::from(link.quantity),
                        None,
                    )
                    .await?;
            }
            self.components.delete_for_parent(item.id).await?;
            self.items
                .update(item.id, ItemPatch::status(ItemStatus::Disassembled))
                .await?;

            Ok(transformation.id)
        }
        .await;

        match result {
            Ok(transformation_id) => {
                self.uow.commit().await?;
                info!(item = %item.identifier, components = links.len(), "composite disassembled");
                Ok(DisassembleCompositeItemOutput {
                    transformation_id,
                    released: links.into_iter().map(|l| l.component_item_id).collect(),
                })
            }
            Err(err) => {
                let _ = self.uow.rollback().await;
                Err(err)
            }
        }
    }
}
