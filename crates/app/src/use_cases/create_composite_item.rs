//! Assemble a composite item from existing component items.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gearbase_items::{Item, ItemId, NewItemComponent};
use gearbase_transformations::{NewTransformation, TransformationDetails, TransformationId};

use crate::error::OperationError;
use crate::ports::{
    Clock, CurrentUser, ImageStorage, ItemComponentRepository, ItemRepository,
    TransformationRepository, UnitOfWork,
};
use crate::use_cases::create_item::{CreateItemInput, CreateItemUseCase, CreatedItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub item_id: ItemId,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompositeItemInput {
    pub item: CreateItemInput,
    pub components: Vec<ComponentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompositeItemOutput {
    pub item: CreatedItem,
    pub transformation_id: TransformationId,
    pub component_count: u32,
}

pub struct CreateCompositeItemUseCase {
    create_item: Arc<CreateItemUseCase>,
    items: Arc<dyn ItemRepository>,
    components: Arc<dyn ItemComponentRepository>,
    transformations: Arc<dyn TransformationRepository>,
    storage: Arc<dyn ImageStorage>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl CreateCompositeItemUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_item: Arc<CreateItemUseCase>,
        items: Arc<dyn ItemRepository>,
        components: Arc<dyn ItemComponentRepository>,
        transformations: Arc<dyn TransformationRepository>,
        storage: Arc<dyn ImageStorage>,
        current_user: Arc<dyn CurrentUser>,
        clock: Arc<dyn Clock>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            create_item,
            items,
            components,
            transformations,
            storage,
            current_user,
            clock,
            uow,
        }
    }

    pub async fn execute(
        &self,
        input: CreateCompositeItemInput,
    ) -> Result<CreateCompositeItemOutput, OperationError> {
        // The parent is always a single, unnumbered unit.
        let mut parent_input = input.item.clone();
        parent_input.quantity = 1;
        parent_input.has_unique_numbering = false;

        let (category, base) = self.create_item.check_preconditions(&parent_input).await?;

        if !category.can_be_composite {
            return Err(OperationError::CategoryRule(format!(
                "category '{}' does not allow composite items",
                category.name
            )));
        }
        if input.components.is_empty() {
            return Err(OperationError::InvalidQuantity(
                "a composite requires at least one component".to_string(),
            ));
        }

        // Every component is validated before the parent item exists.
        let mut seen = HashSet::new();
        let mut resolved: Vec<(Item, &ComponentSpec)> = Vec::with_capacity(input.components.len());
        for spec in &input.components {
            if !seen.insert(spec.item_id) {
                return Err(OperationError::ComponentUnavailable {
                    item: spec.item_id,
                    reason: "listed more than once".to_string(),
                });
            }

            let item = self
                .items
                .find_by_id(spec.item_id)
                .await?
                .filter(|i| !i.is_deleted())
                .ok_or(OperationError::ItemNotFound(spec.item_id))?;

            if item.organization_id != parent_input.organization_id {
                return Err(OperationError::OrganizationMismatch);
            }
            if item.is_composite {
                return Err(OperationError::ComponentUnavailable {
                    item: item.id,
                    reason: "a composite cannot be nested inside another composite".to_string(),
                });
            }
            if !item.status.is_available() {
                return Err(OperationError::ComponentUnavailable {
                    item: item.id,
                    reason: format!("not available (status: {})", item.status),
                });
            }
            if !self.components.find_by_component(item.id).await?.is_empty() {
                return Err(OperationError::ComponentUnavailable {
                    item: item.id,
                    reason: "already part of another composite".to_string(),
                });
            }

            resolved.push((item, spec));
        }

        let performed_by = self.current_user.current_user_id().await?;
        let performed_at = self.clock.now();

        let image_url = match &parent_input.image {
            Some(image) => Some(self.storage.upload(image.clone(), base.as_str()).await?),
            None => None,
        };

        self.uow.begin().await?;
        let result: Result<CreateCompositeItemOutput, OperationError> = async {
            let created = self
                .create_item
                .create_units(&parent_input, &category, &base, image_url.clone(), true)
                .await?;
            let parent = created
                .into_iter()
                .next()
                .ok_or_else(|| OperationError::Infrastructure("empty creation batch".to_string()))?;

            for (component, spec) in &resolved {
                self.components
                    .create(NewItemComponent {
                        parent_item_id: parent.id,
                        component_item_id: component.id,
                        quantity: spec.quantity,
                        notes: spec.notes.clone(),
                    })
                    .await?;
            }

            let transformation = self
                .transformations
                .create(NewTransformation {
                    organization_id: parent_input.organization_id,
                    performed_by,
                    performed_at,
                    reason: format!("Ensamblaje de {}", parent.identifier),
                    notes: None,
                    details: TransformationDetails::Assembly {
                        component_count: resolved.len() as u32,
                    },
                })
                .await?;
            for (component, spec) in &resolved {
                self.transformations
                    .add_source_item(transformation.id, component.id, f64::from(spec.quantity), None)
                    .await?;
            }
            self.transformations
                .add_result_item(transformation.id, parent.id, 1.0, None)
                .await?;

            Ok(CreateCompositeItemOutput {
                item: parent,
                transformation_id: transformation.id,
                component_count: resolved.len() as u32,
            })
        }
        .await;

        match result {
            Ok(output) => {
                self.uow.commit().await?;
                info!(
                    parent = %output.item.identifier,
                    components = output.component_count,
                    "composite item created"
                );
                Ok(output)
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
}
