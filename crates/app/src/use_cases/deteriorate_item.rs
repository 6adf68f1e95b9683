//! Record partial deterioration of an item, salvaging what remains.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use gearbase_core::UserId;
use gearbase_items::{Item, ItemId, ItemIdentifier, ItemPatch, ItemStatus, NewItem};
use gearbase_transformations::{NewTransformation, TransformationDetails, TransformationId};

use crate::error::OperationError;
use crate::ports::{
    CategoryRepository, Clock, CurrentUser, ItemRepository, TransformationRepository, UnitOfWork,
};
use crate::quantity::{numeric_value, resolve_quantity_field};

/// Identifier suffix separating the damaged twin from its source.
const TWIN_TAG: &str = "DET";
const IDENTIFIER_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeteriorateItemInput {
    pub item_id: ItemId,
    pub original_value: f64,
    pub damaged_value: f64,
    pub remaining_value: f64,
    pub damage_location: Option<String>,
    pub damage_reason: String,
    pub unit: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeteriorateItemOutput {
    pub transformation_id: TransformationId,
    pub source_item_id: ItemId,
    pub source_status: ItemStatus,
    pub discarded_item_id: ItemId,
}

pub struct DeteriorateItemUseCase {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
    transformations: Arc<dyn TransformationRepository>,
    current_user: Arc<dyn CurrentUser>,
    clock: Arc<dyn Clock>,
    uow: Arc<dyn UnitOfWork>,
}

impl DeteriorateItemUseCase {
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

    pub async fn execute(
        &self,
        input: DeteriorateItemInput,
    ) -> Result<DeteriorateItemOutput, OperationError> {
        let source = self
            .items
            .find_by_id(input.item_id)
            .await?
            .filter(|i| !i.is_deleted())
            .ok_or(OperationError::ItemNotFound(input.item_id))?;

        if !(source.status.is_available() || source.status == ItemStatus::Maintenance) {
            return Err(OperationError::ItemNotAvailable {
                item: source.id,
                status: source.status,
            });
        }

        if input.damaged_value <= 0.0 {
            return Err(OperationError::InvalidQuantity(
                "damaged value must be greater than zero".to_string(),
            ));
        }
        if input.remaining_value < 0.0 {
            return Err(OperationError::InvalidQuantity(
                "remaining value cannot be negative".to_string(),
            ));
        }
        // Exact reconciliation, checked before any write. Off-by-epsilon
        // sums are rejected.
        if input.original_value != input.damaged_value + input.remaining_value {
            return Err(OperationError::QuantityMismatch {
                original: input.original_value,
                damaged: input.damaged_value,
                remaining: input.remaining_value,
            });
        }

        let category = self
            .categories
            .find_by_id(source.category_id)
            .await?
            .ok_or(OperationError::CategoryNotFound(source.category_id))?;

        let field = resolve_quantity_field(&category, &input.unit, &source.metadata)
            .filter(|f| numeric_value(&source.metadata, f).is_some())
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
            .perform(&input, &source, &field, performed_by, performed_at)
            .await
        {
            Ok(output) => {
                self.uow.commit().await?;
                info!(
                    source = %source.identifier,
                    damaged = input.damaged_value,
                    remaining = input.remaining_value,
                    "item deteriorated"
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
        input: &DeteriorateItemInput,
        source: &Item,
        field: &str,
        performed_by: UserId,
        performed_at: DateTime<Utc>,
    ) -> Result<DeteriorateItemOutput, OperationError> {
        let transformation = self
            .transformations
            .create(NewTransformation {
                organization_id: source.organization_id,
                performed_by,
                performed_at,
                reason: input.damage_reason.clone(),
                notes: input.notes.clone(),
                details: TransformationDetails::Deterioration {
                    original_value: input.original_value,
                    damaged_value: input.damaged_value,
                    remaining_value: input.remaining_value,
                    unit: input.unit.clone(),
                    location: input.damage_location.clone(),
                    reason: input.damage_reason.clone(),
                },
            })
            .await?;

        self.transformations
            .add_source_item(transformation.id, source.id, input.original_value, None)
            .await?;

        let source_status = if input.remaining_value > 0.0 {
            ItemStatus::Available
        } else {
            ItemStatus::Discarded
        };
        let mut source_metadata = source.metadata.clone();
        source_metadata.insert(field.to_string(), json!(input.remaining_value));
        self.items
            .update(
                source.id,
                ItemPatch {
                    status: Some(source_status),
                    metadata: Some(source_metadata),
                    ..Default::default()
                },
            )
            .await?;

        let twin_identifier = twin_identifier(&source.identifier, performed_at)?;
        if self.items.exists_by_identifier(&twin_identifier).await? {
            return Err(OperationError::DuplicateItemIdentifier(twin_identifier.to_string()));
        }

        let mut twin_metadata = source.metadata.clone();
        twin_metadata.insert(field.to_string(), json!(input.damaged_value));
        twin_metadata.insert("damage_reason".to_string(), json!(input.damage_reason));
        if let Some(location) = &input.damage_location {
            twin_metadata.insert("damage_location".to_string(), json!(location));
        }

        let twin = self
            .items
            .create(NewItem {
                organization_id: source.organization_id,
                category_id: source.category_id,
                name: source.name.clone(),
                brand: source.brand.clone(),
                model: source.model.clone(),
                status: ItemStatus::Discarded,
                identifier: twin_identifier,
                has_unique_numbering: false,
                is_composite: false,
                metadata: twin_metadata,
                image_url: None,
                origin_transformation_id: Some(transformation.id.0),
            })
            .await?;

        self.transformations
            .add_result_item(transformation.id, twin.id, input.damaged_value, None)
            .await?;

        Ok(DeteriorateItemOutput {
            transformation_id: transformation.id,
            source_item_id: source.id,
            source_status,
            discarded_item_id: twin.id,
        })
    }
}

/// Derive the damaged twin's identifier: `<source>-DET-<timestamp token>`,
/// truncating the source part when the result would exceed the identifier
/// length limit. The token is never four digits, so the twin never parses as
/// a numbered sequence member.
fn twin_identifier(
    source: &ItemIdentifier,
    performed_at: DateTime<Utc>,
) -> Result<ItemIdentifier, OperationError> {
    let stamp = performed_at.format("%Y%m%d%H%M%S");
    let suffix = format!("-{TWIN_TAG}-{stamp}");
    let base_len = IDENTIFIER_MAX - suffix.len();
    let base = &source.as_str()[..source.as_str().len().min(base_len)];
    Ok(ItemIdentifier::parse(&format!("{base}{suffix}"))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn twin_identifier_embeds_a_timestamp_token() {
        let source = ItemIdentifier::parse("ROPE-0001").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 8, 6, 12, 30, 0).unwrap();
        let twin = twin_identifier(&source, at).unwrap();
        assert_eq!(twin.as_str(), "ROPE-0001-DET-20260806123000");
        assert!(!twin.has_numbering());
    }

    #[test]
    fn twin_identifier_truncates_long_sources() {
        let source = ItemIdentifier::parse(&"X".repeat(50)).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 8, 6, 12, 30, 0).unwrap();
        let twin = twin_identifier(&source, at).unwrap();
        assert_eq!(twin.as_str().len(), 50);
        assert!(twin.as_str().ends_with("-DET-20260806123000"));
    }
}
