//! Transformation aggregate root and its item links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearbase_core::{AggregateRoot, Entity, EntityId, OrganizationId, UserId};
use gearbase_items::ItemId;

/// Transformation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformationId(pub EntityId);

impl TransformationId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for TransformationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Kind of structural lifecycle event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationType {
    Subdivision,
    Deterioration,
    Donation,
    Loss,
    Recovery,
    Assembly,
    Disassembly,
}

/// One produced piece of a subdivision: the new identifier and the magnitude
/// it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionPart {
    pub identifier: String,
    pub value: f64,
}

/// Typed payload describing what happened; the variant determines the
/// transformation's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformationDetails {
    Subdivision {
        original_value: f64,
        unit: String,
        parts: Vec<SubdivisionPart>,
    },
    Deterioration {
        original_value: f64,
        damaged_value: f64,
        remaining_value: f64,
        unit: String,
        location: Option<String>,
        reason: String,
    },
    Donation {
        location: String,
        recipients: Vec<String>,
        recoverable: bool,
    },
    Loss {
        last_seen_location: Option<String>,
        circumstances: String,
    },
    Recovery {
        location: Option<String>,
        condition: Option<String>,
    },
    Assembly {
        component_count: u32,
    },
    Disassembly {
        released_components: u32,
    },
}

impl TransformationDetails {
    pub fn kind(&self) -> TransformationType {
        match self {
            TransformationDetails::Subdivision { .. } => TransformationType::Subdivision,
            TransformationDetails::Deterioration { .. } => TransformationType::Deterioration,
            TransformationDetails::Donation { .. } => TransformationType::Donation,
            TransformationDetails::Loss { .. } => TransformationType::Loss,
            TransformationDetails::Recovery { .. } => TransformationType::Recovery,
            TransformationDetails::Assembly { .. } => TransformationType::Assembly,
            TransformationDetails::Disassembly { .. } => TransformationType::Disassembly,
        }
    }
}

/// Aggregate root: an immutable record of a structural lifecycle event.
///
/// Append-only audit data: the repository port exposes no update operation,
/// so a persisted transformation can never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: TransformationId,
    pub organization_id: OrganizationId,
    pub performed_by: UserId,
    pub performed_at: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub details: TransformationDetails,
}

impl Transformation {
    pub fn kind(&self) -> TransformationType {
        self.details.kind()
    }
}

impl Entity for Transformation {
    type Id = TransformationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Transformation {}

/// Creation payload: a transformation without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransformation {
    pub organization_id: OrganizationId,
    pub performed_by: UserId,
    pub performed_at: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub details: TransformationDetails,
}

/// Whether a linked item was consumed or produced by the transformation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Result,
}

/// Transformation-item link identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformationItemId(pub EntityId);

impl TransformationItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

/// Links a transformation to one item it consumed (`source`) or produced
/// (`result`). Every transformation has at least one source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationItem {
    pub id: TransformationItemId,
    pub transformation_id: TransformationId,
    pub item_id: ItemId,
    pub role: Role,
    pub quantity: f64,
    pub notes: Option<String>,
}

impl Entity for TransformationItem {
    type Id = TransformationItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_derived_from_the_details_variant() {
        let details = TransformationDetails::Donation {
            location: "Club de montaña vecino".to_string(),
            recipients: vec!["Club Norte".to_string()],
            recoverable: true,
        };
        assert_eq!(details.kind(), TransformationType::Donation);
    }

    #[test]
    fn details_serialize_with_a_kind_tag() {
        let details = TransformationDetails::Subdivision {
            original_value: 50.0,
            unit: "m".to_string(),
            parts: vec![SubdivisionPart {
                identifier: "ROPE-1-A".to_string(),
                value: 20.0,
            }],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["kind"], "subdivision");
        assert_eq!(json["parts"][0]["identifier"], "ROPE-1-A");

        let back: TransformationDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Source).unwrap(), "\"source\"");
        assert_eq!(serde_json::to_string(&Role::Result).unwrap(), "\"result\"");
    }
}
