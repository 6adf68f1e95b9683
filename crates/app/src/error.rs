//! Use-case boundary error taxonomy.
//!
//! All variants are pure data (kind + context) so callers pattern-match on
//! structured failure rather than catching by type. Infrastructure failures
//! are collapsed into [`OperationError::Infrastructure`] with a generic
//! message; raw causes are logged, never leaked.

use thiserror::Error;

use gearbase_catalog::CategoryId;
use gearbase_core::DomainError;
use gearbase_items::{ItemId, ItemStatus};
use gearbase_transformations::TransformationId;

use crate::ports::PortError;

/// Failure of a lifecycle use case.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("transformation {0} not found")]
    TransformationNotFound(TransformationId),

    /// The candidate metadata violated the category schema. Carries every
    /// violation so callers can report all problems at once.
    #[error("invalid metadata: {}", .violations.join("; "))]
    InvalidMetadata { violations: Vec<String> },

    /// A value object factory rejected its input.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The item's current state does not permit the operation.
    #[error("item {item} is not available for this operation (status: {status})")]
    ItemNotAvailable { item: ItemId, status: ItemStatus },

    /// The item reached a state no lifecycle operation can leave.
    #[error("item {item} is in terminal status {status}")]
    TerminalStatus { item: ItemId, status: ItemStatus },

    /// The item's category does not allow the operation.
    #[error("category rule violated: {0}")]
    CategoryRule(String),

    #[error("items belong to different organizations")]
    OrganizationMismatch,

    /// A declared component cannot be linked into a composite.
    #[error("component {item} cannot be used: {reason}")]
    ComponentUnavailable { item: ItemId, reason: String },

    #[error("item identifier '{0}' already exists")]
    DuplicateItemIdentifier(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Deterioration values must reconcile exactly.
    #[error("quantities do not reconcile: {original} != {damaged} + {remaining}")]
    QuantityMismatch {
        original: f64,
        damaged: f64,
        remaining: f64,
    },

    #[error("item cannot be recovered: {0}")]
    NotRecoverable(String),

    /// Unexpected repository/storage failure, surfaced generically.
    #[error("operation failed: {0}")]
    Infrastructure(String),
}

impl From<PortError> for OperationError {
    fn from(value: PortError) -> Self {
        match value {
            PortError::UniqueViolation(identifier) => Self::DuplicateItemIdentifier(identifier),
            PortError::NotFound => Self::Infrastructure("a record vanished mid-operation".to_string()),
            PortError::Backend(msg) => Self::Infrastructure(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_surface_as_duplicate_identifiers() {
        let err: OperationError = PortError::UniqueViolation("ROPE-0001".to_string()).into();
        assert_eq!(err, OperationError::DuplicateItemIdentifier("ROPE-0001".to_string()));
    }

    #[test]
    fn backend_failures_are_generic() {
        let err: OperationError = PortError::Backend("connection reset".to_string()).into();
        match err {
            OperationError::Infrastructure(msg) => assert_eq!(msg, "connection reset"),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }

    #[test]
    fn invalid_metadata_reports_every_violation() {
        let err = OperationError::InvalidMetadata {
            violations: vec!["field 'a' is required".into(), "field 'b' must be a number".into()],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("'a' is required"));
        assert!(rendered.contains("'b' must be a number"));
    }
}
