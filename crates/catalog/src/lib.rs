//! Catalog domain module: equipment categories.
//!
//! A category defines what a kind of equipment looks like (metadata schema)
//! and which lifecycle operations it allows (subdivision, composition).
//! Implemented purely as deterministic domain logic (no IO, no storage).

pub mod category;
pub mod name;
pub mod schema;
pub mod validator;

pub use category::{Category, CategoryId, CategoryPatch, NewCategory};
pub use name::CategoryName;
pub use schema::{FieldDef, FieldType, MetadataRecord, MetadataSchema};
pub use validator::validate_metadata;
