//! Application layer: lifecycle use cases and the ports they consume.
//!
//! Use cases orchestrate the domain crates into atomic business operations:
//! each one reads through repository ports, validates business rules,
//! performs its write sequence inside a unit of work, and returns either the
//! identifiers of affected entities or a structured [`OperationError`]. This
//! crate contains no IO of its own; it composes infrastructure traits.

pub mod error;
pub mod ports;
pub mod quantity;
pub mod use_cases;

pub use error::OperationError;
pub use ports::{
    CategoryRepository, Clock, CurrentUser, ImageStorage, ImageUpload, ItemComponentRepository,
    ItemRepository, PortError, PortResult, TransformationRepository, UnitOfWork,
};
pub use use_cases::create_composite_item::{
    ComponentSpec, CreateCompositeItemInput, CreateCompositeItemOutput, CreateCompositeItemUseCase,
};
pub use use_cases::create_item::{CreateItemInput, CreateItemUseCase, CreatedItem};
pub use use_cases::deteriorate_item::{
    DeteriorateItemInput, DeteriorateItemOutput, DeteriorateItemUseCase,
};
pub use use_cases::disassemble_composite_item::{
    DisassembleCompositeItemInput, DisassembleCompositeItemOutput, DisassembleCompositeItemUseCase,
};
pub use use_cases::donate_items::{DonateItemsInput, DonateItemsOutput, DonateItemsUseCase};
pub use use_cases::recover_item::{RecoverItemInput, RecoverItemOutput, RecoverItemUseCase};
pub use use_cases::report_item_lost::{
    ReportItemLostInput, ReportItemLostOutput, ReportItemLostUseCase,
};
pub use use_cases::subdivide_item::{
    SubdivideItemInput, SubdivideItemOutput, SubdivideItemUseCase, SubdivisionSpec,
};
