//! Domain primitives, services, and ports.
//!
//! Purpose: define the marketplace's document model and the services that
//! operate on it without reference to any transport or storage technology.
//! Adapters live under `inbound` and `outbound` and talk to the domain only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Document model: [`CollectionName`], [`DocumentId`], [`Document`],
//!   [`Filter`].
//! - [`RelationshipManager`]: parent/child rules, processing order, orphan and
//!   deletion checks.
//! - [`DataValidator`]: declarative field rules, business checks, and
//!   collection statistics.
//! - [`MenuService`]: catalogue operations with a cache-aside partner listing.
//! - [`Seeder`]: deterministic sample data runs.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures with trace ids.

pub mod auth;
pub mod document;
pub mod error;
pub mod menu;
pub mod ports;
pub mod relationships;
pub mod seeding;
pub mod trace_id;
pub mod validation;

pub use self::auth::{Principal, Role, UnknownRole};
pub use self::document::{
    CollectionName, CollectionNameError, Document, DocumentId, DocumentIdError, Filter, ID_FIELD,
    is_truthy, referenced_ids, values_at,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::menu::{
    Category, CategoryDraft, CategoryPatch, CategorySummary, DEFAULT_MENU_CACHE_TTL, Deleted, Menu,
    MenuDraft, MenuItem, MenuItemDetails, MenuItemDraft, MenuItemPatch, MenuPatch, MenuService,
    MenuWithItems, Partner, PartnerStatus,
};
pub use self::relationships::{
    CycleDetected, DeletionCheck, ORPHAN_SAMPLE_LIMIT, RelationshipManager, RelationshipRule,
};
pub use self::seeding::{
    CollectionSeedMetrics, DEFAULT_SEED_VALUE, ProfileInfo, SeedOptions, SeedSummary, Seeder,
    SeedingError, profiles,
};
pub use self::trace_id::TraceId;
pub use self::validation::{
    CollectionStats, DataValidationRule, DataValidator, RuleKind, ValidationReport,
};
pub use seed_data::SeedProfile;
