//! Menu catalogue: entities, payloads, and the service operating on them.

mod model;
mod service;

pub use self::model::{
    Category, CategoryDraft, CategoryPatch, CategorySummary, Menu, MenuDraft, MenuItem,
    MenuItemDetails, MenuItemDraft, MenuItemPatch, MenuPatch, MenuWithItems, Partner,
    PartnerStatus, patch_fields,
};
pub use self::service::{DEFAULT_MENU_CACHE_TTL, Deleted, MenuService};
