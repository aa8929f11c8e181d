//! Port abstraction for catalogue persistence.
use async_trait::async_trait;

use crate::domain::{Category, Document, DocumentId, Menu, MenuItem};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by menu repository adapters.
    pub enum MenuRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "menu repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "menu repository query failed: {message}",
        /// A stored document did not match the entity shape.
        Decode { message: String } => "menu repository decode failed: {message}",
    }
}

/// Storage of menus, menu items, and categories.
///
/// `update_*` methods merge the supplied top-level fields and return the
/// updated entity; `None` means no entity had the id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Every menu item.
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuRepositoryError>;

    /// A menu item by id.
    async fn find_item(&self, id: &DocumentId) -> Result<Option<MenuItem>, MenuRepositoryError>;

    /// Store a new menu item.
    async fn insert_item(&self, item: &MenuItem) -> Result<(), MenuRepositoryError>;

    /// Merge changes into a menu item.
    async fn update_item(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<MenuItem>, MenuRepositoryError>;

    /// Remove a menu item, returning it when it existed.
    async fn delete_item(&self, id: &DocumentId) -> Result<Option<MenuItem>, MenuRepositoryError>;

    /// Items whose `businessPartner` is the given user id, in either id form.
    async fn items_for_partner(
        &self,
        partner_user: &DocumentId,
    ) -> Result<Vec<MenuItem>, MenuRepositoryError>;

    /// Items filed under the menu, optionally only those available.
    async fn items_for_menu(
        &self,
        menu: &DocumentId,
        available_only: bool,
    ) -> Result<Vec<MenuItem>, MenuRepositoryError>;

    /// Number of items filed under the menu, optionally restricted to one
    /// partner's items.
    async fn count_items_for_menu(
        &self,
        menu: &DocumentId,
        partner_user: Option<DocumentId>,
    ) -> Result<u64, MenuRepositoryError>;

    /// Every category.
    async fn list_categories(&self) -> Result<Vec<Category>, MenuRepositoryError>;

    /// A category by id.
    async fn find_category(&self, id: &DocumentId)
    -> Result<Option<Category>, MenuRepositoryError>;

    /// Store a new category.
    async fn insert_category(&self, category: &Category) -> Result<(), MenuRepositoryError>;

    /// Merge changes into a category.
    async fn update_category(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Category>, MenuRepositoryError>;

    /// Remove a category, returning it when it existed.
    async fn delete_category(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Category>, MenuRepositoryError>;

    /// Menus, optionally only those of one restaurant (partner id).
    async fn list_menus(
        &self,
        restaurant: Option<DocumentId>,
    ) -> Result<Vec<Menu>, MenuRepositoryError>;

    /// A menu by id.
    async fn find_menu(&self, id: &DocumentId) -> Result<Option<Menu>, MenuRepositoryError>;

    /// Store a new menu.
    async fn insert_menu(&self, menu: &Menu) -> Result<(), MenuRepositoryError>;

    /// Merge changes into a menu.
    async fn update_menu(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Menu>, MenuRepositoryError>;

    /// Remove a menu, returning it when it existed.
    async fn delete_menu(&self, id: &DocumentId) -> Result<Option<Menu>, MenuRepositoryError>;
}
