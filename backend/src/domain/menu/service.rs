//! Catalogue operations over menus, menu items, and categories.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ports::{
    MenuRepository, MenuRepositoryError, PartnerDirectory, PartnerDirectoryError, PartnerMenuCache,
    PartnerMenuCacheKey,
};
use crate::domain::{Document, DocumentId, Error};

use super::model::{
    Category, CategoryDraft, CategoryPatch, CategorySummary, Menu, MenuDraft, MenuItem,
    MenuItemDetails, MenuItemDraft, MenuItemPatch, MenuPatch, MenuWithItems, Partner, patch_fields,
};

/// Expiry applied to cached partner listings unless configured otherwise.
pub const DEFAULT_MENU_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Body returned by delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    const YES: Self = Self { deleted: true };
}

/// Menu service over the repository, partner directory, and listing cache.
#[derive(Clone)]
pub struct MenuService {
    repository: Arc<dyn MenuRepository>,
    partners: Arc<dyn PartnerDirectory>,
    cache: Arc<dyn PartnerMenuCache>,
    clock: Arc<dyn Clock>,
    cache_ttl: Duration,
}

impl MenuService {
    /// Create a service with the default cache expiry.
    pub fn new(
        repository: Arc<dyn MenuRepository>,
        partners: Arc<dyn PartnerDirectory>,
        cache: Arc<dyn PartnerMenuCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            partners,
            cache,
            clock,
            cache_ttl: DEFAULT_MENU_CACHE_TTL,
        }
    }

    /// Override how long partner listings stay cached.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    fn map_repository_error(error: MenuRepositoryError) -> Error {
        match error {
            MenuRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("menu repository unavailable: {message}"))
            }
            MenuRepositoryError::Query { message } => {
                Error::internal(format!("menu repository error: {message}"))
            }
            MenuRepositoryError::Decode { message } => {
                Error::internal(format!("stored menu data is malformed: {message}"))
            }
        }
    }

    fn map_directory_error(error: PartnerDirectoryError) -> Error {
        match error {
            PartnerDirectoryError::Connection { message } => {
                Error::service_unavailable(format!("partner directory unavailable: {message}"))
            }
            PartnerDirectoryError::Query { message } => {
                Error::internal(format!("partner directory error: {message}"))
            }
        }
    }

    fn require_changes<P: Serialize>(patch: &P) -> Result<Document, Error> {
        patch_fields(patch)?.ok_or_else(|| Error::invalid_request("Update data cannot be empty"))
    }

    fn stamped(&self, mut changes: Document) -> Result<Document, Error> {
        let now = serde_json::to_value(self.clock.utc())
            .map_err(|err| Error::internal(format!("failed to encode timestamp: {err}")))?;
        changes.insert("updatedAt".to_owned(), now);
        Ok(changes)
    }

    async fn evict_partner(&self, partner: &DocumentId) {
        let key = PartnerMenuCacheKey::for_partner(partner);
        if let Err(err) = self.cache.evict(&key).await {
            warn!(%key, error = %err, "failed to evict partner menu listing");
        }
    }

    // Items

    /// Every menu item.
    pub async fn find_all_items(&self) -> Result<Vec<MenuItem>, Error> {
        self.repository
            .list_items()
            .await
            .map_err(Self::map_repository_error)
    }

    /// One menu item.
    ///
    /// # Errors
    /// `not_found` when no item has the id.
    pub async fn find_item(&self, id: &DocumentId) -> Result<MenuItem, Error> {
        self.repository
            .find_item(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| item_not_found(id))
    }

    /// Store a new item owned by `business_partner`.
    ///
    /// When the draft carries gallery images but no primary image, the first
    /// gallery image becomes the primary one.
    pub async fn create_item(
        &self,
        draft: MenuItemDraft,
        business_partner: DocumentId,
    ) -> Result<MenuItem, Error> {
        draft.validate()?;
        let now = self.clock.utc();
        let image_url = draft.primary_image();
        let item = MenuItem {
            id: DocumentId::generate(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            menu: draft.menu,
            business_partner,
            image_url,
            images: draft.images,
            is_available: draft.is_available.unwrap_or(true),
            is_vegetarian: draft.is_vegetarian,
            tags: draft.tags,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.repository
            .insert_item(&item)
            .await
            .map_err(Self::map_repository_error)?;
        self.evict_partner(&item.business_partner).await;
        debug!(item = %item.id, partner = %item.business_partner, "menu item created");
        Ok(item)
    }

    /// Apply a partial update to an item.
    ///
    /// # Errors
    /// `invalid_request` for an empty or invalid patch; `not_found` when no
    /// item has the id.
    pub async fn update_item(
        &self,
        id: &DocumentId,
        patch: &MenuItemPatch,
    ) -> Result<MenuItem, Error> {
        let changes = Self::require_changes(patch)?;
        patch.validate()?;
        let item = self
            .repository
            .update_item(id, self.stamped(changes)?)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| item_not_found(id))?;
        self.evict_partner(&item.business_partner).await;
        Ok(item)
    }

    /// Remove an item.
    pub async fn delete_item(&self, id: &DocumentId) -> Result<Deleted, Error> {
        let item = self
            .repository
            .delete_item(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| item_not_found(id))?;
        self.evict_partner(&item.business_partner).await;
        Ok(Deleted::YES)
    }

    /// An item with its category summarised in place of the id.
    pub async fn item_details(&self, id: &DocumentId) -> Result<MenuItemDetails, Error> {
        let mut item = self.find_item(id).await?;
        let category = match &item.category {
            Some(category_id) => self
                .repository
                .find_category(category_id)
                .await
                .map_err(Self::map_repository_error)?
                .as_ref()
                .map(CategorySummary::from),
            None => None,
        };
        if category.is_some() {
            item.category = None;
        }
        Ok(MenuItemDetails { item, category })
    }

    /// Items owned by a partner user, read through the listing cache.
    ///
    /// Never fails: cache and store problems are logged and produce an empty
    /// listing so storefronts keep rendering.
    pub async fn find_items_by_partner(&self, partner: &DocumentId) -> Vec<MenuItem> {
        let key = PartnerMenuCacheKey::for_partner(partner);
        match self.cache.get(&key).await {
            Ok(Some(items)) => {
                debug!(%key, "partner menu cache hit");
                return items;
            }
            Ok(None) => debug!(%key, "partner menu cache miss"),
            Err(err) => {
                warn!(%key, error = %err, "partner menu cache read failed");
                return Vec::new();
            }
        }

        let items = match self.repository.items_for_partner(partner).await {
            Ok(items) => items,
            Err(err) => {
                warn!(%partner, error = %err, "failed to load partner menu items");
                return Vec::new();
            }
        };
        if !items.is_empty() {
            if let Err(err) = self.cache.put(&key, &items, self.cache_ttl).await {
                warn!(%key, error = %err, "failed to cache partner menu listing");
                return Vec::new();
            }
        }
        items
    }

    // Categories

    /// Every category.
    pub async fn find_all_categories(&self) -> Result<Vec<Category>, Error> {
        self.repository
            .list_categories()
            .await
            .map_err(Self::map_repository_error)
    }

    /// 404 `Category with ID <id> not found` when absent.
    pub async fn find_category(&self, id: &DocumentId) -> Result<Category, Error> {
        self.repository
            .find_category(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| category_not_found(id))
    }

    /// Store a new active-by-default category with a generated id.
    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category, Error> {
        draft.validate()?;
        let now = self.clock.utc();
        let category = Category {
            id: DocumentId::generate(),
            name: draft.name,
            description: draft.description,
            business_partner: None,
            is_active: draft.is_active.unwrap_or(true),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.repository
            .insert_category(&category)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(category)
    }

    /// Apply a non-empty patch and refresh `updatedAt`.
    pub async fn update_category(
        &self,
        id: &DocumentId,
        patch: &CategoryPatch,
    ) -> Result<Category, Error> {
        let changes = Self::require_changes(patch)?;
        patch.validate()?;
        self.repository
            .update_category(id, self.stamped(changes)?)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| category_not_found(id))
    }

    pub async fn delete_category(&self, id: &DocumentId) -> Result<Deleted, Error> {
        self.repository
            .delete_category(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| category_not_found(id))?;
        Ok(Deleted::YES)
    }

    // Menus

    /// Store a new menu for the given restaurant (partner id).
    pub async fn create_menu(
        &self,
        draft: MenuDraft,
        restaurant: DocumentId,
    ) -> Result<Menu, Error> {
        draft.validate()?;
        let now = self.clock.utc();
        let menu = Menu {
            id: DocumentId::generate(),
            name: draft.name,
            description: draft.description,
            restaurant,
            is_active: draft.is_active.unwrap_or(true),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.repository
            .insert_menu(&menu)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(menu)
    }

    /// Menus, optionally for one restaurant, each with every item filed
    /// under it.
    pub async fn find_all_menus(
        &self,
        restaurant: Option<DocumentId>,
    ) -> Result<Vec<MenuWithItems>, Error> {
        let menus = self
            .repository
            .list_menus(restaurant)
            .await
            .map_err(Self::map_repository_error)?;
        self.attach_items(menus, false).await
    }

    pub async fn find_menu(&self, id: &DocumentId) -> Result<Menu, Error> {
        self.repository
            .find_menu(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| menu_not_found(id))
    }

    pub async fn update_menu(&self, id: &DocumentId, patch: &MenuPatch) -> Result<Menu, Error> {
        let changes = Self::require_changes(patch)?;
        patch.validate()?;
        self.repository
            .update_menu(id, self.stamped(changes)?)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| menu_not_found(id))
    }

    /// Delete a menu that no longer holds items.
    ///
    /// With `partner_user`, only that partner's items count towards the
    /// guard. The count and the delete are separate store calls, so an item
    /// filed concurrently can still be stranded.
    ///
    /// # Errors
    /// `invalid_request` while items remain; `not_found` when no menu has
    /// the id.
    pub async fn delete_menu(
        &self,
        id: &DocumentId,
        partner_user: Option<DocumentId>,
    ) -> Result<Deleted, Error> {
        let remaining = self
            .repository
            .count_items_for_menu(id, partner_user)
            .await
            .map_err(Self::map_repository_error)?;
        if remaining > 0 {
            return Err(Error::invalid_request(format!(
                "Cannot delete menu with {remaining} items. Please remove items first."
            ))
            .with_details(serde_json::json!({ "itemCount": remaining })));
        }
        self.repository
            .delete_menu(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| menu_not_found(id))?;
        Ok(Deleted::YES)
    }

    /// A menu with its items sorted by name.
    pub async fn menu_with_items(&self, id: &DocumentId) -> Result<MenuWithItems, Error> {
        let menu = self.find_menu(id).await?;
        let mut items = self
            .repository
            .items_for_menu(id, false)
            .await
            .map_err(Self::map_repository_error)?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(MenuWithItems { menu, items })
    }

    /// A restaurant's menus with only their available items.
    pub async fn restaurant_menus(
        &self,
        restaurant: &DocumentId,
    ) -> Result<Vec<MenuWithItems>, Error> {
        let menus = self
            .repository
            .list_menus(Some(restaurant.clone()))
            .await
            .map_err(Self::map_repository_error)?;
        self.attach_items(menus, true).await
    }

    async fn attach_items(
        &self,
        menus: Vec<Menu>,
        available_only: bool,
    ) -> Result<Vec<MenuWithItems>, Error> {
        let mut views = Vec::with_capacity(menus.len());
        for menu in menus {
            let items = self
                .repository
                .items_for_menu(&menu.id, available_only)
                .await
                .map_err(Self::map_repository_error)?;
            views.push(MenuWithItems { menu, items });
        }
        Ok(views)
    }

    // Partner-owned views

    /// The partner profile owned by a user.
    ///
    /// # Errors
    /// `not_found` when the user has no partner profile.
    pub async fn partner_for_user(&self, user: &DocumentId) -> Result<Partner, Error> {
        self.partners
            .find_by_user_id(user)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| {
                Error::not_found("Partner profile not found")
                    .with_details(serde_json::json!({ "userId": user }))
            })
    }

    /// Create an item owned by the calling partner user.
    pub async fn create_item_for_partner(
        &self,
        user: &DocumentId,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, Error> {
        let partner = self.partner_for_user(user).await?;
        self.create_item(draft, partner.user).await
    }

    /// Create a menu under the calling partner's restaurant.
    pub async fn create_menu_for_partner(
        &self,
        user: &DocumentId,
        draft: MenuDraft,
    ) -> Result<Menu, Error> {
        let partner = self.partner_for_user(user).await?;
        self.create_menu(draft, partner.id).await
    }

    /// The calling partner's menus, each limited to the partner's own items.
    pub async fn partner_menus(&self, user: &DocumentId) -> Result<Vec<MenuWithItems>, Error> {
        let partner = self.partner_for_user(user).await?;
        let mut menus = self.find_all_menus(Some(partner.id)).await?;
        for view in &mut menus {
            view.items.retain(|item| item.business_partner == *user);
        }
        Ok(menus)
    }

    /// One of the calling partner's menus with the partner's own items.
    pub async fn partner_menu(
        &self,
        user: &DocumentId,
        id: &DocumentId,
    ) -> Result<MenuWithItems, Error> {
        let partner = self.partner_for_user(user).await?;
        let mut view = self.menu_with_items(id).await?;
        ensure_owned(&view.menu, &partner)?;
        view.items.retain(|item| item.business_partner == *user);
        Ok(view)
    }

    /// Update one of the calling partner's menus.
    pub async fn update_partner_menu(
        &self,
        user: &DocumentId,
        id: &DocumentId,
        patch: &MenuPatch,
    ) -> Result<Menu, Error> {
        let partner = self.partner_for_user(user).await?;
        ensure_owned(&self.find_menu(id).await?, &partner)?;
        self.update_menu(id, patch).await
    }

    /// Delete one of the calling partner's menus once it holds none of the
    /// partner's items.
    pub async fn delete_partner_menu(
        &self,
        user: &DocumentId,
        id: &DocumentId,
    ) -> Result<Deleted, Error> {
        let partner = self.partner_for_user(user).await?;
        ensure_owned(&self.find_menu(id).await?, &partner)?;
        self.delete_menu(id, Some(user.clone())).await
    }
}

fn ensure_owned(menu: &Menu, partner: &Partner) -> Result<(), Error> {
    if menu.restaurant == partner.id {
        Ok(())
    } else {
        Err(Error::not_found("Menu not found or you don't have access to it"))
    }
}

fn item_not_found(id: &DocumentId) -> Error {
    Error::not_found(format!("Menu item with ID {id} not found"))
        .with_details(serde_json::json!({ "id": id }))
}

fn category_not_found(id: &DocumentId) -> Error {
    Error::not_found(format!("Category with ID {id} not found"))
}

fn menu_not_found(id: &DocumentId) -> Error {
    Error::not_found(format!("Menu with ID {id} not found"))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
