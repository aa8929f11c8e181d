//! Menu repository stored as documents in a [`CollectionStore`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::{CollectionStore, MenuRepository, MenuRepositoryError};
use crate::domain::{Category, CollectionName, Document, DocumentId, Filter, Menu, MenuItem};

use super::{decode, encode, map_store_error};

const MENU_ITEMS: CollectionName = CollectionName::from_static("menuitems");
const CATEGORIES: CollectionName = CollectionName::from_static("categories");
const MENUS: CollectionName = CollectionName::from_static("menus");

/// [`MenuRepository`] over the `menuitems`, `categories`, and `menus`
/// collections.
#[derive(Clone)]
pub struct DocumentMenuRepository {
    store: Arc<dyn CollectionStore>,
}

impl DocumentMenuRepository {
    /// Repository writing through the given store.
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    async fn find_all<T: DeserializeOwned>(
        &self,
        collection: &CollectionName,
        filter: &Filter,
    ) -> Result<Vec<T>, MenuRepositoryError> {
        self.store
            .find(collection, filter, None)
            .await
            .map_err(map_store_error)?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<T>, MenuRepositoryError> {
        self.store
            .find_by_id(collection, id)
            .await
            .map_err(map_store_error)?
            .map(decode)
            .transpose()
    }

    async fn insert_one<T: Serialize + Sync>(
        &self,
        collection: &CollectionName,
        entity: &T,
    ) -> Result<(), MenuRepositoryError> {
        let document = encode(entity)?;
        self.store
            .insert_many(collection, vec![document])
            .await
            .map_err(map_store_error)?;
        Ok(())
    }

    async fn update_one<T: DeserializeOwned>(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<T>, MenuRepositoryError> {
        self.store
            .update_by_id(collection, id, changes)
            .await
            .map_err(map_store_error)?
            .map(decode)
            .transpose()
    }

    async fn delete_one<T: DeserializeOwned>(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<T>, MenuRepositoryError> {
        self.store
            .delete_by_id(collection, id)
            .await
            .map_err(map_store_error)?
            .map(decode)
            .transpose()
    }
}

#[async_trait]
impl MenuRepository for DocumentMenuRepository {
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuRepositoryError> {
        self.find_all(&MENU_ITEMS, &Filter::All).await
    }

    async fn find_item(&self, id: &DocumentId) -> Result<Option<MenuItem>, MenuRepositoryError> {
        self.find_one(&MENU_ITEMS, id).await
    }

    async fn insert_item(&self, item: &MenuItem) -> Result<(), MenuRepositoryError> {
        self.insert_one(&MENU_ITEMS, item).await
    }

    async fn update_item(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<MenuItem>, MenuRepositoryError> {
        self.update_one(&MENU_ITEMS, id, changes).await
    }

    async fn delete_item(&self, id: &DocumentId) -> Result<Option<MenuItem>, MenuRepositoryError> {
        self.delete_one(&MENU_ITEMS, id).await
    }

    async fn items_for_partner(
        &self,
        partner_user: &DocumentId,
    ) -> Result<Vec<MenuItem>, MenuRepositoryError> {
        let filter = Filter::eq("businessPartner", partner_user.clone());
        self.find_all(&MENU_ITEMS, &filter).await
    }

    async fn items_for_menu(
        &self,
        menu: &DocumentId,
        available_only: bool,
    ) -> Result<Vec<MenuItem>, MenuRepositoryError> {
        let mut items: Vec<MenuItem> = self
            .find_all(&MENU_ITEMS, &Filter::eq("menu", menu.clone()))
            .await?;
        // Only an explicit `false` hides an item; a missing flag decodes as available.
        if available_only {
            items.retain(|item| item.is_available);
        }
        Ok(items)
    }

    async fn count_items_for_menu(
        &self,
        menu: &DocumentId,
        partner_user: Option<DocumentId>,
    ) -> Result<u64, MenuRepositoryError> {
        let mut clauses = vec![Filter::eq("menu", menu.clone())];
        if let Some(partner) = partner_user {
            clauses.push(Filter::eq("businessPartner", partner));
        }
        self.store
            .count(&MENU_ITEMS, &Filter::And(clauses))
            .await
            .map_err(map_store_error)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, MenuRepositoryError> {
        self.find_all(&CATEGORIES, &Filter::All).await
    }

    async fn find_category(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Category>, MenuRepositoryError> {
        self.find_one(&CATEGORIES, id).await
    }

    async fn insert_category(&self, category: &Category) -> Result<(), MenuRepositoryError> {
        self.insert_one(&CATEGORIES, category).await
    }

    async fn update_category(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Category>, MenuRepositoryError> {
        self.update_one(&CATEGORIES, id, changes).await
    }

    async fn delete_category(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Category>, MenuRepositoryError> {
        self.delete_one(&CATEGORIES, id).await
    }

    async fn list_menus(
        &self,
        restaurant: Option<DocumentId>,
    ) -> Result<Vec<Menu>, MenuRepositoryError> {
        let filter = restaurant.map_or(Filter::All, |id| Filter::eq("restaurant", id));
        self.find_all(&MENUS, &filter).await
    }

    async fn find_menu(&self, id: &DocumentId) -> Result<Option<Menu>, MenuRepositoryError> {
        self.find_one(&MENUS, id).await
    }

    async fn insert_menu(&self, menu: &Menu) -> Result<(), MenuRepositoryError> {
        self.insert_one(&MENUS, menu).await
    }

    async fn update_menu(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Menu>, MenuRepositoryError> {
        self.update_one(&MENUS, id, changes).await
    }

    async fn delete_menu(&self, id: &DocumentId) -> Result<Option<Menu>, MenuRepositoryError> {
        self.delete_one(&MENUS, id).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::outbound::memory::InMemoryCollectionStore;

    fn id(raw: &str) -> DocumentId {
        DocumentId::new(raw).expect("valid id")
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[fixture]
    fn store() -> Arc<InMemoryCollectionStore> {
        Arc::new(InMemoryCollectionStore::new())
    }

    async fn seed_items(store: &InMemoryCollectionStore) {
        store
            .insert_many(
                &MENU_ITEMS,
                vec![
                    doc(json!({"_id": "i1", "name": "Dal", "price": 90, "menu": "m1",
                        "businessPartner": {"$oid": "u1"}, "isAvailable": true})),
                    doc(json!({"_id": "i2", "name": "Kheer", "price": 60, "menu": "m1",
                        "businessPartner": "u2", "isAvailable": false})),
                    doc(json!({"_id": "i3", "name": "Poha", "price": 50, "menu": "m2",
                        "businessPartner": "u1", "isAvailable": true})),
                ],
            )
            .await
            .expect("seed items");
    }

    #[rstest]
    #[tokio::test]
    async fn partner_items_match_both_id_forms(store: Arc<InMemoryCollectionStore>) {
        seed_items(&store).await;
        let repository = DocumentMenuRepository::new(store);

        let items = repository.items_for_partner(&id("u1")).await.expect("query");

        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["i1", "i3"]);
    }

    #[rstest]
    #[tokio::test]
    async fn menu_items_can_be_limited_to_available(store: Arc<InMemoryCollectionStore>) {
        seed_items(&store).await;
        let repository = DocumentMenuRepository::new(store);

        let all = repository.items_for_menu(&id("m1"), false).await.expect("query");
        let available = repository.items_for_menu(&id("m1"), true).await.expect("query");

        assert_eq!(all.len(), 2);
        assert_eq!(available.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn items_without_an_availability_flag_stay_listed(
        store: Arc<InMemoryCollectionStore>,
    ) {
        store
            .insert_many(
                &MENU_ITEMS,
                vec![doc(json!({"_id": "i9", "name": "Sabzi", "price": 60, "menu": "m3",
                    "businessPartner": "u1"}))],
            )
            .await
            .expect("seed item");
        let repository = DocumentMenuRepository::new(store);

        let available = repository.items_for_menu(&id("m3"), true).await.expect("query");

        let names: Vec<&str> = available.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Sabzi"]);
    }

    #[rstest]
    #[tokio::test]
    async fn counts_can_be_scoped_to_a_partner(store: Arc<InMemoryCollectionStore>) {
        seed_items(&store).await;
        let repository = DocumentMenuRepository::new(store);

        let all = repository.count_items_for_menu(&id("m1"), None).await.expect("count");
        let own = repository
            .count_items_for_menu(&id("m1"), Some(id("u2")))
            .await
            .expect("count");

        assert_eq!((all, own), (2, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn undecodable_documents_surface_as_decode_errors(store: Arc<InMemoryCollectionStore>) {
        store
            .insert_many(&MENUS, vec![doc(json!({"_id": "m1", "name": 42}))])
            .await
            .expect("seed menus");
        let repository = DocumentMenuRepository::new(store);

        let err = repository.find_menu(&id("m1")).await.expect_err("bad shape");
        assert!(matches!(err, MenuRepositoryError::Decode { .. }));
    }
}
