//! Behavioural coverage for the menu service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    CollectionStore, MockMenuRepository, MockPartnerMenuCache, PartnerMenuCacheError,
};
use crate::domain::{CollectionName, ErrorCode};
use crate::outbound::documents::{DocumentMenuRepository, DocumentPartnerDirectory};
use crate::outbound::memory::{InMemoryCollectionStore, InMemoryPartnerMenuCache};

struct FixtureClock;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

fn id(raw: &str) -> DocumentId {
    DocumentId::new(raw).expect("valid id")
}

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

struct Harness {
    store: Arc<InMemoryCollectionStore>,
    cache: Arc<InMemoryPartnerMenuCache>,
    service: MenuService,
}

impl Harness {
    async fn seed(&self, collection: &'static str, documents: Vec<Value>) {
        self.store
            .insert_many(
                &CollectionName::from_static(collection),
                documents.into_iter().map(doc).collect(),
            )
            .await
            .expect("seed succeeds");
    }
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryCollectionStore::new());
    let cache = Arc::new(InMemoryPartnerMenuCache::new());
    let service = MenuService::new(
        Arc::new(DocumentMenuRepository::new(store.clone())),
        Arc::new(DocumentPartnerDirectory::new(store.clone())),
        cache.clone(),
        Arc::new(FixtureClock),
    );
    Harness {
        store,
        cache,
        service,
    }
}

fn service_with(repository: MockMenuRepository, cache: MockPartnerMenuCache) -> MenuService {
    MenuService::new(
        Arc::new(repository),
        Arc::new(DocumentPartnerDirectory::new(Arc::new(
            InMemoryCollectionStore::new(),
        ))),
        Arc::new(cache),
        Arc::new(FixtureClock),
    )
}

fn draft(name: &str, images: &[&str]) -> MenuItemDraft {
    MenuItemDraft {
        name: name.to_owned(),
        description: String::new(),
        price: 120.0,
        category: None,
        menu: None,
        image_url: None,
        images: images.iter().map(|s| (*s).to_owned()).collect(),
        is_available: None,
        is_vegetarian: true,
        tags: Vec::new(),
    }
}

fn item(raw_id: &str, partner: &str) -> MenuItem {
    MenuItem {
        id: id(raw_id),
        name: "Rajma Chawal".to_owned(),
        description: String::new(),
        price: 110.0,
        category: None,
        menu: None,
        business_partner: id(partner),
        image_url: None,
        images: Vec::new(),
        is_available: true,
        is_vegetarian: true,
        tags: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

#[rstest]
#[tokio::test]
async fn created_items_promote_the_first_gallery_image(harness: Harness) {
    let created = harness
        .service
        .create_item(draft("Aloo Paratha", &["a.jpg", "b.jpg"]), id("u1"))
        .await
        .expect("create succeeds");

    assert_eq!(created.image_url.as_deref(), Some("a.jpg"));
    assert!(created.is_available);
    assert_eq!(created.created_at, Some(fixture_timestamp()));
    let stored = harness.service.find_item(&created.id).await.expect("stored");
    assert_eq!(stored, created);
}

#[rstest]
#[tokio::test]
async fn missing_items_are_not_found(harness: Harness) {
    let err = harness
        .service
        .find_item(&id("nope"))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Menu item with ID nope not found");
}

#[rstest]
#[tokio::test]
async fn empty_patches_are_rejected_before_lookup(harness: Harness) {
    let item_err = harness
        .service
        .update_item(&id("i1"), &MenuItemPatch::default())
        .await
        .expect_err("empty patch");
    let menu_err = harness
        .service
        .update_menu(&id("m1"), &MenuPatch::default())
        .await
        .expect_err("empty patch");

    for err in [item_err, menu_err] {
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Update data cannot be empty");
    }
}

#[rstest]
#[tokio::test]
async fn updates_merge_fields_and_stamp_time(harness: Harness) {
    harness
        .seed("menuitems", vec![json!({"_id": "i1", "name": "Dal", "price": 80, "businessPartner": "u1"})])
        .await;
    let patch = MenuItemPatch {
        price: Some(95.0),
        ..MenuItemPatch::default()
    };

    let updated = harness.service.update_item(&id("i1"), &patch).await.expect("update");

    assert_eq!(updated.name, "Dal");
    assert!((updated.price - 95.0).abs() < f64::EPSILON);
    assert_eq!(updated.updated_at, Some(fixture_timestamp()));
}

#[rstest]
#[tokio::test]
async fn partner_listing_is_cached_and_evicted_on_write(harness: Harness) {
    harness
        .seed(
            "menuitems",
            vec![
                json!({"_id": "i1", "name": "Dal", "price": 80, "businessPartner": {"$oid": "u1"}}),
                json!({"_id": "i2", "name": "Poha", "price": 50, "businessPartner": "u2"}),
            ],
        )
        .await;
    let key = PartnerMenuCacheKey::for_partner(&id("u1"));

    let first = harness.service.find_items_by_partner(&id("u1")).await;
    assert_eq!(first.len(), 1);
    let cached = harness.cache.get(&key).await.expect("cache read");
    assert_eq!(cached.as_deref(), Some(first.as_slice()));

    harness
        .service
        .create_item(draft("Upma", &[]), id("u1"))
        .await
        .expect("create");
    assert!(harness.cache.get(&key).await.expect("cache read").is_none());

    let refreshed = harness.service.find_items_by_partner(&id("u1")).await;
    assert_eq!(refreshed.len(), 2);
}

#[rstest]
#[tokio::test]
async fn empty_partner_listings_are_not_cached(harness: Harness) {
    let items = harness.service.find_items_by_partner(&id("u9")).await;

    assert!(items.is_empty());
    let key = PartnerMenuCacheKey::for_partner(&id("u9"));
    assert!(harness.cache.get(&key).await.expect("cache read").is_none());
}

#[tokio::test]
async fn cache_hits_skip_the_repository() {
    let mut repository = MockMenuRepository::new();
    repository.expect_items_for_partner().never();
    let mut cache = MockPartnerMenuCache::new();
    cache
        .expect_get()
        .times(1)
        .returning(|_| Ok(Some(vec![item("i1", "u1")])));

    let items = service_with(repository, cache)
        .find_items_by_partner(&id("u1"))
        .await;

    assert_eq!(items, vec![item("i1", "u1")]);
}

#[tokio::test]
async fn cache_failures_degrade_to_empty_listings() {
    let mut repository = MockMenuRepository::new();
    repository.expect_items_for_partner().never();
    let mut cache = MockPartnerMenuCache::new();
    cache
        .expect_get()
        .returning(|_| Err(PartnerMenuCacheError::backend("connection reset")));

    let items = service_with(repository, cache)
        .find_items_by_partner(&id("u1"))
        .await;

    assert!(items.is_empty());
}

#[tokio::test]
async fn store_failures_degrade_to_empty_listings() {
    let mut repository = MockMenuRepository::new();
    repository
        .expect_items_for_partner()
        .returning(|_| Err(MenuRepositoryError::connection("refused")));
    let mut cache = MockPartnerMenuCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_put().never();

    let items = service_with(repository, cache)
        .find_items_by_partner(&id("u1"))
        .await;

    assert!(items.is_empty());
}

#[tokio::test]
async fn repository_outages_surface_as_service_unavailable() {
    let mut repository = MockMenuRepository::new();
    repository
        .expect_list_items()
        .returning(|| Err(MenuRepositoryError::connection("refused")));

    let err = service_with(repository, MockPartnerMenuCache::new())
        .find_all_items()
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(None, "Cannot delete menu with 2 items. Please remove items first.")]
#[case(Some("u1"), "Cannot delete menu with 1 items. Please remove items first.")]
#[tokio::test]
async fn menus_with_items_cannot_be_deleted(
    harness: Harness,
    #[case] partner: Option<&str>,
    #[case] expected: &str,
) {
    harness
        .seed("menus", vec![json!({"_id": "m1", "name": "Lunch", "restaurant": "p1"})])
        .await;
    harness
        .seed(
            "menuitems",
            vec![
                json!({"_id": "i1", "name": "Dal", "price": 80, "menu": "m1", "businessPartner": "u1"}),
                json!({"_id": "i2", "name": "Roti", "price": 10, "menu": "m1", "businessPartner": "u2"}),
            ],
        )
        .await;

    let err = harness
        .service
        .delete_menu(&id("m1"), partner.map(id))
        .await
        .expect_err("guarded");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), expected);
}

#[rstest]
#[tokio::test]
async fn empty_menus_delete_and_then_vanish(harness: Harness) {
    harness
        .seed("menus", vec![json!({"_id": "m1", "name": "Lunch", "restaurant": "p1"})])
        .await;

    let outcome = harness.service.delete_menu(&id("m1"), None).await.expect("delete");
    assert_eq!(outcome, Deleted { deleted: true });

    let err = harness
        .service
        .delete_menu(&id("m1"), None)
        .await
        .expect_err("already gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Menu with ID m1 not found");
}

#[rstest]
#[tokio::test]
async fn menu_views_sort_and_filter_items(harness: Harness) {
    harness
        .seed("menus", vec![json!({"_id": "m1", "name": "Lunch", "restaurant": "p1"})])
        .await;
    harness
        .seed(
            "menuitems",
            vec![
                json!({"_id": "i1", "name": "Sabzi", "price": 60, "menu": "m1", "businessPartner": "u1"}),
                json!({"_id": "i2", "name": "Dal", "price": 80, "menu": "m1", "businessPartner": "u1",
                    "isAvailable": false}),
            ],
        )
        .await;

    let view = harness.service.menu_with_items(&id("m1")).await.expect("menu");
    let names: Vec<&str> = view.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Dal", "Sabzi"]);

    let storefront = harness
        .service
        .restaurant_menus(&id("p1"))
        .await
        .expect("restaurant menus");
    let [only] = storefront.as_slice() else {
        panic!("expected one menu, got {storefront:?}");
    };
    let available: Vec<&str> = only.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(available, ["Sabzi"]);
}

#[rstest]
#[tokio::test]
async fn item_details_embed_the_category(harness: Harness) {
    harness
        .seed("categories", vec![json!({"_id": "c1", "name": "Thali", "description": "Full meals"})])
        .await;
    harness
        .seed(
            "menuitems",
            vec![
                json!({"_id": "i1", "name": "Veg Thali", "price": 150, "category": "c1", "businessPartner": "u1"}),
                json!({"_id": "i2", "name": "Lassi", "price": 40, "category": "c9", "businessPartner": "u1"}),
            ],
        )
        .await;

    let details = harness.service.item_details(&id("i1")).await.expect("details");
    let body = serde_json::to_value(&details).expect("serialise");
    assert_eq!(
        body.get("category"),
        Some(&json!({"id": "c1", "name": "Thali", "description": "Full meals"}))
    );

    let dangling = harness.service.item_details(&id("i2")).await.expect("details");
    assert!(dangling.category.is_none());
    assert_eq!(dangling.item.category, Some(id("c9")));
}

#[rstest]
#[tokio::test]
async fn partner_views_hide_foreign_menus_and_items(harness: Harness) {
    harness
        .seed(
            "partners",
            vec![
                json!({"_id": "p1", "user": "u1", "businessName": "Annapurna", "status": "approved"}),
                json!({"_id": "p2", "user": "u2", "businessName": "Dabba Co", "status": "approved"}),
            ],
        )
        .await;
    harness
        .seed(
            "menus",
            vec![
                json!({"_id": "m1", "name": "Lunch", "restaurant": "p1"}),
                json!({"_id": "m2", "name": "Dinner", "restaurant": "p2"}),
            ],
        )
        .await;
    harness
        .seed(
            "menuitems",
            vec![
                json!({"_id": "i1", "name": "Dal", "price": 80, "menu": "m1", "businessPartner": "u1"}),
                json!({"_id": "i2", "name": "Roti", "price": 10, "menu": "m1", "businessPartner": "u2"}),
            ],
        )
        .await;

    let mine = harness.service.partner_menus(&id("u1")).await.expect("menus");
    let [lunch] = mine.as_slice() else {
        panic!("expected only the caller's menu, got {mine:?}");
    };
    assert_eq!(lunch.items.len(), 1);

    let err = harness
        .service
        .partner_menu(&id("u1"), &id("m2"))
        .await
        .expect_err("foreign menu");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Menu not found or you don't have access to it");

    let err = harness
        .service
        .delete_partner_menu(&id("u1"), &id("m1"))
        .await
        .expect_err("own items remain");
    assert_eq!(
        err.message(),
        "Cannot delete menu with 1 items. Please remove items first."
    );
}

#[rstest]
#[tokio::test]
async fn callers_without_partner_profiles_are_not_found(harness: Harness) {
    let err = harness
        .service
        .create_menu_for_partner(
            &id("u7"),
            MenuDraft {
                name: "Breakfast".to_owned(),
                description: String::new(),
                is_active: None,
            },
        )
        .await
        .expect_err("no profile");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
