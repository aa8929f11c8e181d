//! Seeding runs against the in-memory store.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::{Filter, RelationshipRule};
use crate::outbound::memory::InMemoryCollectionStore;

#[fixture]
fn store() -> Arc<InMemoryCollectionStore> {
    Arc::new(InMemoryCollectionStore::new())
}

fn minimal(seed: u64) -> SeedOptions {
    SeedOptions {
        profile: SeedProfile::Minimal,
        seed,
        ..SeedOptions::default()
    }
}

async fn count(store: &InMemoryCollectionStore, collection: &'static str) -> u64 {
    store
        .count(&CollectionName::from_static(collection), &Filter::All)
        .await
        .expect("count")
}

#[rstest]
#[tokio::test]
async fn seeded_data_validates_cleanly(store: Arc<InMemoryCollectionStore>) {
    let seeder = Seeder::new(store.clone());

    let summary = seeder
        .seed(&SeedOptions::default())
        .await
        .expect("seeding succeeds");

    assert!(summary.success, "errors: {:?}", summary.validation.errors());
    assert_eq!(summary.profile, SeedProfile::Standard);
    assert_eq!(
        summary.total_records,
        summary.collections.iter().map(|m| m.records).sum::<u64>()
    );
    assert!(count(&store, "menuitems").await > 0);
}

#[rstest]
#[tokio::test]
async fn collections_are_written_parents_first(store: Arc<InMemoryCollectionStore>) {
    let seeder = Seeder::new(store);

    let summary = seeder.seed(&minimal(7)).await.expect("seeding succeeds");

    let written: Vec<&str> = summary
        .collections
        .iter()
        .map(|m| m.collection.as_str())
        .collect();
    assert_eq!(written.first(), Some(&"users"));
    let position = |name: &str| written.iter().position(|c| *c == name).expect("written");
    assert!(position("partners") < position("menus"));
    assert!(position("menus") < position("menuitems"));
    assert!(position("categories") < position("menuitems"));
}

#[rstest]
#[tokio::test]
async fn equal_seeds_produce_equal_datasets(store: Arc<InMemoryCollectionStore>) {
    let seeder = Seeder::new(store);

    let first = seeder.seed(&minimal(7)).await.expect("first run");
    let second = seeder.seed(&minimal(7)).await.expect("second run");
    let other = seeder.seed(&minimal(8)).await.expect("third run");

    assert_eq!(first.dataset_digest, second.dataset_digest);
    assert_ne!(first.dataset_digest, other.dataset_digest);
}

#[rstest]
#[tokio::test]
async fn full_runs_replace_existing_data(store: Arc<InMemoryCollectionStore>) {
    let seeder = Seeder::new(store.clone());

    let first = seeder.seed(&minimal(7)).await.expect("first run");
    seeder.seed(&minimal(7)).await.expect("second run");

    assert_eq!(
        count(&store, "users").await,
        first
            .collections
            .iter()
            .find(|m| m.collection == "users")
            .map(|m| m.records)
            .expect("users written")
    );
}

#[rstest]
#[case(SeedOptions { incremental: true, ..minimal(7) })]
#[case(SeedOptions { skip_cleanup: true, ..minimal(7) })]
#[tokio::test]
async fn keeping_existing_data_skips_cleanup(
    store: Arc<InMemoryCollectionStore>,
    #[case] options: SeedOptions,
) {
    let Value::Object(marker) = json!({"_id": "keep-me", "email": "ops@tiffin.test", "role": "admin"}) else {
        panic!("marker is an object");
    };
    store
        .insert_many(&CollectionName::from_static("users"), vec![marker])
        .await
        .expect("seed marker");
    let seeder = Seeder::new(store.clone());

    seeder.seed(&options).await.expect("seeding succeeds");

    let kept = store
        .find_by_id(
            &CollectionName::from_static("users"),
            &DocumentId::new("keep-me").expect("id"),
        )
        .await
        .expect("lookup");
    assert!(kept.is_some());
}

#[rstest]
#[tokio::test]
async fn cyclic_rules_abort_before_writing(store: Arc<InMemoryCollectionStore>) {
    let rules = vec![
        RelationshipRule::declared("users", "partners", "user", true),
        RelationshipRule::declared("partners", "users", "partner", true),
    ];
    let seeder = Seeder::with_rules(
        store.clone(),
        RelationshipManager::new(rules),
        DataValidator::standard(),
    );

    let err = seeder.seed(&minimal(7)).await.expect_err("cycle");

    assert!(matches!(err, SeedingError::Cycle(_)));
    assert!(store.collections().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn inspection_reports_order_and_blockers(store: Arc<InMemoryCollectionStore>) {
    let seeder = Seeder::new(store);
    seeder.seed(&minimal(7)).await.expect("seeding succeeds");

    let order = seeder.stored_order().await.expect("order");
    assert_eq!(order.first().map(CollectionName::as_str), Some("users"));

    let check = seeder
        .can_delete(&CollectionName::from_static("users"), None)
        .await
        .expect("check");
    assert!(!check.can_delete);
    assert!(
        check
            .blockers
            .iter()
            .any(|b| b.ends_with("partners records depend on this users"))
    );
}

#[test]
fn profiles_are_listed_smallest_first() {
    let names: Vec<&str> = profiles().iter().map(|p| p.name).collect();
    assert_eq!(names, ["minimal", "standard", "extensive"]);
}

#[test]
fn options_deserialise_with_defaults() {
    let options: SeedOptions =
        serde_json::from_value(json!({"profile": "minimal", "skipCleanup": true}))
            .expect("deserialise");
    assert_eq!(options.profile, SeedProfile::Minimal);
    assert_eq!(options.seed, DEFAULT_SEED_VALUE);
    assert!(options.skip_cleanup);
    assert!(!options.incremental);
}
