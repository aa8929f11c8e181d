//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::ports::CollectionStore;
use crate::domain::{CollectionName, MenuService, Role, Seeder};
use crate::inbound::http::auth::{Claims, JwtVerifier};
use crate::inbound::http::state::HttpState;
use crate::outbound::documents::{DocumentMenuRepository, DocumentPartnerDirectory};
use crate::outbound::memory::{InMemoryCollectionStore, InMemoryPartnerMenuCache};

/// Signing secret shared by test tokens and the test verifier.
pub const TEST_SECRET: &[u8] = b"tiffin-test-secret";

/// 2100-01-01T00:00:00Z.
const FAR_FUTURE: u64 = 4_102_444_800;

pub fn token_with_claims(claims: &Claims, secret: &[u8]) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).expect("token encodes")
}

/// `Authorization` header value for a user acting under `role`.
pub fn bearer(user_id: &str, role: Role) -> (&'static str, String) {
    let claims = Claims {
        sub: user_id.to_owned(),
        role: role.as_str().to_owned(),
        exp: FAR_FUTURE,
    };
    ("Authorization", format!("Bearer {}", token_with_claims(&claims, TEST_SECRET)))
}

/// Handler state over fresh in-memory adapters, plus the store they share.
pub fn memory_state() -> (HttpState, Arc<InMemoryCollectionStore>) {
    let store = Arc::new(InMemoryCollectionStore::new());
    let menus = MenuService::new(
        Arc::new(DocumentMenuRepository::new(store.clone())),
        Arc::new(DocumentPartnerDirectory::new(store.clone())),
        Arc::new(InMemoryPartnerMenuCache::new()),
        Arc::new(DefaultClock),
    );
    let seeder = Seeder::new(store.clone());
    let state = HttpState::new(menus, seeder, JwtVerifier::from_secret(TEST_SECRET));
    (state, store)
}

/// Store an approved partner profile owned by `user_id`.
pub async fn insert_partner(store: &InMemoryCollectionStore, partner_id: &str, user_id: &str) {
    let Value::Object(partner) = json!({
        "_id": partner_id,
        "user": user_id,
        "businessName": "Sharma Kitchen",
        "status": "approved",
    }) else {
        panic!("partner fixture is an object");
    };
    store
        .insert_many(&CollectionName::from_static("partners"), vec![partner])
        .await
        .expect("partner stored");
}
