//! Partner lookups over the `partners` collection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CollectionStore, PartnerDirectory, PartnerDirectoryError};
use crate::domain::{CollectionName, DocumentId, Filter, Partner};

use super::decode;

const PARTNERS: CollectionName = CollectionName::from_static("partners");

/// [`PartnerDirectory`] reading partner profiles from a [`CollectionStore`].
#[derive(Clone)]
pub struct DocumentPartnerDirectory {
    store: Arc<dyn CollectionStore>,
}

impl DocumentPartnerDirectory {
    /// Directory reading through the given store.
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PartnerDirectory for DocumentPartnerDirectory {
    async fn find_by_user_id(
        &self,
        user_id: &DocumentId,
    ) -> Result<Option<Partner>, PartnerDirectoryError> {
        let filter = Filter::eq("user", user_id.clone());
        let found = self
            .store
            .find(&PARTNERS, &filter, Some(1))
            .await
            .map_err(|err| PartnerDirectoryError::query(err.to_string()))?;
        found
            .into_iter()
            .next()
            .map(|document| {
                decode(document).map_err(|err| PartnerDirectoryError::query(err.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::PartnerStatus;
    use crate::outbound::memory::InMemoryCollectionStore;

    #[tokio::test]
    async fn finds_partner_by_owning_user() {
        let store = Arc::new(InMemoryCollectionStore::new());
        let Value::Object(partner) = json!({
            "_id": "p1",
            "user": {"$oid": "u1"},
            "businessName": "Sharma Kitchen",
            "status": "approved",
        }) else {
            panic!("fixture is an object");
        };
        store
            .insert_many(&PARTNERS, vec![partner])
            .await
            .expect("seed partner");
        let directory = DocumentPartnerDirectory::new(store);

        let found = directory
            .find_by_user_id(&DocumentId::new("u1").expect("id"))
            .await
            .expect("lookup")
            .expect("partner exists");
        assert_eq!(found.id.as_str(), "p1");
        assert_eq!(found.status, PartnerStatus::Approved);

        let missing = directory
            .find_by_user_id(&DocumentId::new("u9").expect("id"))
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }
}
