//! Typed repositories layered over the
//! [`CollectionStore`](crate::domain::ports::CollectionStore) port.
//!
//! These adapters turn entity reads and writes into document operations so
//! the catalogue works against any store implementation.

mod menu_repository;
mod partner_directory;

pub use menu_repository::DocumentMenuRepository;
pub use partner_directory::DocumentPartnerDirectory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::Document;
use crate::domain::ports::{CollectionStoreError, MenuRepositoryError};

fn map_store_error(error: CollectionStoreError) -> MenuRepositoryError {
    match error {
        CollectionStoreError::Connection { message } => MenuRepositoryError::connection(message),
        CollectionStoreError::Query { message } => MenuRepositoryError::query(message),
        CollectionStoreError::Serialization { message } => MenuRepositoryError::decode(message),
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, MenuRepositoryError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| MenuRepositoryError::decode(err.to_string()))
}

fn encode<T: Serialize>(entity: &T) -> Result<Document, MenuRepositoryError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(MenuRepositoryError::decode("entity did not encode to an object")),
        Err(err) => Err(MenuRepositoryError::decode(err.to_string())),
    }
}
