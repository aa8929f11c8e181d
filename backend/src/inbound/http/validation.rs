//! Parsing helpers for path and query parameters.

use serde_json::json;

use crate::domain::{CollectionName, DocumentId, Error};

/// Parse a path or query segment naming a document.
pub(crate) fn parse_document_id(raw: &str, field: &'static str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|err| {
        Error::invalid_request(format!("Invalid {field}")).with_details(json!({
            "field": field,
            "value": raw,
            "reason": err.to_string(),
        }))
    })
}

pub(crate) fn parse_collection_name(raw: &str) -> Result<CollectionName, Error> {
    CollectionName::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "collection",
            "value": raw,
        }))
    })
}
