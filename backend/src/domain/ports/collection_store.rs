//! Port abstraction over the schemaless document store.
//!
//! The relationship manager, data validator, seeder, and the document-backed
//! menu repository all read and write through this trait. Adapters exist for
//! an in-memory map and for PostgreSQL JSONB.

use async_trait::async_trait;

use crate::domain::{CollectionName, Document, DocumentId, Filter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection store adapters.
    pub enum CollectionStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "collection store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "collection store query failed: {message}",
        /// A document could not be encoded or decoded.
        Serialization { message: String } => "document serialisation failed: {message}",
    }
}

/// Named collections of JSON documents.
///
/// Documents are returned in insertion order. Reads on a collection that does
/// not exist behave as reads on an empty collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Names of every collection that exists, in lexical order.
    async fn collections(&self) -> Result<Vec<CollectionName>, CollectionStoreError>;

    /// Whether the collection exists, even if empty.
    async fn has_collection(&self, name: &CollectionName) -> Result<bool, CollectionStoreError>;

    /// Create the collection if it is missing.
    async fn ensure_collection(&self, name: &CollectionName) -> Result<(), CollectionStoreError>;

    /// Number of documents matching the filter.
    async fn count(
        &self,
        name: &CollectionName,
        filter: &Filter,
    ) -> Result<u64, CollectionStoreError>;

    /// Documents matching the filter, up to `limit` when given.
    async fn find(
        &self,
        name: &CollectionName,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, CollectionStoreError>;

    /// The document with the given id.
    async fn find_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError>;

    /// Append documents, creating the collection when needed.
    ///
    /// Documents without an `_id` receive a generated one. A duplicate id
    /// fails the whole batch. Returns the number of documents written.
    async fn insert_many(
        &self,
        name: &CollectionName,
        documents: Vec<Document>,
    ) -> Result<u64, CollectionStoreError>;

    /// Merge `changes` into the top level of the document and return the
    /// updated document, or `None` when no document has the id.
    async fn update_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Document>, CollectionStoreError>;

    /// Remove and return the document with the given id.
    async fn delete_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError>;

    /// Remove every document in the collection, keeping the collection.
    async fn delete_all(&self, name: &CollectionName) -> Result<u64, CollectionStoreError>;

    /// Number of distinct non-null values of the top-level `field` shared by
    /// more than one document.
    async fn duplicate_groups(
        &self,
        name: &CollectionName,
        field: &str,
    ) -> Result<u64, CollectionStoreError>;
}
