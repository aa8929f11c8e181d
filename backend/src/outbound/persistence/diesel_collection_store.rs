//! PostgreSQL-backed `CollectionStore` holding documents as JSONB.
//!
//! Each document is one row keyed by `(collection, id)` where `id` is the
//! normalised string form of its `_id`. A `seq` column preserves insertion
//! order. Collections are tracked in their own table so that empty
//! collections still exist after `delete_all`.
//!
//! Only the collection scope, id lookups, and unfiltered counts run in SQL.
//! Dotted paths may cross arrays and ids compare across both `_id` forms, so
//! other filters are evaluated with [`Filter::matches`] on loaded rows.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Jsonb, Text};
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{CollectionStore, CollectionStoreError};
use crate::domain::{CollectionName, Document, DocumentId, Filter, ID_FIELD};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DuplicateGroupsRow, NewCollectionRow, NewDocumentRow};
use super::pool::DbPool;
use super::schema::{collections, documents};

/// Rows per INSERT statement, keeping bind parameters well under the
/// PostgreSQL limit.
const INSERT_CHUNK: usize = 1000;

const UPDATE_SQL: &str = "UPDATE documents SET body = body || $3 \
     WHERE collection = $1 AND id = $2 RETURNING body";

const DUPLICATE_GROUPS_SQL: &str = "SELECT COUNT(*) AS duplicate_groups FROM ( \
     SELECT CASE \
         WHEN jsonb_typeof(body -> $2) = 'object' AND (body -> $2) ? '$oid' \
             THEN to_jsonb(body -> $2 ->> '$oid')::text \
         ELSE (body -> $2)::text \
     END AS grouping_key \
     FROM documents \
     WHERE collection = $1 AND jsonb_typeof(body -> $2) <> 'null' \
     GROUP BY grouping_key \
     HAVING COUNT(*) > 1 \
 ) duplicated";

#[derive(Debug, QueryableByName)]
struct BodyRow {
    #[diesel(sql_type = Jsonb)]
    body: Value,
}

/// Diesel implementation of [`CollectionStore`].
#[derive(Clone)]
pub struct DieselCollectionStore {
    pool: DbPool,
}

impl DieselCollectionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_document(body: Value) -> Result<Document, CollectionStoreError> {
    match body {
        Value::Object(document) => Ok(document),
        other => Err(CollectionStoreError::serialization(format!(
            "stored body is a {} rather than an object",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

/// Assign missing ids and reject ids repeated within the batch.
fn stage_batch(
    name: &CollectionName,
    documents: Vec<Document>,
) -> Result<Vec<(DocumentId, Document)>, CollectionStoreError> {
    let mut seen = HashSet::with_capacity(documents.len());
    let mut staged = Vec::with_capacity(documents.len());
    for mut document in documents {
        let id = match DocumentId::of(&document) {
            Some(id) => id,
            None => {
                let id = DocumentId::generate();
                document.insert(ID_FIELD.to_owned(), Value::from(id.clone()));
                id
            }
        };
        if !seen.insert(id.clone()) {
            return Err(CollectionStoreError::query(format!(
                "duplicate id {id} in {name}"
            )));
        }
        staged.push((id, document));
    }
    Ok(staged)
}

impl DieselCollectionStore {
    async fn load_bodies(
        &self,
        name: &CollectionName,
        limit: Option<i64>,
    ) -> Result<Vec<Value>, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = documents::table
            .filter(documents::collection.eq(name.as_str()))
            .order(documents::seq.asc())
            .select(documents::body)
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query
            .load::<Value>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl CollectionStore for DieselCollectionStore {
    async fn collections(&self) -> Result<Vec<CollectionName>, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<String> = collections::table
            .order(collections::name.asc())
            .select(collections::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        names
            .into_iter()
            .map(|name| {
                CollectionName::new(&name).map_err(|err| {
                    CollectionStoreError::serialization(format!("stored collection name: {err}"))
                })
            })
            .collect()
    }

    async fn has_collection(&self, name: &CollectionName) -> Result<bool, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            collections::table.filter(collections::name.eq(name.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn ensure_collection(&self, name: &CollectionName) -> Result<(), CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(collections::table)
            .values(NewCollectionRow {
                name: name.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn count(
        &self,
        name: &CollectionName,
        filter: &Filter,
    ) -> Result<u64, CollectionStoreError> {
        if matches!(filter, Filter::All) {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let total: i64 = documents::table
                .filter(documents::collection.eq(name.as_str()))
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            return Ok(to_count(total));
        }
        let mut matching = 0_u64;
        for body in self.load_bodies(name, None).await? {
            if filter.matches(&into_document(body)?) {
                matching += 1;
            }
        }
        Ok(matching)
    }

    async fn find(
        &self,
        name: &CollectionName,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, CollectionStoreError> {
        let take = limit.unwrap_or(usize::MAX);
        if matches!(filter, Filter::All) {
            let sql_limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
            return self
                .load_bodies(name, sql_limit)
                .await?
                .into_iter()
                .map(into_document)
                .collect();
        }
        let mut found = Vec::new();
        for body in self.load_bodies(name, None).await? {
            if found.len() >= take {
                break;
            }
            let document = into_document(body)?;
            if filter.matches(&document) {
                found.push(document);
            }
        }
        Ok(found)
    }

    async fn find_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        documents::table
            .filter(documents::collection.eq(name.as_str()))
            .filter(documents::id.eq(id.as_str()))
            .select(documents::body)
            .first::<Value>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(into_document)
            .transpose()
    }

    async fn insert_many(
        &self,
        name: &CollectionName,
        documents: Vec<Document>,
    ) -> Result<u64, CollectionStoreError> {
        self.ensure_collection(name).await?;
        let staged = stage_batch(name, documents)?;
        if staged.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<String> = staged.iter().map(|(id, _)| id.as_str().to_owned()).collect();
        let clash: Option<String> = documents::table
            .filter(documents::collection.eq(name.as_str()))
            .filter(documents::id.eq_any(&ids))
            .select(documents::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(id) = clash {
            return Err(CollectionStoreError::query(format!(
                "duplicate id {id} in {name}"
            )));
        }

        let rows: Vec<NewDocumentRow<'_>> = staged
            .into_iter()
            .map(|(id, document)| NewDocumentRow {
                collection: name.as_str(),
                id: id.as_str().to_owned(),
                body: Value::Object(document),
            })
            .collect();
        let mut written = 0_usize;
        for chunk in rows.chunks(INSERT_CHUNK) {
            written += diesel::insert_into(documents::table)
                .values(chunk)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(u64::try_from(written).unwrap_or(u64::MAX))
    }

    async fn update_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
        mut changes: Document,
    ) -> Result<Option<Document>, CollectionStoreError> {
        changes.remove(ID_FIELD);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query(UPDATE_SQL)
            .bind::<Text, _>(name.as_str())
            .bind::<Text, _>(id.as_str())
            .bind::<Jsonb, _>(Value::Object(changes))
            .get_result::<BodyRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(|row| into_document(row.body))
            .transpose()
    }

    async fn delete_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            documents::table
                .filter(documents::collection.eq(name.as_str()))
                .filter(documents::id.eq(id.as_str())),
        )
        .returning(documents::body)
        .get_result::<Value>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(into_document)
        .transpose()
    }

    async fn delete_all(&self, name: &CollectionName) -> Result<u64, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scoped = documents::table.filter(documents::collection.eq(name.as_str()));
        let removed = diesel::delete(scoped)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn duplicate_groups(
        &self,
        name: &CollectionName,
        field: &str,
    ) -> Result<u64, CollectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DuplicateGroupsRow = sql_query(DUPLICATE_GROUPS_SQL)
            .bind::<Text, _>(name.as_str())
            .bind::<Text, _>(field)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_count(row.duplicate_groups))
    }
}
