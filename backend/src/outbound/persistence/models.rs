//! Diesel row structs for the document tables.
//!
//! Internal to the persistence adapter; the domain only sees [`Document`]
//! maps.
//!
//! [`Document`]: crate::domain::Document

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde_json::Value;

use super::schema::{collections, documents};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collections)]
pub(crate) struct NewCollectionRow<'a> {
    pub name: &'a str,
}

/// A document ready to insert; `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub collection: &'a str,
    pub id: String,
    pub body: Value,
}

/// Result row of the duplicate grouping query.
#[derive(Debug, QueryableByName)]
pub(crate) struct DuplicateGroupsRow {
    #[diesel(sql_type = BigInt)]
    pub duplicate_groups: i64,
}
