//! Operator endpoints for sample data.
//!
//! ```text
//! POST /api/v1/seeder/seed
//! GET  /api/v1/seeder/validate
//! GET  /api/v1/seeder/stats
//! GET  /api/v1/seeder/order
//! GET  /api/v1/seeder/profiles
//! GET  /api/v1/seeder/can-delete/{collection}?recordId=
//! ```
//!
//! Every route requires an admin bearer token.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CollectionStoreError;
use crate::domain::{
    Error, ProfileInfo, Role, SeedOptions, SeedingError, profiles as available_profiles,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    CollectionStatsSchema, DeletionCheckSchema, ErrorSchema, ProfileInfoSchema, SeedOptionsSchema,
    SeedSummarySchema, ValidationReportSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_collection_name, parse_document_id};

/// Parent-first processing order of the stored collections.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeedingOrderResponse {
    #[schema(example = json!(["users", "partners", "categories", "menus", "menuitems"]))]
    pub order: Vec<String>,
}

/// Dataset sizes accepted by the `profile` seeding option.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilesResponse {
    #[schema(value_type = Vec<ProfileInfoSchema>)]
    pub profiles: Vec<ProfileInfo>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CanDeleteQuery {
    /// Check a single record instead of the whole collection.
    pub record_id: Option<String>,
}

fn store_error(err: CollectionStoreError) -> Error {
    match err {
        CollectionStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

fn seeding_error(err: SeedingError) -> Error {
    error!(error = %err, "seeding run failed");
    match err {
        SeedingError::Store(inner) => store_error(inner),
        other => Error::internal(other.to_string()),
    }
}

/// Decode optional seeding options; an empty body means the defaults.
fn parse_seed_options(body: &[u8]) -> Result<SeedOptions, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SeedOptions::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request("Invalid request body")
            .with_details(json!({ "reason": err.to_string() }))
    })
}

/// Replace (or extend) the stored data with a generated dataset.
#[utoipa::path(
    post,
    path = "/api/v1/seeder/seed",
    request_body(content = Option<SeedOptionsSchema>, description = "Optional run options"),
    responses(
        (status = 200, description = "Seeding run summary", body = SeedSummarySchema),
        (status = 400, description = "Invalid options", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Seeding failed", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "seedSampleData"
)]
#[post("/seeder/seed")]
pub async fn seed(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    let options = parse_seed_options(&body)?;
    let summary = state.seeder.seed(&options).await.map_err(seeding_error)?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Relationship, field, and business checks over the stored data.
#[utoipa::path(
    get,
    path = "/api/v1/seeder/validate",
    responses(
        (status = 200, description = "Validation findings", body = ValidationReportSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "validateSampleData"
)]
#[get("/seeder/validate")]
pub async fn validate(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    let report = state.seeder.validate().await;
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/seeder/stats",
    responses(
        (status = 200, description = "Per-collection statistics", body = [CollectionStatsSchema]),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "collectionStats"
)]
#[get("/seeder/stats")]
pub async fn stats(state: web::Data<HttpState>, caller: Authenticated) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    let stats = state.seeder.collection_stats().await.map_err(store_error)?;
    Ok(HttpResponse::Ok().json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/seeder/order",
    responses(
        (status = 200, description = "Processing order", body = SeedingOrderResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Relationship rules are cyclic", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "seedingOrder"
)]
#[get("/seeder/order")]
pub async fn order(state: web::Data<HttpState>, caller: Authenticated) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    let order = state.seeder.stored_order().await.map_err(seeding_error)?;
    Ok(HttpResponse::Ok().json(SeedingOrderResponse {
        order: order.iter().map(ToString::to_string).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/seeder/profiles",
    responses(
        (status = 200, description = "Available profiles", body = ProfilesResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "seedProfiles"
)]
#[get("/seeder/profiles")]
pub async fn profiles(caller: Authenticated) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    Ok(HttpResponse::Ok().json(ProfilesResponse {
        profiles: available_profiles(),
    }))
}

/// Whether deleting a record, or a whole collection, would strand required
/// children.
#[utoipa::path(
    get,
    path = "/api/v1/seeder/can-delete/{collection}",
    params(
        ("collection" = String, Path, description = "Parent collection"),
        CanDeleteQuery
    ),
    responses(
        (status = 200, description = "Deletion check", body = DeletionCheckSchema),
        (status = 400, description = "Invalid collection or record id", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["seeder"],
    operation_id = "canDelete"
)]
#[get("/seeder/can-delete/{collection}")]
pub async fn can_delete(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    query: web::Query<CanDeleteQuery>,
) -> ApiResult<HttpResponse> {
    caller.require(Role::Admin)?;
    let collection = parse_collection_name(&path)?;
    let record_id = query
        .record_id
        .as_deref()
        .map(|raw| parse_document_id(raw, "recordId"))
        .transpose()?;
    let check = state
        .seeder
        .can_delete(&collection, record_id.as_ref())
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Ok().json(check))
}

#[cfg(test)]
#[path = "seeder_tests.rs"]
mod tests;
