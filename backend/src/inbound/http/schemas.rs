//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their JSON shape for the generated document only.

#![expect(
    dead_code,
    reason = "schema wrappers are only read by utoipa during OpenAPI generation"
)]

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error response payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "Menu item with ID 65f1a2b3c4d5e6f708192a3b not found")]
    message: String,
    /// Request correlation id, also sent in the `trace-id` header.
    #[schema(example = "6f1c2d3e-4a5b-4c6d-8e7f-9a0b1c2d3e4f")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// A sellable dish.
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuItem, rename_all = "camelCase")]
pub struct MenuItemSchema {
    #[schema(rename = "_id", example = "65f1a2b3c4d5e6f708192a3b")]
    id: String,
    #[schema(example = "Paneer Butter Masala")]
    name: String,
    description: String,
    #[schema(example = 249.0)]
    price: f64,
    category: Option<String>,
    menu: Option<String>,
    /// User id of the owning partner.
    business_partner: String,
    image_url: Option<String>,
    images: Vec<String>,
    is_available: bool,
    is_vegetarian: bool,
    tags: Vec<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

/// Payload for creating a menu item.
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuItemDraft, rename_all = "camelCase")]
pub struct MenuItemDraftSchema {
    name: String,
    description: Option<String>,
    price: f64,
    category: Option<String>,
    menu: Option<String>,
    /// Defaults to the first gallery image when absent.
    image_url: Option<String>,
    images: Option<Vec<String>>,
    is_available: Option<bool>,
    is_vegetarian: Option<bool>,
    tags: Option<Vec<String>>,
}

/// Partial item update; at least one field must be set.
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuItemPatch, rename_all = "camelCase")]
pub struct MenuItemPatchSchema {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    menu: Option<String>,
    image_url: Option<String>,
    images: Option<Vec<String>>,
    is_available: Option<bool>,
    is_vegetarian: Option<bool>,
    tags: Option<Vec<String>>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::CategorySummary)]
pub struct CategorySummarySchema {
    id: String,
    name: String,
    description: String,
}

/// Item with its category resolved in place of the id.
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuItemDetails, rename_all = "camelCase")]
pub struct MenuItemDetailsSchema {
    #[schema(rename = "_id")]
    id: String,
    name: String,
    description: String,
    price: f64,
    category: Option<CategorySummarySchema>,
    business_partner: String,
    image_url: Option<String>,
    images: Vec<String>,
    is_available: bool,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Category, rename_all = "camelCase")]
pub struct CategorySchema {
    #[schema(rename = "_id")]
    id: String,
    #[schema(example = "North Indian")]
    name: String,
    description: String,
    business_partner: Option<String>,
    is_active: bool,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::CategoryDraft, rename_all = "camelCase")]
pub struct CategoryDraftSchema {
    name: String,
    description: Option<String>,
    is_active: Option<bool>,
}

/// Partial update for a category or a menu.
#[derive(ToSchema)]
#[schema(as = crate::domain::CategoryPatch, rename_all = "camelCase")]
pub struct NamedPatchSchema {
    name: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Menu, rename_all = "camelCase")]
pub struct MenuSchema {
    #[schema(rename = "_id")]
    id: String,
    #[schema(example = "Weekday Lunch")]
    name: String,
    description: String,
    /// Partner id owning the menu.
    restaurant: String,
    is_active: bool,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::MenuDraft, rename_all = "camelCase")]
pub struct MenuDraftSchema {
    name: String,
    description: Option<String>,
    is_active: Option<bool>,
}

/// Menu together with its items.
#[derive(ToSchema)]
#[schema(as = crate::domain::MenuWithItems, rename_all = "camelCase")]
pub struct MenuWithItemsSchema {
    #[schema(rename = "_id")]
    id: String,
    name: String,
    description: String,
    restaurant: String,
    is_active: bool,
    items: Vec<MenuItemSchema>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Deleted)]
pub struct DeletedSchema {
    #[schema(example = true)]
    deleted: bool,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::SeedProfile)]
pub enum SeedProfileSchema {
    #[schema(rename = "minimal")]
    Minimal,
    #[schema(rename = "standard")]
    Standard,
    #[schema(rename = "extensive")]
    Extensive,
}

/// Seeding run options; every field is optional.
#[derive(ToSchema)]
#[schema(as = crate::domain::SeedOptions, rename_all = "camelCase")]
pub struct SeedOptionsSchema {
    profile: Option<SeedProfileSchema>,
    #[schema(example = 2026)]
    seed: Option<u64>,
    /// Add to existing data instead of replacing it.
    incremental: Option<bool>,
    skip_cleanup: Option<bool>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::ValidationReport, rename_all = "camelCase")]
pub struct ValidationReportSchema {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::CollectionSeedMetrics, rename_all = "camelCase")]
pub struct CollectionSeedMetricsSchema {
    #[schema(example = "menuitems")]
    collection: String,
    records: u64,
    duration_ms: u64,
    records_per_second: f64,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::SeedSummary, rename_all = "camelCase")]
pub struct SeedSummarySchema {
    success: bool,
    profile: SeedProfileSchema,
    seed: u64,
    total_records: u64,
    total_duration_ms: u64,
    collections: Vec<CollectionSeedMetricsSchema>,
    /// SHA-256 of the generated dataset, hex encoded.
    dataset_digest: String,
    validation: ValidationReportSchema,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::CollectionStats, rename_all = "camelCase")]
pub struct CollectionStatsSchema {
    collection: String,
    /// `-1` when the collection could not be read.
    count: i64,
    sample_record: Option<serde_json::Value>,
    issues: Vec<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::ProfileInfo, rename_all = "camelCase")]
pub struct ProfileInfoSchema {
    name: String,
    partners: usize,
    customers: usize,
    menus_per_partner: usize,
    items_per_menu: usize,
    orders_per_customer: usize,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::DeletionCheck, rename_all = "camelCase")]
pub struct DeletionCheckSchema {
    can_delete: bool,
    blockers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::PartialSchema;

    use super::*;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises")
    }

    #[rstest]
    fn error_codes_cover_every_domain_code() {
        let json = schema_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn wrappers_use_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json::<ErrorSchema>().contains("traceId"));
        let item = schema_json::<MenuItemSchema>();
        assert!(item.contains("\"_id\""));
        assert!(item.contains("businessPartner"));
        assert!(schema_json::<SeedSummarySchema>().contains("datasetDigest"));
    }
}
