//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the catalogue, seeder, and health endpoints together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. The document backs Swagger UI in debug
//! builds and is exported by the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{
    CategoryDraftSchema, CategorySchema, CategorySummarySchema, CollectionSeedMetricsSchema,
    CollectionStatsSchema, DeletedSchema, DeletionCheckSchema, ErrorCodeSchema, ErrorSchema,
    MenuDraftSchema, MenuItemDetailsSchema, MenuItemDraftSchema, MenuItemPatchSchema,
    MenuItemSchema, MenuSchema, MenuWithItemsSchema, NamedPatchSchema, ProfileInfoSchema,
    SeedOptionsSchema, SeedProfileSchema, SeedSummarySchema, ValidationReportSchema,
};
use crate::inbound::http::seeder::{ProfilesResponse, SeedingOrderResponse};

/// Name of the bearer token security scheme.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "HS256 token carrying `sub`, `role`, and `exp` claims.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tiffin backend API",
        description = "Menu catalogue for home-kitchen partners with sample data tooling.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::menu::list_items,
        crate::inbound::http::menu::create_item,
        crate::inbound::http::menu::partner_items,
        crate::inbound::http::menu::item_details,
        crate::inbound::http::menu::get_item,
        crate::inbound::http::menu::update_item,
        crate::inbound::http::menu::delete_item,
        crate::inbound::http::menu_containers::restaurant_menus,
        crate::inbound::http::menu_containers::create_menu,
        crate::inbound::http::menu_containers::list_my_menus,
        crate::inbound::http::menu_containers::get_my_menu,
        crate::inbound::http::menu_containers::update_my_menu,
        crate::inbound::http::menu_containers::delete_my_menu,
        crate::inbound::http::seeder::seed,
        crate::inbound::http::seeder::validate,
        crate::inbound::http::seeder::stats,
        crate::inbound::http::seeder::order,
        crate::inbound::http::seeder::profiles,
        crate::inbound::http::seeder::can_delete,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MenuItemSchema,
        MenuItemDraftSchema,
        MenuItemPatchSchema,
        MenuItemDetailsSchema,
        CategorySchema,
        CategorySummarySchema,
        CategoryDraftSchema,
        NamedPatchSchema,
        MenuSchema,
        MenuDraftSchema,
        MenuWithItemsSchema,
        DeletedSchema,
        SeedProfileSchema,
        SeedOptionsSchema,
        SeedSummarySchema,
        CollectionSeedMetricsSchema,
        ValidationReportSchema,
        CollectionStatsSchema,
        ProfileInfoSchema,
        DeletionCheckSchema,
        SeedingOrderResponse,
        ProfilesResponse,
    )),
    tags(
        (name = "menu", description = "Menu items"),
        (name = "categories", description = "Item categories"),
        (name = "menus", description = "Menu containers owned by partners"),
        (name = "seeder", description = "Operator tools for sample data"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
