//! Menu item HTTP handlers.
//!
//! ```text
//! GET    /api/v1/menu
//! POST   /api/v1/menu                    (partner)
//! GET    /api/v1/menu/partner/{partnerId}
//! GET    /api/v1/menu/item/{itemId}      (public)
//! GET    /api/v1/menu/{id}
//! PATCH  /api/v1/menu/{id}
//! DELETE /api/v1/menu/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::{MenuItemDraft, MenuItemPatch, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    DeletedSchema, ErrorSchema, MenuItemDetailsSchema, MenuItemDraftSchema, MenuItemPatchSchema,
    MenuItemSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

#[utoipa::path(
    get,
    path = "/api/v1/menu",
    responses(
        (status = 200, description = "Every menu item", body = [MenuItemSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "listMenuItems"
)]
#[get("/menu")]
pub async fn list_items(
    state: web::Data<HttpState>,
    _caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let items = state.menus.find_all_items().await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Create an item owned by the calling partner.
#[utoipa::path(
    post,
    path = "/api/v1/menu",
    request_body = MenuItemDraftSchema,
    responses(
        (status = 201, description = "Item created", body = MenuItemSchema),
        (status = 400, description = "Invalid item", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Caller has no partner profile", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "createMenuItem"
)]
#[post("/menu")]
pub async fn create_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<MenuItemDraft>,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let item = state
        .menus
        .create_item_for_partner(partner.user_id(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// Items owned by a partner user, served from the listing cache when warm.
///
/// Store failures yield an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/v1/menu/partner/{partnerId}",
    params(("partnerId" = String, Path, description = "User id of the partner")),
    responses(
        (status = 200, description = "Partner items", body = [MenuItemSchema]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "listPartnerMenuItems"
)]
#[get("/menu/partner/{partnerId}")]
pub async fn partner_items(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let partner = parse_document_id(&path, "partnerId")?;
    let items = state.menus.find_items_by_partner(&partner).await;
    Ok(HttpResponse::Ok().json(items))
}

/// Public item view with the category resolved.
#[utoipa::path(
    get,
    path = "/api/v1/menu/item/{itemId}",
    params(("itemId" = String, Path, description = "Menu item id")),
    security([]),
    responses(
        (status = 200, description = "Item details", body = MenuItemDetailsSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "getMenuItemDetails"
)]
#[get("/menu/item/{itemId}")]
pub async fn item_details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "itemId")?;
    let details = state.menus.item_details(&id).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "getMenuItem"
)]
#[get("/menu/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let item = state.menus.find_item(&id).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    patch,
    path = "/api/v1/menu/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    request_body = MenuItemPatchSchema,
    responses(
        (status = 200, description = "Updated item", body = MenuItemSchema),
        (status = 400, description = "Empty or invalid update", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "updateMenuItem"
)]
#[patch("/menu/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<MenuItemPatch>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let item = state.menus.update_item(&id, &payload).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Item deleted", body = DeletedSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "deleteMenuItem"
)]
#[delete("/menu/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let deleted = state.menus.delete_item(&id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}
