//! Menu container HTTP handlers.
//!
//! ```text
//! GET    /api/v1/menu/restaurant/{restaurantId}/menus   (public)
//! POST   /api/v1/menu/menus                            (partner)
//! GET    /api/v1/menu/menus                            (partner)
//! GET    /api/v1/menu/menus/{id}                       (partner)
//! PATCH  /api/v1/menu/menus/{id}                       (partner)
//! DELETE /api/v1/menu/menus/{id}                       (partner)
//! ```
//!
//! Partner routes resolve the caller's partner profile first and only touch
//! menus that belong to it. Menus owned by someone else answer 404.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::{MenuDraft, MenuPatch, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    DeletedSchema, ErrorSchema, MenuDraftSchema, MenuSchema, MenuWithItemsSchema,
    NamedPatchSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// A restaurant's menus with their available items.
#[utoipa::path(
    get,
    path = "/api/v1/menu/restaurant/{restaurantId}/menus",
    params(("restaurantId" = String, Path, description = "Partner id")),
    security([]),
    responses(
        (status = 200, description = "Menus with available items", body = [MenuWithItemsSchema]),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "listRestaurantMenus"
)]
#[get("/menu/restaurant/{restaurantId}/menus")]
pub async fn restaurant_menus(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let restaurant = parse_document_id(&path, "restaurantId")?;
    let menus = state.menus.restaurant_menus(&restaurant).await?;
    Ok(HttpResponse::Ok().json(menus))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu/menus",
    request_body = MenuDraftSchema,
    responses(
        (status = 201, description = "Menu created", body = MenuSchema),
        (status = 400, description = "Invalid menu", body = ErrorSchema),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Caller has no partner profile", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "createMenu"
)]
#[post("/menu/menus")]
pub async fn create_menu(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<MenuDraft>,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let menu = state
        .menus
        .create_menu_for_partner(partner.user_id(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(menu))
}

/// The caller's menus, each holding only the caller's items.
#[utoipa::path(
    get,
    path = "/api/v1/menu/menus",
    responses(
        (status = 200, description = "Partner menus", body = [MenuWithItemsSchema]),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Caller has no partner profile", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "listMyMenus"
)]
#[get("/menu/menus")]
pub async fn list_my_menus(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let menus = state.menus.partner_menus(partner.user_id()).await?;
    Ok(HttpResponse::Ok().json(menus))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu/menus/{id}",
    params(("id" = String, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu with the caller's items", body = MenuWithItemsSchema),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign menu", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "getMyMenu"
)]
#[get("/menu/menus/{id}")]
pub async fn get_my_menu(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let id = parse_document_id(&path, "id")?;
    let menu = state.menus.partner_menu(partner.user_id(), &id).await?;
    Ok(HttpResponse::Ok().json(menu))
}

#[utoipa::path(
    patch,
    path = "/api/v1/menu/menus/{id}",
    params(("id" = String, Path, description = "Menu id")),
    request_body = NamedPatchSchema,
    responses(
        (status = 200, description = "Updated menu", body = MenuSchema),
        (status = 400, description = "Empty or invalid update", body = ErrorSchema),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign menu", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "updateMyMenu"
)]
#[patch("/menu/menus/{id}")]
pub async fn update_my_menu(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<MenuPatch>,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let id = parse_document_id(&path, "id")?;
    let menu = state
        .menus
        .update_partner_menu(partner.user_id(), &id, &payload)
        .await?;
    Ok(HttpResponse::Ok().json(menu))
}

/// Delete one of the caller's menus once none of the caller's items remain
/// in it.
#[utoipa::path(
    delete,
    path = "/api/v1/menu/menus/{id}",
    params(("id" = String, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu deleted", body = DeletedSchema),
        (status = 400, description = "Menu still holds items", body = ErrorSchema),
        (status = 403, description = "Caller is not a partner", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign menu", body = ErrorSchema)
    ),
    tags = ["menus"],
    operation_id = "deleteMyMenu"
)]
#[delete("/menu/menus/{id}")]
pub async fn delete_my_menu(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let partner = caller.require(Role::Partner)?;
    let id = parse_document_id(&path, "id")?;
    let deleted = state.menus.delete_partner_menu(partner.user_id(), &id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

#[cfg(test)]
mod tests {
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::configure_api;
    use crate::inbound::http::test_utils::{bearer, insert_partner, memory_state};

    const OWNER: &str = "65f1a2b3c4d5e6f708192a3b";
    const OWNER_PARTNER: &str = "65f1a2b3c4d5e6f708192b01";
    const RIVAL: &str = "65f1a2b3c4d5e6f708192a3c";
    const RIVAL_PARTNER: &str = "65f1a2b3c4d5e6f708192b02";

    async fn app()
    -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        let (state, store) = memory_state();
        insert_partner(&store, OWNER_PARTNER, OWNER).await;
        insert_partner(&store, RIVAL_PARTNER, RIVAL).await;
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_api),
        )
        .await
    }

    async fn create_menu_as<S>(app: &S, user: &str) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let created: Value = test::call_and_read_body_json(
            app,
            test::TestRequest::post()
                .uri("/menu/menus")
                .insert_header(bearer(user, Role::Partner))
                .set_json(json!({ "name": "Weekday Lunch" }))
                .to_request(),
        )
        .await;
        created["_id"].as_str().expect("generated id").to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn menus_are_created_under_the_partner_profile() {
        let app = app().await;
        let id = create_menu_as(&app, OWNER).await;

        let menus: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/menu/restaurant/{OWNER_PARTNER}/menus"))
                .to_request(),
        )
        .await;

        assert_eq!(menus[0]["_id"], id.as_str());
        assert_eq!(menus[0]["restaurant"], OWNER_PARTNER);
        assert_eq!(menus[0]["items"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn foreign_menus_are_hidden() {
        let app = app().await;
        let id = create_menu_as(&app, OWNER).await;

        for request in [
            test::TestRequest::get().uri(&format!("/menu/menus/{id}")),
            test::TestRequest::delete().uri(&format!("/menu/menus/{id}")),
        ] {
            let response = test::call_service(
                &app,
                request.insert_header(bearer(RIVAL, Role::Partner)).to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn menus_holding_items_cannot_be_deleted() {
        let app = app().await;
        let id = create_menu_as(&app, OWNER).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/menu")
                .insert_header(bearer(OWNER, Role::Partner))
                .set_json(json!({ "name": "Rajma Chawal", "price": 150.0, "menu": id }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/menu/menus/{id}"))
                .insert_header(bearer(OWNER, Role::Partner))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["itemCount"], 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn partners_without_a_profile_are_not_found() {
        let app = app().await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/menu/menus")
                .insert_header(bearer("65f1a2b3c4d5e6f708192a3d", Role::Partner))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Partner profile not found");
    }
}
