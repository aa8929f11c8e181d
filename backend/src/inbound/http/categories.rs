//! Category HTTP handlers.
//!
//! ```text
//! GET    /api/v1/menu/categories
//! POST   /api/v1/menu/categories
//! GET    /api/v1/menu/categories/{id}
//! PATCH  /api/v1/menu/categories/{id}
//! DELETE /api/v1/menu/categories/{id}
//! ```
//!
//! Every route needs a bearer token; no particular role is required.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::{CategoryDraft, CategoryPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    CategoryDraftSchema, CategorySchema, DeletedSchema, ErrorSchema, NamedPatchSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

#[utoipa::path(
    get,
    path = "/api/v1/menu/categories",
    responses(
        (status = 200, description = "All categories", body = [CategorySchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/menu/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    _caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let categories = state.menus.find_all_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu/categories",
    request_body = CategoryDraftSchema,
    responses(
        (status = 201, description = "Category created", body = CategorySchema),
        (status = 400, description = "Invalid category", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/menu/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    payload: web::Json<CategoryDraft>,
) -> ApiResult<HttpResponse> {
    let category = state.menus.create_category(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategorySchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/menu/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let category = state.menus.find_category(&id).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[utoipa::path(
    patch,
    path = "/api/v1/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = NamedPatchSchema,
    responses(
        (status = 200, description = "Updated category", body = CategorySchema),
        (status = 400, description = "Empty or invalid update", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[patch("/menu/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<CategoryPatch>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let category = state.menus.update_category(&id, &payload).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = DeletedSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/menu/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path, "id")?;
    let deleted = state.menus.delete_category(&id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::configure_api;
    use crate::inbound::http::test_utils::{bearer, memory_state};

    const USER: &str = "65f1a2b3c4d5e6f708192a3b";

    #[rstest]
    #[actix_web::test]
    async fn categories_round_trip_through_the_api() {
        let (state, _store) = memory_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_api),
        )
        .await;

        let created: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/menu/categories")
                .insert_header(bearer(USER, Role::Customer))
                .set_json(json!({ "name": "Desserts" }))
                .to_request(),
        )
        .await;
        assert_eq!(created["name"], "Desserts");
        assert_eq!(created["isActive"], true);
        let id = created["_id"].as_str().expect("generated id").to_owned();

        let updated: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/menu/categories/{id}"))
                .insert_header(bearer(USER, Role::Customer))
                .set_json(json!({ "description": "Sweet things" }))
                .to_request(),
        )
        .await;
        assert_eq!(updated["description"], "Sweet things");

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/menu/categories/{id}"))
                .insert_header(bearer(USER, Role::Customer))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/menu/categories/{id}"))
                .insert_header(bearer(USER, Role::Customer))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_requires_a_token() {
        let (state, _store) = memory_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_api),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/menu/categories").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_names_are_rejected() {
        let (state, _store) = memory_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_api),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/menu/categories")
                .insert_header(bearer(USER, Role::Partner))
                .set_json(json!({ "name": "   " }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
