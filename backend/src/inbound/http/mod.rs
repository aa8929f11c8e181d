//! HTTP inbound adapter exposing the catalogue and seeder REST endpoints.

pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod menu;
pub mod menu_containers;
pub mod schemas;
pub mod seeder;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// Fixed `/menu/...` segments are registered ahead of the `/menu/{id}` item
/// routes so they are not captured as item ids.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_payload_error))
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::get_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(menu::partner_items)
        .service(menu::item_details)
        .service(menu_containers::restaurant_menus)
        .service(menu_containers::create_menu)
        .service(menu_containers::list_my_menus)
        .service(menu_containers::get_my_menu)
        .service(menu_containers::update_my_menu)
        .service(menu_containers::delete_my_menu)
        .service(menu::list_items)
        .service(menu::create_item)
        .service(menu::get_item)
        .service(menu::update_item)
        .service(menu::delete_item)
        .service(seeder::seed)
        .service(seeder::validate)
        .service(seeder::stats)
        .service(seeder::order)
        .service(seeder::profiles)
        .service(seeder::can_delete);
}
