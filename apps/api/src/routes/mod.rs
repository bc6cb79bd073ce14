pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Shops
        .route(
            "/api/shops/save",
            get(crate::shops::handlers::handle_get_shops)
                .post(crate::shops::handlers::handle_save_shop),
        )
        .route(
            "/api/shops/publish",
            post(crate::shops::publish::handle_publish)
                .delete(crate::shops::publish::handle_unpublish),
        )
        .route(
            "/api/shops/versions",
            get(crate::shops::handlers::handle_list_versions)
                .post(crate::shops::handlers::handle_create_version)
                .put(crate::shops::handlers::handle_restore_version),
        )
        // Pages
        .route(
            "/api/pages",
            get(crate::pages::handlers::handle_list_pages)
                .post(crate::pages::handlers::handle_create_pages),
        )
        .route(
            "/api/pages/:id",
            get(crate::pages::handlers::handle_get_page)
                .put(crate::pages::handlers::handle_update_page)
                .delete(crate::pages::handlers::handle_delete_page),
        )
        // Generation
        .route(
            "/api/products/generate",
            get(crate::products::handlers::handle_generation_status)
                .post(crate::products::handlers::handle_generate_products),
        )
        .route(
            "/api/sections/generate",
            get(crate::sections::handlers::handle_layout_status)
                .post(crate::sections::handlers::handle_generate_layout),
        )
        // Shopify
        .route(
            "/api/shopify/connect",
            get(crate::shopify::handlers::handle_connection_status)
                .post(crate::shopify::handlers::handle_connect)
                .delete(crate::shopify::handlers::handle_disconnect),
        )
        .route(
            "/api/shopify/sync",
            get(crate::shopify::handlers::handle_sync_status)
                .post(crate::shopify::handlers::handle_sync),
        )
        // Images
        .route(
            "/api/images/generate",
            get(crate::images::handlers::handle_image_styles)
                .post(crate::images::handlers::handle_generate_images)
                .put(crate::images::handlers::handle_enhance_image),
        )
        .route(
            "/api/ai/generate-image",
            post(crate::images::handlers::handle_ai_generate_image),
        )
        // Email
        .route(
            "/api/auth/send-welcome-email",
            post(crate::email::handlers::handle_send_welcome_email),
        )
        .with_state(state)
}
