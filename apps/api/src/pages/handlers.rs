//! Axum route handlers for page management.
//!
//! The home-page invariant lives here: setting `is_home = true` on a page
//! clears the flag on its siblings inside one transaction, and the home page
//! refuses deletion.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::page::PageRow;
use crate::pages::defaults::{default_pages, ProductData, DEFAULT_BRAND_COLOR};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ShopIdQuery {
    #[serde(rename = "shopId")]
    pub shop_id: Option<Uuid>,
}

/// POST body: either `createDefaults` with product data, or a single custom
/// page. Page fields mirror the column names; envelope fields are camelCase.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    #[serde(rename = "shopId")]
    pub shop_id: Option<Uuid>,
    #[serde(rename = "createDefaults", default)]
    pub create_defaults: bool,
    #[serde(rename = "productData")]
    pub product_data: Option<ProductData>,
    #[serde(rename = "brandColor")]
    pub brand_color: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub is_home: bool,
    pub sections: Option<Value>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Sparse patch: only supplied fields are written.
#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sections: Option<Value>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
    pub is_home: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub success: bool,
    pub page: PageRow,
}

// ────────────────────────────────────────────────────────────────────────────
// Collection handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/pages?shopId=
pub async fn handle_list_pages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    let pages = sqlx::query_as::<_, PageRow>(
        "SELECT * FROM pages WHERE shop_id = $1 AND user_id = $2 ORDER BY created_at ASC",
    )
    .bind(shop_id)
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({ "success": true, "pages": pages })))
}

/// POST /api/pages
///
/// With `createDefaults` this bulk-creates the four starter pages (refusing
/// if any page already exists for the shop); otherwise it creates one custom
/// page. New pages are always unpublished.
pub async fn handle_create_pages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreatePageRequest>,
) -> Result<Json<Value>, AppError> {
    let shop_id = request
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    if request.create_defaults {
        let product_data = request.product_data.ok_or_else(|| {
            AppError::Validation("productData is required to create default pages".to_string())
        })?;

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM pages WHERE shop_id = $1 AND user_id = $2 LIMIT 1")
                .bind(shop_id)
                .bind(user_id)
                .fetch_optional(&state.db)
                .await?;

        if existing.is_some() {
            return Err(AppError::Validation(
                "Pages already exist for this shop".to_string(),
            ));
        }

        let brand_color = request
            .brand_color
            .unwrap_or_else(|| DEFAULT_BRAND_COLOR.to_string());
        let defaults = default_pages(&product_data, &brand_color);

        let mut pages = Vec::with_capacity(defaults.len());
        for page in &defaults {
            let row = sqlx::query_as::<_, PageRow>(
                r#"
                INSERT INTO pages
                    (shop_id, user_id, name, slug, is_home, sections,
                     meta_title, meta_description, is_published)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
                RETURNING *
                "#,
            )
            .bind(shop_id)
            .bind(user_id)
            .bind(&page.name)
            .bind(&page.slug)
            .bind(page.is_home)
            .bind(&page.sections)
            .bind(&page.meta_title)
            .bind(&page.meta_description)
            .fetch_one(&state.db)
            .await?;
            pages.push(row);
        }

        info!("Created {} default pages for shop {shop_id}", pages.len());

        return Ok(Json(json!({
            "success": true,
            "count": pages.len(),
            "pages": pages,
        })));
    }

    // Custom page
    let name = request
        .name
        .ok_or_else(|| AppError::Validation("name and slug are required".to_string()))?;
    let slug = request
        .slug
        .ok_or_else(|| AppError::Validation("name and slug are required".to_string()))?;

    let page = sqlx::query_as::<_, PageRow>(
        r#"
        INSERT INTO pages
            (shop_id, user_id, name, slug, is_home, sections,
             meta_title, meta_description, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
        RETURNING *
        "#,
    )
    .bind(shop_id)
    .bind(user_id)
    .bind(&name)
    .bind(&slug)
    .bind(request.is_home)
    .bind(request.sections.unwrap_or_else(|| json!([])))
    .bind(request.meta_title.unwrap_or_else(|| name.clone()))
    .bind(request.meta_description.unwrap_or_default())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({ "success": true, "page": page })))
}

// ────────────────────────────────────────────────────────────────────────────
// Single-page handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/pages/:id
pub async fn handle_get_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
) -> Result<Json<PageResponse>, AppError> {
    let page = fetch_page(&state, page_id, user_id).await?;
    Ok(Json(PageResponse {
        success: true,
        page,
    }))
}

/// PUT /api/pages/:id
///
/// Applies a sparse patch. `is_home = true` first clears the flag on every
/// sibling page of the same shop, in the same transaction as the write.
pub async fn handle_update_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
    Json(patch): Json<UpdatePageRequest>,
) -> Result<Json<PageResponse>, AppError> {
    let current = fetch_page(&state, page_id, user_id).await?;

    let mut tx = state.db.begin().await?;

    if patch.is_home == Some(true) {
        sqlx::query("UPDATE pages SET is_home = FALSE WHERE shop_id = $1 AND user_id = $2")
            .bind(current.shop_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    let page = sqlx::query_as::<_, PageRow>(
        r#"
        UPDATE pages
        SET name = $1, slug = $2, sections = $3, meta_title = $4,
            meta_description = $5, is_published = $6, is_home = $7, updated_at = now()
        WHERE id = $8 AND user_id = $9
        RETURNING *
        "#,
    )
    .bind(patch.name.unwrap_or(current.name))
    .bind(patch.slug.unwrap_or(current.slug))
    .bind(patch.sections.unwrap_or(current.sections))
    .bind(patch.meta_title.unwrap_or(current.meta_title))
    .bind(patch.meta_description.unwrap_or(current.meta_description))
    .bind(patch.is_published.unwrap_or(current.is_published))
    .bind(patch.is_home.unwrap_or(current.is_home))
    .bind(page_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(PageResponse {
        success: true,
        page,
    }))
}

/// DELETE /api/pages/:id
///
/// The home page cannot be deleted.
pub async fn handle_delete_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let page = fetch_page(&state, page_id, user_id).await?;

    if page.is_home {
        return Err(AppError::Validation(
            "Cannot delete the home page".to_string(),
        ));
    }

    sqlx::query("DELETE FROM pages WHERE id = $1 AND user_id = $2")
        .bind(page_id)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    info!("Deleted page {page_id} ({})", page.name);

    Ok(Json(json!({ "success": true })))
}

async fn fetch_page(state: &AppState, page_id: Uuid, user_id: Uuid) -> Result<PageRow, AppError> {
    sqlx::query_as::<_, PageRow>("SELECT * FROM pages WHERE id = $1 AND user_id = $2")
        .bind(page_id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Page {page_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_defaults_payload() {
        let json = serde_json::json!({
            "shopId": Uuid::new_v4(),
            "createDefaults": true,
            "productData": {
                "name": "Solar Lantern",
                "description": "desc",
                "price": 24.99,
                "currency": "USD"
            },
            "brandColor": "#ea580c"
        });
        let request: CreatePageRequest = serde_json::from_value(json).unwrap();
        assert!(request.create_defaults);
        assert!(request.product_data.is_some());
        assert!(request.name.is_none());
    }

    #[test]
    fn test_create_request_accepts_custom_page_payload() {
        let json = serde_json::json!({
            "shopId": Uuid::new_v4(),
            "name": "FAQ",
            "slug": "faq",
            "meta_title": "Frequently asked questions"
        });
        let request: CreatePageRequest = serde_json::from_value(json).unwrap();
        assert!(!request.create_defaults);
        assert_eq!(request.name.as_deref(), Some("FAQ"));
        assert!(!request.is_home);
    }

    #[test]
    fn test_update_request_is_fully_sparse() {
        let patch: UpdatePageRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(patch.name.is_none());
        assert!(patch.is_home.is_none());
        assert!(patch.is_published.is_none());
    }
}
