//! Publish / unpublish a shop.
//!
//! Publishing assigns the public URL and flips the status. It does not push
//! anything to Shopify; product sync is a separate operation. The state
//! machine is draft → published → draft, nothing in between.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::shop::ShopRow;
use crate::shops::handlers::ShopIdQuery;
use crate::shops::shop_owned_by;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    pub shop: ShopRow,
    pub shop_url: String,
}

#[derive(Debug, Serialize)]
pub struct UnpublishResponse {
    pub success: bool,
    pub shop: ShopRow,
}

/// POST /api/shops/publish
///
/// Requires a connected Shopify account for the user; assigns the shop's
/// public slug and URL and stamps `published_at`.
pub async fn handle_publish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let shop_id = request
        .shop_id
        .ok_or_else(|| AppError::Validation("Shop ID is required".to_string()))?;

    let shop = shop_owned_by(&state.db, shop_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    let connected: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM shopify_connections WHERE user_id = $1 AND status = 'connected'",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    if connected.is_none() {
        return Err(AppError::Validation(
            "Shopify connection required. Connect your Shopify store first.".to_string(),
        ));
    }

    let slug = shop
        .name
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("shop-{}", shop.id));
    let shop_url = format!("https://{}.{}", slug, state.config.publish_domain);

    let shop = sqlx::query_as::<_, ShopRow>(
        r#"
        UPDATE shops
        SET status = 'published', shop_url = $1, shop_slug = $2,
            published_at = now(), updated_at = now()
        WHERE id = $3 AND user_id = $4
        RETURNING *
        "#,
    )
    .bind(&shop_url)
    .bind(&slug)
    .bind(shop_id)
    .bind(user_id)
    .fetch_one(&state.db)
    .await?;

    info!("Published shop {} at {shop_url}", shop.id);

    Ok(Json(PublishResponse {
        success: true,
        shop,
        shop_url,
    }))
}

/// DELETE /api/shops/publish?shopId=
pub async fn handle_unpublish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<UnpublishResponse>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("Shop ID is required".to_string()))?;

    let shop = sqlx::query_as::<_, ShopRow>(
        r#"
        UPDATE shops
        SET status = 'draft', updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(shop_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    info!("Unpublished shop {}", shop.id);

    Ok(Json(UnpublishResponse {
        success: true,
        shop,
    }))
}

/// Derives the public slug from a shop name: lower-cased, runs of
/// non-alphanumerics collapsed to single hyphens, no edge hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
