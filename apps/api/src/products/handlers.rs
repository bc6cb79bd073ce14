//! Axum route handlers for product generation.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::product::{GeneratedProduct, ScrapedProduct};
use crate::products::generator::{generate_products, GenerationOptions};
use crate::shops::shop_owned_by;
use crate::state::AppState;

fn default_count() -> usize {
    20
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductsRequest {
    pub base_product: Option<ScrapedProduct>,
    pub shop_id: Option<Uuid>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

#[derive(Debug, Deserialize)]
pub struct ShopIdQuery {
    #[serde(rename = "shopId")]
    pub shop_id: Option<Uuid>,
}

/// POST /api/products/generate
///
/// Generates `count` variants of the base product. When `shopId` resolves to
/// an owned shop the variants are also persisted as draft rows; persistence
/// failure is logged and does not fail the response.
pub async fn handle_generate_products(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GenerateProductsRequest>,
) -> Result<Json<Value>, AppError> {
    let base = request
        .base_product
        .ok_or_else(|| AppError::Validation("Base product is required".to_string()))?;

    // Resolve the shop up front so a bad id fails before any LLM spend.
    let shop_id = match request.shop_id {
        Some(shop_id) => {
            shop_owned_by(&state.db, shop_id, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;
            Some(shop_id)
        }
        None => None,
    };

    info!("Generating {} products for user {user_id}", request.count);

    let options = request.options.unwrap_or_default();
    let products = generate_products(state.llm.as_ref(), &base, request.count, &options).await;

    let mut saved = false;
    if let Some(shop_id) = shop_id {
        match persist_generated(&state.db, user_id, shop_id, &base, &products).await {
            Ok(()) => saved = true,
            Err(e) => warn!("Failed to persist generated products: {e}"),
        }
    }

    Ok(Json(json!({
        "success": true,
        "count": products.len(),
        "products": products,
        "saved": saved,
    })))
}

/// GET /api/products/generate?shopId=
///
/// Readiness probe for the generation service.
pub async fn handle_generation_status(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "status": "ready",
    })))
}

/// Writes generated products as draft rows. Best-effort: the caller logs and
/// continues on failure.
async fn persist_generated(
    pool: &PgPool,
    user_id: Uuid,
    shop_id: Uuid,
    base: &ScrapedProduct,
    products: &[GeneratedProduct],
) -> Result<(), sqlx::Error> {
    for product in products {
        let (variant_type, variant_value) = match &product.variant {
            Some(v) => (Some(v.kind.as_str()), Some(v.value.as_str())),
            None => (None, None),
        };
        let metadata = json!({
            "generatedAt": product.source.generated_at,
            "originalProductId": product.source.original_product_id,
        });

        sqlx::query(
            r#"
            INSERT INTO generated_products
                (shop_id, user_id, base_product_id, base_product_platform, product_id,
                 name, description, price, currency, images, thumbnail, category, tags,
                 variant_type, variant_value, features, specifications,
                 generation_strategy, generation_metadata, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, '{}'::jsonb, $17, $18, 'draft')
            "#,
        )
        .bind(shop_id)
        .bind(user_id)
        .bind(&base.source.product_id)
        .bind(&base.source.platform)
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.currency)
        .bind(&product.images)
        .bind(product.images.first())
        .bind(&product.category)
        .bind(&product.tags)
        .bind(variant_type)
        .bind(variant_value)
        .bind(&product.features)
        .bind(variant_type.unwrap_or("standard"))
        .bind(&metadata)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults_count_to_twenty() {
        let json = serde_json::json!({
            "baseProduct": {
                "name": "Solar Lantern",
                "description": "desc",
                "price": 20.0,
                "currency": "USD",
                "source": { "platform": "aliexpress", "productId": "123" }
            }
        });
        let request: GenerateProductsRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.count, 20);
        assert!(request.shop_id.is_none());
        assert!(request.options.is_none());
    }

    #[test]
    fn test_generate_request_missing_base_product_is_none() {
        let request: GenerateProductsRequest =
            serde_json::from_value(serde_json::json!({ "count": 5 })).unwrap();
        assert!(request.base_product.is_none());
        assert_eq!(request.count, 5);
    }
}
