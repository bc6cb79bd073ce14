//! Axum route handlers for Shopify connect and product sync.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::product::{GeneratedProduct, GeneratedProductRow};
use crate::shopify::products::create_products_batch;
use crate::shopify::ShopifyCredentials;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShopIdQuery {
    #[serde(rename = "shopId")]
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub shop_domain: Option<String>,
    pub access_token: Option<String>,
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub products: Vec<GeneratedProduct>,
    pub shopify_credentials: Option<ShopifyCredentials>,
    pub shop_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Connect
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/shopify/connect
///
/// Verifies the credentials against the Admin API, then stores them: the
/// user's connection row is upserted, and the shop row is stamped when
/// `shopId` is given. Invalid credentials come back as 400, not 500.
pub async fn handle_connect(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ConnectRequest>,
) -> Result<Response, AppError> {
    let (shop_domain, access_token) = match (request.shop_domain, request.access_token) {
        (Some(d), Some(t)) if !d.is_empty() && !t.is_empty() => (d, t),
        _ => {
            return Err(AppError::Validation(
                "Shop domain and access token are required".to_string(),
            ))
        }
    };

    info!("Verifying Shopify credentials for: {shop_domain}");

    let credentials = ShopifyCredentials {
        shop_domain: shop_domain.clone(),
        access_token: access_token.clone(),
    };

    let shop = match state.shopify.verify_credentials(&credentials).await {
        Ok(shop) => shop,
        // Rejected credentials are the caller's problem; transport failures are ours.
        Err(e @ crate::shopify::ShopifyError::Api { .. }) => {
            warn!("Shopify verification failed for {shop_domain}: {e}");
            let body = json!({ "success": false, "error": e.to_string() });
            return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
        }
        Err(e) => return Err(AppError::Shopify(e.to_string())),
    };

    let verified_domain = shop.domain.clone().unwrap_or_else(|| shop_domain.clone());
    info!("Credentials valid for: {} ({verified_domain})", shop.name);

    sqlx::query(
        r#"
        INSERT INTO shopify_connections (user_id, shop_domain, access_token, shop_name, status)
        VALUES ($1, $2, $3, $4, 'connected')
        ON CONFLICT (user_id) DO UPDATE
        SET shop_domain = EXCLUDED.shop_domain,
            access_token = EXCLUDED.access_token,
            shop_name = EXCLUDED.shop_name,
            status = 'connected',
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&shop_domain)
    .bind(&access_token)
    .bind(&shop.name)
    .execute(&state.db)
    .await?;

    if let Some(shop_id) = request.shop_id {
        let done = sqlx::query(
            r#"
            UPDATE shops
            SET shopify_domain = $1, shopify_access_token = $2,
                shopify_shop_name = $3, updated_at = now()
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(&shop_domain)
        .bind(&access_token)
        .bind(&shop.name)
        .bind(shop_id)
        .bind(user_id)
        .execute(&state.db)
        .await?;

        if done.rows_affected() == 0 {
            return Err(AppError::NotFound("Shop not found".to_string()));
        }
    }

    let body = json!({
        "success": true,
        "shopName": shop.name,
        "shopDomain": shop_domain,
    });
    Ok(Json(body).into_response())
}

/// DELETE /api/shopify/connect?shopId=
///
/// Clears the shop's Shopify fields and removes the user's connection row.
pub async fn handle_disconnect(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    sqlx::query(
        r#"
        UPDATE shops
        SET shopify_domain = NULL, shopify_access_token = NULL,
            shopify_shop_name = NULL, updated_at = now()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(shop_id)
    .bind(user_id)
    .execute(&state.db)
    .await?;

    sqlx::query("DELETE FROM shopify_connections WHERE user_id = $1")
        .bind(user_id)
        .execute(&state.db)
        .await?;

    info!("Disconnected Shopify for shop: {shop_id}");

    Ok(Json(json!({ "success": true })))
}

/// GET /api/shopify/connect?shopId=
pub async fn handle_connection_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    let row: Option<(Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT shopify_domain, shopify_shop_name FROM shops WHERE id = $1 AND user_id = $2",
    )
    .bind(shop_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    let (domain, name) = row.ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;
    let connected = domain.is_some() && name.is_some();

    Ok(Json(json!({
        "success": true,
        "connected": connected,
        "shopDomain": domain,
        "shopName": name,
    })))
}

// ────────────────────────────────────────────────────────────────────────────
// Sync
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/shopify/sync
///
/// Pushes the given generated products to Shopify sequentially, then writes
/// the returned remote ids back onto the matching rows one at a time.
pub async fn handle_sync(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Value>, AppError> {
    if request.products.is_empty() {
        return Err(AppError::Validation(
            "A list of products is required".to_string(),
        ));
    }
    let credentials = request
        .shopify_credentials
        .filter(|c| !c.shop_domain.is_empty() && !c.access_token.is_empty())
        .ok_or_else(|| AppError::Validation("Shopify credentials are required".to_string()))?;

    let total = request.products.len();
    info!("Syncing {total} products to Shopify...");

    let outcome = create_products_batch(
        state.shopify.as_ref(),
        &credentials,
        &request.products,
        |current, total| info!("Sync progress: {current}/{total}"),
    )
    .await;

    info!(
        "Sync finished: {} created, {} failed",
        outcome.created, outcome.failed
    );

    if outcome.success {
        // Write remote ids back, one product at a time.
        for (product, result) in request.products.iter().zip(&outcome.results) {
            if let Some(remote_id) = result.product_id {
                sqlx::query(
                    r#"
                    UPDATE generated_products
                    SET shopify_product_id = $1, synced_at = now()
                    WHERE product_id = $2 AND user_id = $3
                    "#,
                )
                .bind(remote_id.to_string())
                .bind(&product.id)
                .bind(user_id)
                .execute(&state.db)
                .await?;
            }
        }

        if let Some(shop_id) = request.shop_id {
            sqlx::query(
                r#"
                UPDATE shops
                SET shopify_domain = $1, shopify_access_token = $2, updated_at = now()
                WHERE id = $3 AND user_id = $4
                "#,
            )
            .bind(&credentials.shop_domain)
            .bind(&credentials.access_token)
            .bind(shop_id)
            .bind(user_id)
            .execute(&state.db)
            .await?;
        }
    }

    Ok(Json(json!({
        "success": outcome.success,
        "created": outcome.created,
        "failed": outcome.failed,
        "total": total,
        "results": outcome.results,
    })))
}

/// GET /api/shopify/sync?shopId=
///
/// Sync statistics over the shop's generated products.
pub async fn handle_sync_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    let products = sqlx::query_as::<_, GeneratedProductRow>(
        "SELECT * FROM generated_products WHERE shop_id = $1 AND user_id = $2",
    )
    .bind(shop_id)
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    let synced = products
        .iter()
        .filter(|p| p.shopify_product_id.is_some())
        .count();
    let last_sync = products.iter().filter_map(|p| p.synced_at).max();

    Ok(Json(json!({
        "success": true,
        "stats": {
            "total": products.len(),
            "synced": synced,
            "pending": products.len() - synced,
            "lastSync": last_sync,
        },
        "products": products,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_request_deserializes() {
        let json = serde_json::json!({
            "shopDomain": "mystore.myshopify.com",
            "accessToken": "shpat_abc",
        });
        let request: ConnectRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.shop_domain.as_deref(), Some("mystore.myshopify.com"));
        assert!(request.shop_id.is_none());
    }

    #[test]
    fn test_sync_request_defaults_to_empty_products() {
        let request: SyncRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.products.is_empty());
        assert!(request.shopify_credentials.is_none());
    }
}
