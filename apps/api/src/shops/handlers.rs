//! Axum route handlers for shop save/load and version management.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::shop::{ShopRow, ShopVersionRow};
use crate::shops::shop_owned_by;
use crate::shops::versioning::{create_version, list_versions, restore_version};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveShopRequest {
    pub shop_id: Option<Uuid>,
    pub shop_config: Option<Value>,
    pub product_data: Option<Value>,
    pub sections: Option<Value>,
    pub version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SaveShopResponse {
    pub success: bool,
    pub shop: ShopRow,
}

#[derive(Debug, Deserialize)]
pub struct ShopIdQuery {
    #[serde(rename = "shopId")]
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    pub shop_id: Option<Uuid>,
    pub snapshot: Option<Value>,
    pub label: Option<String>,
    #[serde(default)]
    pub is_auto_save: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateVersionResponse {
    pub success: bool,
    pub version: ShopVersionRow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreVersionRequest {
    pub shop_id: Option<Uuid>,
    pub version_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Save / load
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/shops/save
///
/// Without `shopId` this creates a new draft shop at version 1; with it, the
/// owned row is overwritten. Last write wins unless strict versioning is on.
pub async fn handle_save_shop(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<SaveShopRequest>,
) -> Result<Json<SaveShopResponse>, AppError> {
    let config = request
        .shop_config
        .ok_or_else(|| AppError::Validation("Shop configuration is required".to_string()))?;
    let product_data = request.product_data.unwrap_or_else(|| json!({}));
    let sections = request.sections.unwrap_or_else(|| json!([]));
    let version = request.version.unwrap_or(1);

    let shop = match request.shop_id {
        Some(shop_id) => {
            update_shop(
                &state, user_id, shop_id, &config, &product_data, &sections, version,
            )
            .await?
        }
        None => {
            sqlx::query_as::<_, ShopRow>(
                r#"
                INSERT INTO shops (user_id, config, product_data, sections, version, status)
                VALUES ($1, $2, $3, $4, 1, 'draft')
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&config)
            .bind(&product_data)
            .bind(&sections)
            .fetch_one(&state.db)
            .await?
        }
    };

    Ok(Json(SaveShopResponse {
        success: true,
        shop,
    }))
}

async fn update_shop(
    state: &AppState,
    user_id: Uuid,
    shop_id: Uuid,
    config: &Value,
    product_data: &Value,
    sections: &Value,
    version: i32,
) -> Result<ShopRow, AppError> {
    if state.config.strict_versioning {
        // Conditional update: the incoming version must advance the stored one.
        let updated = sqlx::query_as::<_, ShopRow>(
            r#"
            UPDATE shops
            SET config = $1, product_data = $2, sections = $3, version = $4, updated_at = now()
            WHERE id = $5 AND user_id = $6 AND version < $4
            RETURNING *
            "#,
        )
        .bind(config)
        .bind(product_data)
        .bind(sections)
        .bind(version)
        .bind(shop_id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

        return match updated {
            Some(shop) => Ok(shop),
            None => {
                let exists: Option<i32> =
                    sqlx::query_scalar("SELECT version FROM shops WHERE id = $1 AND user_id = $2")
                        .bind(shop_id)
                        .bind(user_id)
                        .fetch_optional(&state.db)
                        .await?;
                match exists {
                    Some(_) => Err(AppError::VersionConflict),
                    None => Err(AppError::NotFound("Shop not found".to_string())),
                }
            }
        };
    }

    sqlx::query_as::<_, ShopRow>(
        r#"
        UPDATE shops
        SET config = $1, product_data = $2, sections = $3, version = $4, updated_at = now()
        WHERE id = $5 AND user_id = $6
        RETURNING *
        "#,
    )
    .bind(config)
    .bind(product_data)
    .bind(sections)
    .bind(version)
    .bind(shop_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))
}

/// GET /api/shops/save?shopId=
///
/// With `shopId` returns that shop; without it, all of the user's shops
/// ordered by most recently updated.
pub async fn handle_get_shops(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    match params.shop_id {
        Some(shop_id) => {
            let shop = shop_owned_by(&state.db, shop_id, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;
            Ok(Json(json!({ "shop": shop })))
        }
        None => {
            let shops = sqlx::query_as::<_, ShopRow>(
                "SELECT * FROM shops WHERE user_id = $1 ORDER BY updated_at DESC",
            )
            .bind(user_id)
            .fetch_all(&state.db)
            .await?;
            Ok(Json(json!({ "shops": shops })))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Versions
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/shops/versions?shopId=
pub async fn handle_list_versions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ShopIdQuery>,
) -> Result<Json<Value>, AppError> {
    let shop_id = params
        .shop_id
        .ok_or_else(|| AppError::Validation("shopId is required".to_string()))?;

    let versions = list_versions(&state.db, user_id, shop_id).await?;
    Ok(Json(json!({ "versions": versions })))
}

/// POST /api/shops/versions
///
/// Snapshots the shop's editable fields. Auto-save snapshots are pruned to
/// the 20 most recent; manual snapshots are kept forever.
pub async fn handle_create_version(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateVersionRequest>,
) -> Result<Json<CreateVersionResponse>, AppError> {
    let (shop_id, snapshot) = match (request.shop_id, request.snapshot) {
        (Some(shop_id), Some(snapshot)) => (shop_id, snapshot),
        _ => {
            return Err(AppError::Validation(
                "shopId and snapshot are required".to_string(),
            ))
        }
    };

    let label = request.label.unwrap_or_else(|| {
        if request.is_auto_save {
            "Auto-save".to_string()
        } else {
            "Manual version".to_string()
        }
    });

    let version = create_version(
        &state.db,
        user_id,
        shop_id,
        snapshot,
        label,
        request.is_auto_save,
    )
    .await?;

    Ok(Json(CreateVersionResponse {
        success: true,
        version,
    }))
}

/// PUT /api/shops/versions
///
/// Restores a snapshot onto the shop row. Other versions are untouched.
pub async fn handle_restore_version(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<RestoreVersionRequest>,
) -> Result<Json<SaveShopResponse>, AppError> {
    let (shop_id, version_id) = match (request.shop_id, request.version_id) {
        (Some(shop_id), Some(version_id)) => (shop_id, version_id),
        _ => {
            return Err(AppError::Validation(
                "shopId and versionId are required".to_string(),
            ))
        }
    };

    let shop = restore_version(&state.db, user_id, shop_id, version_id).await?;
    Ok(Json(SaveShopResponse {
        success: true,
        shop,
    }))
}
