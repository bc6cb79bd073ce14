//! Shop snapshots: create, list, prune, restore.
//!
//! Snapshots are immutable rows in `shop_versions`. Auto-save snapshots are
//! retention-pruned to the 20 most recent per shop; the prune runs in the
//! same transaction as the insert so a crash can never leave more than 20.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::shop::{ShopRow, ShopVersionRow};
use crate::shops::shop_owned_by;

/// Auto-save snapshots kept per shop. Manual snapshots are never pruned.
pub const AUTO_SAVE_RETENTION: i64 = 20;

/// Most versions returned by a single listing call.
const VERSION_LIST_LIMIT: i64 = 50;

/// Returns a shop's versions, newest first. The ownership check runs on the
/// shop itself so a version id can never be enumerated across tenants.
pub async fn list_versions(
    pool: &PgPool,
    user_id: Uuid,
    shop_id: Uuid,
) -> Result<Vec<ShopVersionRow>, AppError> {
    shop_owned_by(pool, shop_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    Ok(sqlx::query_as::<_, ShopVersionRow>(
        "SELECT * FROM shop_versions WHERE shop_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(shop_id)
    .bind(VERSION_LIST_LIMIT)
    .fetch_all(pool)
    .await?)
}

/// Inserts a snapshot row and, for auto-saves, prunes rows ranked beyond
/// [`AUTO_SAVE_RETENTION`] by recency.
pub async fn create_version(
    pool: &PgPool,
    user_id: Uuid,
    shop_id: Uuid,
    snapshot: Value,
    label: String,
    is_auto_save: bool,
) -> Result<ShopVersionRow, AppError> {
    shop_owned_by(pool, shop_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    let mut tx = pool.begin().await?;

    let version = sqlx::query_as::<_, ShopVersionRow>(
        r#"
        INSERT INTO shop_versions (shop_id, snapshot, label, is_auto_save)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(shop_id)
    .bind(&snapshot)
    .bind(&label)
    .bind(is_auto_save)
    .fetch_one(&mut *tx)
    .await?;

    if is_auto_save {
        let pruned = sqlx::query(
            r#"
            DELETE FROM shop_versions
            WHERE id IN (
                SELECT id FROM shop_versions
                WHERE shop_id = $1 AND is_auto_save = TRUE
                ORDER BY created_at DESC
                OFFSET $2
            )
            "#,
        )
        .bind(shop_id)
        .bind(AUTO_SAVE_RETENTION)
        .execute(&mut *tx)
        .await?;

        if pruned.rows_affected() > 0 {
            info!(
                "Pruned {} auto-save version(s) for shop {shop_id}",
                pruned.rows_affected()
            );
        }
    }

    tx.commit().await?;

    Ok(version)
}

/// Copies a snapshot's `config`, `sections`, and `productData` back onto the
/// shop row. The snapshot shape is not validated beyond presence; absent
/// keys restore as JSON null, exactly as they were captured.
pub async fn restore_version(
    pool: &PgPool,
    user_id: Uuid,
    shop_id: Uuid,
    version_id: Uuid,
) -> Result<ShopRow, AppError> {
    shop_owned_by(pool, shop_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    let version = sqlx::query_as::<_, ShopVersionRow>(
        "SELECT * FROM shop_versions WHERE id = $1 AND shop_id = $2",
    )
    .bind(version_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Version not found".to_string()))?;

    let config = snapshot_field(&version.snapshot, "config");
    let sections = snapshot_field(&version.snapshot, "sections");
    let product_data = snapshot_field(&version.snapshot, "productData");

    let shop = sqlx::query_as::<_, ShopRow>(
        r#"
        UPDATE shops
        SET config = $1, sections = $2, product_data = $3, updated_at = now()
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(&config)
    .bind(&sections)
    .bind(&product_data)
    .bind(shop_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    info!("Restored shop {shop_id} from version {version_id}");

    Ok(shop)
}

fn snapshot_field(snapshot: &Value, key: &str) -> Value {
    snapshot.get(key).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_field_extracts_present_key() {
        let snapshot = json!({
            "config": { "brandColor": "#ea580c" },
            "sections": [],
            "productData": { "name": "Test" }
        });
        assert_eq!(
            snapshot_field(&snapshot, "config"),
            json!({ "brandColor": "#ea580c" })
        );
        assert_eq!(snapshot_field(&snapshot, "sections"), json!([]));
    }

    #[test]
    fn test_snapshot_field_absent_key_is_null() {
        let snapshot = json!({ "config": {} });
        assert_eq!(snapshot_field(&snapshot, "productData"), Value::Null);
    }

    #[test]
    fn test_retention_keeps_twenty() {
        assert_eq!(AUTO_SAVE_RETENTION, 20);
    }
}
