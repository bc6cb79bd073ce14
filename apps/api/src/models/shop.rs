use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant's shop: branding config, imported product data, and the ordered
/// section list the builder edits. Ownership is strictly by `user_id`;
/// every read/write is filtered by it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShopRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub config: Value,
    pub product_data: Value,
    pub sections: Value,
    pub version: i32,
    pub status: String,
    pub shop_url: Option<String>,
    pub shop_slug: Option<String>,
    pub shopify_domain: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_shop_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of a shop's editable fields at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShopVersionRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub snapshot: Value,
    pub label: String,
    pub is_auto_save: bool,
    pub created_at: DateTime<Utc>,
}
