use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A named, addressable subunit of a shop with its own section list.
/// Invariant: at most one page per shop has `is_home = true`, and the home
/// page cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub sections: Value,
    pub meta_title: String,
    pub meta_description: String,
    pub is_home: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
