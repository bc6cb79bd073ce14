pub mod handlers;
pub mod publish;
pub mod versioning;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::shop::ShopRow;

/// Fetches a shop under the owner filter. `None` means the row does not
/// exist *for this user*; handlers map that to 404 regardless of whether
/// the id exists for someone else.
pub async fn shop_owned_by(
    pool: &PgPool,
    shop_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ShopRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopRow>("SELECT * FROM shops WHERE id = $1 AND user_id = $2")
        .bind(shop_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
