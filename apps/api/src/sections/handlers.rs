//! Axum route handlers for layout generation.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::sections::orchestrator::{
    generate_optimized_layout, section_instances, LayoutContext,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLayoutRequest {
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_category: Option<String>,
    pub product_price: Option<f64>,
    pub brand_tone: Option<String>,
    pub template: Option<String>,
    pub target_audience: Option<String>,
    pub shop_goal: Option<String>,
    pub shop_id: Option<Uuid>,
}

/// POST /api/sections/generate
///
/// Selects an optimized section layout for the product. With `shopId` the
/// shop's sections are overwritten wholesale with the new instances; that
/// write is best-effort and never fails the response.
pub async fn handle_generate_layout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GenerateLayoutRequest>,
) -> Result<Json<Value>, AppError> {
    let product_name = request
        .product_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("Product name and description are required".to_string())
        })?;
    let product_description = request
        .product_description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("Product name and description are required".to_string())
        })?;

    let context = LayoutContext {
        product_name,
        product_description,
        product_category: request.product_category,
        product_price: request.product_price,
        brand_tone: request.brand_tone.unwrap_or_else(|| "modern".to_string()),
        template: request.template.unwrap_or_else(|| "Modern".to_string()),
        target_audience: request.target_audience,
        shop_goal: request
            .shop_goal
            .unwrap_or_else(|| "conversion".to_string()),
    };

    let layout = generate_optimized_layout(state.llm.as_ref(), &context).await;

    if let Some(shop_id) = request.shop_id {
        let sections = section_instances(&layout.sections);
        let result = sqlx::query(
            "UPDATE shops SET sections = $1, updated_at = now() WHERE id = $2 AND user_id = $3",
        )
        .bind(&sections)
        .bind(shop_id)
        .bind(user_id)
        .execute(&state.db)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                info!(
                    "Shop {shop_id} updated with {} sections",
                    layout.sections.len()
                );
            }
            Ok(_) => warn!("Shop {shop_id} not found for user {user_id}, layout not applied"),
            Err(e) => warn!("Failed to apply layout to shop {shop_id}: {e}"),
        }
    }

    Ok(Json(json!({ "success": true, "layout": layout })))
}

/// GET /api/sections/generate
///
/// Readiness probe for the layout service.
pub async fn handle_layout_status(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let library_size: usize = crate::sections::library::CATEGORIES
        .iter()
        .map(|c| c.sections.len())
        .sum();

    Ok(Json(json!({
        "success": true,
        "status": "ready",
        "features": {
            "aiPowered": true,
            "sectionsLibrary": library_size,
            "optimizedForConversion": true,
            "multiTenant": true,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_all_defaults_absent() {
        let request: GenerateLayoutRequest =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.product_name.is_none());
        assert!(request.brand_tone.is_none());
        assert!(request.shop_id.is_none());
    }

    #[test]
    fn test_request_accepts_full_payload() {
        let json = serde_json::json!({
            "productName": "Solar Lantern",
            "productDescription": "desc",
            "productCategory": "Home",
            "productPrice": 24.99,
            "brandTone": "elegant",
            "template": "Minimal",
            "targetAudience": "households",
            "shopGoal": "branding",
            "shopId": Uuid::new_v4(),
        });
        let request: GenerateLayoutRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.brand_tone.as_deref(), Some("elegant"));
        assert_eq!(request.shop_goal.as_deref(), Some("branding"));
        assert!(request.shop_id.is_some());
    }
}
