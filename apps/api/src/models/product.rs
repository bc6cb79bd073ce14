use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// The unpersisted shape produced by the marketplace import step.
/// Consumed as generation input, never stored directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub source: ScrapedSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedSource {
    pub platform: String,
    #[serde(default)]
    pub url: String,
    pub product_id: String,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Variant axis attached to a generated product (color, model, bundle, style).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Traceability record: which base product a generated variant came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSource {
    pub original_product_id: String,
    pub platform: String,
    pub generated_at: DateTime<Utc>,
}

/// An LLM-produced variant of a base scraped product, as returned to the
/// caller (and optionally persisted as a `generated_products` row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub images: Vec<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub variant: Option<ProductVariant>,
    pub features: Vec<String>,
    pub source: GenerationSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedProductRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub user_id: Uuid,
    pub base_product_id: Option<String>,
    pub base_product_platform: Option<String>,
    /// Generation-local id (`{base}-{strategy}-{index}`), distinct from the row id.
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub variant_type: Option<String>,
    pub variant_value: Option<String>,
    pub features: Vec<String>,
    pub specifications: Value,
    pub generation_strategy: String,
    pub generation_metadata: Value,
    pub status: String,
    pub shopify_product_id: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraped_product_deserializes_from_import_payload() {
        let json = serde_json::json!({
            "name": "Solar Lantern",
            "description": "Rechargeable solar lantern for outdoor use",
            "price": 24.99,
            "currency": "USD",
            "images": ["https://example.com/lantern.jpg"],
            "category": "Home",
            "source": {
                "platform": "aliexpress",
                "url": "https://aliexpress.com/item/123",
                "productId": "123"
            }
        });
        let product: ScrapedProduct = serde_json::from_value(json).unwrap();
        assert_eq!(product.source.product_id, "123");
        assert_eq!(product.source.platform, "aliexpress");
        assert!(product.tags.is_empty());
        assert!(product.thumbnail.is_none());
    }

    #[test]
    fn test_generated_product_serializes_variant_type_as_type() {
        let product = GeneratedProduct {
            id: "123-color-0".to_string(),
            name: "Solar Lantern — Black".to_string(),
            description: "desc".to_string(),
            price: 25.0,
            currency: "USD".to_string(),
            images: vec![],
            category: None,
            tags: vec![],
            variant: Some(ProductVariant {
                kind: "color".to_string(),
                value: "Black".to_string(),
            }),
            features: vec![],
            source: GenerationSource {
                original_product_id: "123".to_string(),
                platform: "aliexpress".to_string(),
                generated_at: Utc::now(),
            },
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["variant"]["type"], "color");
        assert_eq!(json["source"]["originalProductId"], "123");
    }
}
