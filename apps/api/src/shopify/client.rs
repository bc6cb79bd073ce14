//! HTTP client for the Shopify Admin REST API.
//!
//! Wraps `reqwest` with token-header auth and typed error handling. Use
//! [`ShopifyAdminClient::new`] for production or
//! [`ShopifyAdminClient::with_base_url`] to point at a mock server in tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::product::GeneratedProduct;
use crate::shopify::{ShopifyCredentials, ShopifyError, ShopifyGateway, VerifiedShop};

const API_VERSION: &str = "2024-01";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

pub struct ShopifyAdminClient {
    client: Client,
    /// Test hook: when set, requests go to `{base_url}/admin/api/...`
    /// instead of `https://{shop_domain}/admin/api/...`.
    base_url: Option<String>,
}

impl ShopifyAdminClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: None,
        }
    }

    /// Client pointed at a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            ..Self::new()
        }
    }

    fn endpoint(&self, shop_domain: &str, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/admin/api/{API_VERSION}/{path}"),
            None => format!("https://{shop_domain}/admin/api/{API_VERSION}/{path}"),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ShopifyError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

impl Default for ShopifyAdminClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ShopEnvelope {
    shop: VerifiedShop,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: CreatedProduct,
}

#[derive(Debug, Deserialize)]
struct CreatedProduct {
    id: i64,
}

#[async_trait]
impl ShopifyGateway for ShopifyAdminClient {
    async fn verify_credentials(
        &self,
        credentials: &ShopifyCredentials,
    ) -> Result<VerifiedShop, ShopifyError> {
        let url = self.endpoint(&credentials.shop_domain, "shop.json");
        let response = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &credentials.access_token)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let envelope: ShopEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::UnexpectedResponse(e.to_string()))?;

        Ok(envelope.shop)
    }

    async fn create_product(
        &self,
        credentials: &ShopifyCredentials,
        product: &GeneratedProduct,
    ) -> Result<i64, ShopifyError> {
        let url = self.endpoint(&credentials.shop_domain, "products.json");
        let payload = json!({ "product": product_payload(product) });

        let response = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &credentials.access_token)
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let envelope: ProductEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::UnexpectedResponse(e.to_string()))?;

        Ok(envelope.product.id)
    }
}

/// Builds the Admin REST product payload. Products land as drafts with one
/// variant at the generated price.
pub fn product_payload(product: &GeneratedProduct) -> Value {
    let variant_title = product
        .variant
        .as_ref()
        .map(|v| v.value.clone())
        .unwrap_or_else(|| "Default".to_string());

    let images: Vec<Value> = product
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "src": url,
                "alt": product.name,
                "position": i + 1,
            })
        })
        .collect();

    json!({
        "title": product.name,
        "body_html": description_html(&product.description),
        "vendor": "AfriShop",
        "product_type": product.category.as_deref().unwrap_or("General"),
        "tags": product.tags.join(", "),
        "status": "draft",
        "variants": [{
            "title": variant_title,
            "price": format!("{:.2}", product.price),
            "sku": product.id,
            "inventory_quantity": 100,
            "option1": variant_title,
        }],
        "images": images,
    })
}

/// Formats a plain-text description as Shopify body HTML.
fn description_html(description: &str) -> String {
    let body = description.replace('\n', "<br>");
    format!("<div class=\"product-description\">\n    <p>{body}</p>\n  </div>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{GenerationSource, ProductVariant};
    use chrono::Utc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ShopifyCredentials {
        ShopifyCredentials {
            shop_domain: "mystore.myshopify.com".to_string(),
            access_token: "shpat_test".to_string(),
        }
    }

    fn product() -> GeneratedProduct {
        GeneratedProduct {
            id: "123-color-0".to_string(),
            name: "Solar Lantern — Black".to_string(),
            description: "Line one\nLine two".to_string(),
            price: 25.5,
            currency: "USD".to_string(),
            images: vec!["https://example.com/a.jpg".to_string()],
            category: Some("Home".to_string()),
            tags: vec!["solar".to_string(), "black".to_string()],
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
        }
    }

    #[tokio::test]
    async fn test_verify_credentials_parses_shop() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2024-01/shop.json"))
            .and(header("X-Shopify-Access-Token", "shpat_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shop": { "name": "My Store", "domain": "mystore.myshopify.com" }
            })))
            .mount(&server)
            .await;

        let client = ShopifyAdminClient::with_base_url(&server.uri());
        let shop = client.verify_credentials(&credentials()).await.unwrap();
        assert_eq!(shop.name, "My Store");
        assert_eq!(shop.domain.as_deref(), Some("mystore.myshopify.com"));
    }

    #[tokio::test]
    async fn test_verify_credentials_rejects_bad_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2024-01/shop.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let client = ShopifyAdminClient::with_base_url(&server.uri());
        let err = client.verify_credentials(&credentials()).await.unwrap_err();
        match err {
            ShopifyError::Api { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_product_returns_remote_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/api/2024-01/products.json"))
            .and(body_partial_json(serde_json::json!({
                "product": { "title": "Solar Lantern — Black", "status": "draft" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "product": { "id": 987654321 }
            })))
            .mount(&server)
            .await;

        let client = ShopifyAdminClient::with_base_url(&server.uri());
        let id = client.create_product(&credentials(), &product()).await.unwrap();
        assert_eq!(id, 987654321);
    }

    #[tokio::test]
    async fn test_create_product_surfaces_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/api/2024-01/products.json"))
            .respond_with(ResponseTemplate::new(422).set_body_string("title can't be blank"))
            .mount(&server)
            .await;

        let client = ShopifyAdminClient::with_base_url(&server.uri());
        let err = client
            .create_product(&credentials(), &product())
            .await
            .unwrap_err();
        match err {
            ShopifyError::Api { status, message } => {
                assert_eq!(status, 422);
                assert!(message.contains("title"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_product_payload_shape() {
        let payload = product_payload(&product());
        assert_eq!(payload["title"], "Solar Lantern — Black");
        assert_eq!(payload["vendor"], "AfriShop");
        assert_eq!(payload["status"], "draft");
        assert_eq!(payload["tags"], "solar, black");
        assert_eq!(payload["variants"][0]["price"], "25.50");
        assert_eq!(payload["variants"][0]["option1"], "Black");
        assert_eq!(payload["images"][0]["position"], 1);
        assert!(payload["body_html"]
            .as_str()
            .unwrap()
            .contains("Line one<br>Line two"));
    }

    #[test]
    fn test_payload_without_variant_uses_default_title() {
        let mut p = product();
        p.variant = None;
        let payload = product_payload(&p);
        assert_eq!(payload["variants"][0]["title"], "Default");
    }
}
