//! Sequential batch creation of generated products on Shopify.
//!
//! The loop blocks for the lifetime of the request: one remote call per
//! product, a progress callback after each attempt, ~600ms pacing between
//! calls (the Admin API allows 2 req/s). Individual failures are recorded
//! and never abort the loop; there is no retry.

use serde::Serialize;
use tracing::warn;

use crate::models::product::GeneratedProduct;
use crate::shopify::{ShopifyCredentials, ShopifyGateway};

/// Pause between consecutive Admin API calls.
const PACING_MS: u64 = 600;

/// Per-product outcome, in input order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub success: bool,
    pub created: usize,
    pub failed: usize,
    pub results: Vec<BatchResult>,
}

/// Creates every product in order, invoking `on_progress(current, total)`
/// after each attempt.
pub async fn create_products_batch(
    gateway: &dyn ShopifyGateway,
    credentials: &ShopifyCredentials,
    products: &[GeneratedProduct],
    mut on_progress: impl FnMut(usize, usize),
) -> BatchOutcome {
    let total = products.len();
    let mut results = Vec::with_capacity(total);
    let mut created = 0;
    let mut failed = 0;

    for (i, product) in products.iter().enumerate() {
        on_progress(i + 1, total);

        match gateway.create_product(credentials, product).await {
            Ok(remote_id) => {
                created += 1;
                results.push(BatchResult {
                    product_id: Some(remote_id),
                    error: None,
                });
            }
            Err(e) => {
                warn!("Shopify product creation failed for {}: {e}", product.id);
                failed += 1;
                results.push(BatchResult {
                    product_id: None,
                    error: Some(e.to_string()),
                });
            }
        }

        if i + 1 < total {
            tokio::time::sleep(std::time::Duration::from_millis(PACING_MS)).await;
        }
    }

    BatchOutcome {
        success: created > 0,
        created,
        failed,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::product::GenerationSource;
    use crate::shopify::{ShopifyError, VerifiedShop};

    /// Gateway that fails every product whose id is listed.
    struct ScriptedGateway {
        fail_ids: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ShopifyGateway for ScriptedGateway {
        async fn verify_credentials(
            &self,
            _credentials: &ShopifyCredentials,
        ) -> Result<VerifiedShop, ShopifyError> {
            Ok(VerifiedShop {
                name: "My Store".to_string(),
                domain: None,
            })
        }

        async fn create_product(
            &self,
            _credentials: &ShopifyCredentials,
            product: &GeneratedProduct,
        ) -> Result<i64, ShopifyError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_ids.contains(&product.id.as_str()) {
                Err(ShopifyError::Api {
                    status: 422,
                    message: "rejected".to_string(),
                })
            } else {
                Ok(1000 + n as i64)
            }
        }
    }

    fn product(id: &str) -> GeneratedProduct {
        GeneratedProduct {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: "desc".to_string(),
            price: 10.0,
            currency: "USD".to_string(),
            images: vec![],
            category: None,
            tags: vec![],
            variant: None,
            features: vec![],
            source: GenerationSource {
                original_product_id: "base".to_string(),
                platform: "aliexpress".to_string(),
                generated_at: Utc::now(),
            },
        }
    }

    fn credentials() -> ShopifyCredentials {
        ShopifyCredentials {
            shop_domain: "mystore.myshopify.com".to_string(),
            access_token: "shpat_test".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_continues_past_failures() {
        let gateway = ScriptedGateway {
            fail_ids: vec!["b"],
            calls: AtomicUsize::new(0),
        };
        let products = vec![product("a"), product("b"), product("c")];

        let outcome =
            create_products_batch(&gateway, &credentials(), &products, |_, _| {}).await;

        assert!(outcome.success);
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results[0].product_id.is_some());
        assert!(outcome.results[1].product_id.is_none());
        assert!(outcome.results[1].error.as_deref().unwrap().contains("422"));
        assert!(outcome.results[2].product_id.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_fires_once_per_item_in_order() {
        let gateway = ScriptedGateway {
            fail_ids: vec![],
            calls: AtomicUsize::new(0),
        };
        let products = vec![product("a"), product("b")];

        let mut seen = Vec::new();
        create_products_batch(&gateway, &credentials(), &products, |current, total| {
            seen.push((current, total));
        })
        .await;

        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_mean_no_success() {
        let gateway = ScriptedGateway {
            fail_ids: vec!["a", "b"],
            calls: AtomicUsize::new(0),
        };
        let products = vec![product("a"), product("b")];

        let outcome =
            create_products_batch(&gateway, &credentials(), &products, |_, _| {}).await;

        assert!(!outcome.success);
        assert_eq!(outcome.created, 0);
        assert_eq!(outcome.failed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_is_a_no_op() {
        let gateway = ScriptedGateway {
            fail_ids: vec![],
            calls: AtomicUsize::new(0),
        };
        let outcome = create_products_batch(&gateway, &credentials(), &[], |_, _| {}).await;
        assert!(!outcome.success);
        assert!(outcome.results.is_empty());
    }
}
