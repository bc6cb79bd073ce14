//! Shopify Admin API integration: credential verification, product creation,
//! and the sequential batch sync used by `/api/shopify/sync`.

pub mod client;
pub mod handlers;
pub mod products;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::product::GeneratedProduct;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Shopify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Shopify response: {0}")]
    UnexpectedResponse(String),
}

/// Credentials for a custom-app Admin API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCredentials {
    /// `mystore.myshopify.com`
    pub shop_domain: String,
    pub access_token: String,
}

/// The shop record returned by a successful credential check.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedShop {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Seam over the Shopify Admin API so handlers and the batch loop can be
/// tested without a network.
#[async_trait]
pub trait ShopifyGateway: Send + Sync {
    /// Makes a lightweight authenticated call to confirm the token is valid
    /// for the domain.
    async fn verify_credentials(
        &self,
        credentials: &ShopifyCredentials,
    ) -> Result<VerifiedShop, ShopifyError>;

    /// Creates one product remotely and returns its Shopify id.
    async fn create_product(
        &self,
        credentials: &ShopifyCredentials,
        product: &GeneratedProduct,
    ) -> Result<i64, ShopifyError>;
}
