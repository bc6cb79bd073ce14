use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::LlmProvider;
use crate::shopify::ShopifyGateway;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Provider adapters are trait objects so tests run against in-process fakes
/// with no network access.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn LlmProvider>,
    pub shopify: Arc<dyn ShopifyGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
