//! Product Generation: expands one imported product into N priced variants.
//!
//! Flow: build strategy plan → per product: prompt by strategy → LLM copy
//! (fallback copy on parse failure) → price with multiplier + jitter →
//! assemble GeneratedProduct. Individual failures are skipped, never fatal.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::llm_client::{parse_json_response, CompletionOptions, LlmProvider};
use crate::models::product::{GeneratedProduct, GenerationSource, ProductVariant, ScrapedProduct};
use crate::products::prompts::{
    BUNDLE_PROMPT_TEMPLATE, COLOR_PROMPT_TEMPLATE, MODEL_PROMPT_TEMPLATE, PREMIUM_PROMPT_TEMPLATE,
    PRODUCT_COPY_SYSTEM,
};

/// Pause between consecutive LLM calls to stay under provider rate limits.
const PACING_MS: u64 = 500;

const COLORS: [&str; 8] = [
    "Black", "White", "Red", "Blue", "Pink", "Green", "Purple", "Orange",
];
const MODELS: [&str; 6] = ["Standard", "Pro", "Premium", "Deluxe", "Elite", "Plus"];
const BUNDLES: [&str; 4] = ["Duo Pack", "Family Pack", "Starter Pack", "Complete Pack"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Color,
    Model,
    Bundle,
    Premium,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Color => "color",
            Strategy::Model => "model",
            Strategy::Bundle => "bundle",
            Strategy::Premium => "premium",
        }
    }
}

/// Options accepted by [`generate_products`]. Mirrors the request's
/// `options` object; all fields have product defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(default = "default_price_variation")]
    pub price_variation: f64,
    #[serde(default = "default_true")]
    pub include_variants: bool,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_target_market")]
    pub target_market: String,
}

fn default_price_variation() -> f64 {
    20.0
}
fn default_true() -> bool {
    true
}
fn default_tone() -> String {
    "professional and engaging".to_string()
}
fn default_target_market() -> String {
    "West Africa".to_string()
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            price_variation: default_price_variation(),
            include_variants: default_true(),
            tone: default_tone(),
            target_market: default_target_market(),
        }
    }
}

/// Copy fields the LLM fills in for each variant.
#[derive(Debug, Deserialize)]
struct GeneratedCopy {
    name: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Expands `base` into up to `count` variants. Per-product LLM failures are
/// logged and skipped, so the result may be shorter than `count`.
pub async fn generate_products(
    llm: &dyn LlmProvider,
    base: &ScrapedProduct,
    count: usize,
    options: &GenerationOptions,
) -> Vec<GeneratedProduct> {
    info!("Generating {count} products from \"{}\"", base.name);

    let plan = build_plan(count);
    let mut products = Vec::with_capacity(plan.len());

    for (i, (strategy, index)) in plan.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(PACING_MS)).await;
        }

        match generate_single(llm, base, *strategy, *index, options).await {
            Ok(product) => products.push(product),
            Err(e) => warn!("Product generation {i} failed, skipping: {e}"),
        }
    }

    info!("Generated {} products", products.len());
    products
}

/// The fixed strategy mix: 8 colors, 6 model tiers, 4 bundles, 2 premium,
/// truncated to `count`. The second element is the index within the strategy.
pub fn build_plan(count: usize) -> Vec<(Strategy, usize)> {
    let quotas = [
        (Strategy::Color, 8),
        (Strategy::Model, 6),
        (Strategy::Bundle, 4),
        (Strategy::Premium, 2),
    ];

    let mut plan = Vec::with_capacity(count);
    for (strategy, quota) in quotas {
        for index in 0..quota {
            if plan.len() >= count {
                return plan;
            }
            plan.push((strategy, index));
        }
    }
    plan
}

async fn generate_single(
    llm: &dyn LlmProvider,
    base: &ScrapedProduct,
    strategy: Strategy,
    index: usize,
    options: &GenerationOptions,
) -> Result<GeneratedProduct, crate::llm_client::LlmError> {
    let variant = variant_for(strategy, index);
    let prompt = build_prompt(base, strategy, &variant, options);

    // Copy generation runs hot for variety.
    let opts = CompletionOptions {
        system: Some(PRODUCT_COPY_SYSTEM.to_string()),
        max_tokens: 500,
        temperature: 0.9,
    };

    let text = llm.complete(&prompt, &opts).await?;
    let copy = parse_json_response::<GeneratedCopy>(&text).unwrap_or_else(|e| {
        warn!("Product copy parse failed, using fallback: {e}");
        GeneratedCopy {
            name: format!("{} - Variant {}", base.name, index + 1),
            description: base.description.clone(),
            tags: base.tags.clone(),
        }
    });

    let jitter: f64 = rand::thread_rng().gen_range(-1.0..=1.0);
    let price = final_price(base.price, strategy, index, options.price_variation, jitter);

    Ok(GeneratedProduct {
        id: format!("{}-{}-{}", base.source.product_id, strategy.as_str(), index),
        name: copy.name,
        description: copy.description,
        price,
        currency: base.currency.clone(),
        images: base.images.clone(),
        category: base.category.clone(),
        tags: if copy.tags.is_empty() {
            base.tags.clone()
        } else {
            copy.tags
        },
        variant: options.include_variants.then_some(variant),
        features: base.features.clone(),
        source: GenerationSource {
            original_product_id: base.source.product_id.clone(),
            platform: base.source.platform.clone(),
            generated_at: Utc::now(),
        },
    })
}

/// The variant axis a strategy assigns at a given index.
pub fn variant_for(strategy: Strategy, index: usize) -> ProductVariant {
    match strategy {
        Strategy::Color => ProductVariant {
            kind: "color".to_string(),
            value: COLORS[index % COLORS.len()].to_string(),
        },
        Strategy::Model => ProductVariant {
            kind: "model".to_string(),
            value: MODELS[index % MODELS.len()].to_string(),
        },
        Strategy::Bundle => ProductVariant {
            kind: "bundle".to_string(),
            value: BUNDLES[index % BUNDLES.len()].to_string(),
        },
        Strategy::Premium => ProductVariant {
            kind: "style".to_string(),
            value: "Premium".to_string(),
        },
    }
}

fn build_prompt(
    base: &ScrapedProduct,
    strategy: Strategy,
    variant: &ProductVariant,
    options: &GenerationOptions,
) -> String {
    let template = match strategy {
        Strategy::Color => COLOR_PROMPT_TEMPLATE.replace("{color}", &variant.value),
        Strategy::Model => MODEL_PROMPT_TEMPLATE.replace("{model}", &variant.value),
        Strategy::Bundle => BUNDLE_PROMPT_TEMPLATE.replace("{bundle}", &variant.value),
        Strategy::Premium => PREMIUM_PROMPT_TEMPLATE.to_string(),
    };

    template
        .replace("{base_name}", &base.name)
        .replace("{base_description}", &base.description)
        .replace("{base_price}", &base.price.to_string())
        .replace("{currency}", &base.currency)
        .replace("{tone}", &options.tone)
        .replace("{target_market}", &options.target_market)
}

/// Strategy-specific price multiplier.
pub fn price_multiplier(strategy: Strategy, index: usize) -> f64 {
    match strategy {
        Strategy::Color => 1.0,
        Strategy::Model => 1.0 + index as f64 * 0.1,
        Strategy::Bundle => 1.8,
        Strategy::Premium => 1.5,
    }
}

/// Final price: base × strategy multiplier × (1 ± variation%), rounded to
/// cents. `jitter` is a uniform draw in [-1, 1] so tests can pin it.
pub fn final_price(
    base_price: f64,
    strategy: Strategy,
    index: usize,
    variation_pct: f64,
    jitter: f64,
) -> f64 {
    let multiplier = price_multiplier(strategy, index);
    let variation = 1.0 + jitter * variation_pct / 100.0;
    (base_price * multiplier * variation * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::llm_client::{CompletionOptions, LlmError};
    use crate::models::product::ScrapedSource;

    /// Fake provider returning a canned response for every call.
    struct CannedLlm(&'static str);

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn complete(
            &self,
            _prompt: &str,
            _opts: &CompletionOptions,
        ) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn base_product() -> ScrapedProduct {
        ScrapedProduct {
            name: "Solar Lantern".to_string(),
            description: "Rechargeable solar lantern".to_string(),
            price: 20.0,
            currency: "USD".to_string(),
            images: vec!["https://example.com/a.jpg".to_string()],
            thumbnail: None,
            category: Some("Home".to_string()),
            tags: vec!["solar".to_string()],
            features: vec![],
            source: ScrapedSource {
                platform: "aliexpress".to_string(),
                url: "https://aliexpress.com/item/123".to_string(),
                product_id: "123".to_string(),
                scraped_at: None,
            },
        }
    }

    #[test]
    fn test_plan_for_twenty_follows_strategy_quotas() {
        let plan = build_plan(20);
        assert_eq!(plan.len(), 20);
        let colors = plan.iter().filter(|(s, _)| *s == Strategy::Color).count();
        let models = plan.iter().filter(|(s, _)| *s == Strategy::Model).count();
        let bundles = plan.iter().filter(|(s, _)| *s == Strategy::Bundle).count();
        let premium = plan.iter().filter(|(s, _)| *s == Strategy::Premium).count();
        assert_eq!((colors, models, bundles, premium), (8, 6, 4, 2));
    }

    #[test]
    fn test_plan_truncates_to_count() {
        let plan = build_plan(5);
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|(s, _)| *s == Strategy::Color));
    }

    #[test]
    fn test_plan_larger_than_quota_sum_caps_at_twenty() {
        assert_eq!(build_plan(50).len(), 20);
    }

    #[test]
    fn test_variant_cycles_through_colors() {
        assert_eq!(variant_for(Strategy::Color, 0).value, "Black");
        assert_eq!(variant_for(Strategy::Color, 8).value, "Black");
        assert_eq!(variant_for(Strategy::Color, 3).value, "Blue");
    }

    #[test]
    fn test_price_multipliers() {
        assert!((price_multiplier(Strategy::Color, 3) - 1.0).abs() < 1e-9);
        assert!((price_multiplier(Strategy::Model, 2) - 1.2).abs() < 1e-9);
        assert!((price_multiplier(Strategy::Bundle, 0) - 1.8).abs() < 1e-9);
        assert!((price_multiplier(Strategy::Premium, 1) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_final_price_rounds_to_cents() {
        // 20 × 1.5 × (1 + 0.2) = 36.00
        let price = final_price(20.0, Strategy::Premium, 0, 20.0, 1.0);
        assert!((price - 36.0).abs() < 1e-9);
        // Zero jitter keeps the multiplier only.
        let price = final_price(19.99, Strategy::Bundle, 0, 20.0, 0.0);
        assert!((price - 35.98).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_five_products_with_distinct_ids() {
        let llm = CannedLlm(r#"{"name": "Solar Lantern — Black", "description": "Now in black", "tags": ["black"]}"#);
        let products =
            generate_products(&llm, &base_product(), 5, &GenerationOptions::default()).await;

        assert_eq!(products.len(), 5);
        let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        for product in &products {
            assert_eq!(product.source.original_product_id, "123");
            assert_eq!(product.source.platform, "aliexpress");
            assert!(product.variant.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_copy_falls_back_to_base_fields() {
        let llm = CannedLlm("sorry, I can't do JSON today");
        let products =
            generate_products(&llm, &base_product(), 2, &GenerationOptions::default()).await;

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Solar Lantern - Variant 1");
        assert_eq!(products[0].description, "Rechargeable solar lantern");
        assert_eq!(products[0].tags, vec!["solar"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_include_variants_false_omits_variant_axis() {
        let llm = CannedLlm(r#"{"name": "N", "description": "D", "tags": []}"#);
        let options = GenerationOptions {
            include_variants: false,
            ..Default::default()
        };
        let products = generate_products(&llm, &base_product(), 3, &options).await;
        assert!(products.iter().all(|p| p.variant.is_none()));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: GenerationOptions = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!((options.price_variation - 20.0).abs() < 1e-9);
        assert!(options.include_variants);
        assert_eq!(options.target_market, "West Africa");
    }
}
