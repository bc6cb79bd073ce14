//! Section Orchestrator: asks the LLM to select and order layout sections
//! for a product, optimized for a stated goal.
//!
//! The orchestrator never fails the request: any LLM or parse error falls
//! back to a deterministic default layout keyed by brand tone.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::llm_client::{parse_json_response, CompletionOptions, LlmProvider};
use crate::sections::library;
use crate::sections::prompts::{LAYOUT_PROMPT_TEMPLATE, LAYOUT_SYSTEM};

/// Inputs to layout selection, straight from the request body.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub product_name: String,
    pub product_description: String,
    pub product_category: Option<String>,
    pub product_price: Option<f64>,
    pub brand_tone: String,
    pub template: String,
    pub target_audience: Option<String>,
    pub shop_goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecommendation {
    pub section_id: String,
    pub category: String,
    pub position: u32,
    pub reasoning: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub structure: String,
    pub page_count: u32,
    pub conversion_focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutGeneration {
    pub sections: Vec<SectionRecommendation>,
    pub layout: LayoutPlan,
    pub reasoning: String,
}

/// Selects and orders sections for the given context. Falls back to the
/// tone-keyed default layout on any LLM failure.
pub async fn generate_optimized_layout(
    llm: &dyn LlmProvider,
    context: &LayoutContext,
) -> LayoutGeneration {
    info!("Generating optimized layout for: {}", context.product_name);

    let prompt = build_layout_prompt(context);
    let opts = CompletionOptions {
        system: Some(LAYOUT_SYSTEM.to_string()),
        max_tokens: 2000,
        temperature: 0.7,
    };

    let layout = match llm.complete(&prompt, &opts).await {
        Ok(text) => match parse_json_response::<LayoutGeneration>(&text) {
            Ok(layout) => layout,
            Err(e) => {
                warn!("Layout response did not parse, using default layout: {e}");
                return default_layout(&context.brand_tone);
            }
        },
        Err(e) => {
            warn!("Layout LLM call failed, using default layout: {e}");
            return default_layout(&context.brand_tone);
        }
    };

    // Unknown ids are kept (the renderer ignores them) but flagged.
    let invalid: Vec<&str> = layout
        .sections
        .iter()
        .filter(|s| !library::contains(&s.section_id))
        .map(|s| s.section_id.as_str())
        .collect();
    if !invalid.is_empty() {
        warn!("Layout referenced unknown section ids: {invalid:?}");
    }

    info!(
        "Layout generated: {} sections, structure {}",
        layout.sections.len(),
        layout.layout.structure
    );

    layout
}

fn build_layout_prompt(context: &LayoutContext) -> String {
    let mut details = String::new();
    if let Some(category) = &context.product_category {
        details.push_str(&format!("Category: {category}\n"));
    }
    if let Some(price) = context.product_price {
        details.push_str(&format!("Price: {price} USD\n"));
    }
    if let Some(audience) = &context.target_audience {
        details.push_str(&format!("Target audience: {audience}\n"));
    }

    LAYOUT_PROMPT_TEMPLATE
        .replace("{product_name}", &context.product_name)
        .replace("{product_description}", &context.product_description)
        .replace("{product_details}", &details)
        .replace("{brand_tone}", &context.brand_tone)
        .replace("{template}", &context.template)
        .replace("{shop_goal}", &context.shop_goal)
        .replace("{catalog}", &library::catalog_text())
}

/// Deterministic layouts used when the LLM is unavailable. Every id here
/// exists in the library.
pub fn default_layout(tone: &str) -> LayoutGeneration {
    match tone {
        "elegant" => LayoutGeneration {
            sections: vec![
                recommendation("hero-minimal", "hero", 1, "Elegant hero with white space", Priority::High),
                recommendation("features-alternating", "features", 2, "Detailed, elegant feature presentation", Priority::High),
                recommendation("testimonials-stars", "testimonials", 3, "Ratings for credibility", Priority::Medium),
                recommendation("cta-centered", "cta", 4, "Simple, elegant CTA", Priority::High),
            ],
            layout: LayoutPlan {
                structure: "Hero -> Features -> Social Proof -> CTA".to_string(),
                page_count: 1,
                conversion_focus: "Minimalist elegant layout".to_string(),
            },
            reasoning: "Default elegant layout".to_string(),
        },
        _ => LayoutGeneration {
            sections: vec![
                recommendation("hero-split", "hero", 1, "Modern hero with image and text side by side", Priority::High),
                recommendation("features-3-columns", "features", 2, "3 features to show the key benefits", Priority::High),
                recommendation("how-it-works-numbered", "howItWorks", 3, "Explain the process in 3 simple steps", Priority::Medium),
                recommendation("testimonials-carousel", "testimonials", 4, "Social proof with customer testimonials", Priority::Medium),
                recommendation("cta-centered", "cta", 5, "Final call-to-action for conversion", Priority::High),
            ],
            layout: LayoutPlan {
                structure: "Hero -> Features -> Process -> Social Proof -> CTA".to_string(),
                page_count: 1,
                conversion_focus: "Balanced modern layout".to_string(),
            },
            reasoning: "Default modern layout".to_string(),
        },
    }
}

fn recommendation(
    id: &str,
    category: &str,
    position: u32,
    reasoning: &str,
    priority: Priority,
) -> SectionRecommendation {
    SectionRecommendation {
        section_id: id.to_string(),
        category: category.to_string(),
        position,
        reasoning: reasoning.to_string(),
        priority,
    }
}

/// Materializes recommendations into section instances for the shop's
/// `sections` column: fresh synthetic id, empty default content, default
/// style. The column is overwritten wholesale, never merged.
pub fn section_instances(recommendations: &[SectionRecommendation]) -> Value {
    let millis = Utc::now().timestamp_millis();
    let instances: Vec<Value> = recommendations
        .iter()
        .map(|rec| {
            json!({
                "id": format!("{}-{}-{}", rec.section_id, millis, random_suffix()),
                "type": rec.section_id,
                "category": rec.category,
                "position": rec.position,
                "visible": true,
                "content": {
                    "title": "",
                    "description": "",
                },
                "style": {
                    "backgroundColor": "transparent",
                    "paddingTop": "normal",
                    "paddingBottom": "normal",
                },
            })
        })
        .collect();
    Value::Array(instances)
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::llm_client::LlmError;

    struct CannedLlm(Result<&'static str, ()>);

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn complete(
            &self,
            _prompt: &str,
            _opts: &CompletionOptions,
        ) -> Result<String, LlmError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(LlmError::EmptyContent),
            }
        }
    }

    fn context() -> LayoutContext {
        LayoutContext {
            product_name: "Solar Lantern".to_string(),
            product_description: "Rechargeable solar lantern".to_string(),
            product_category: Some("Home".to_string()),
            product_price: Some(24.99),
            brand_tone: "modern".to_string(),
            template: "Modern".to_string(),
            target_audience: None,
            shop_goal: "conversion".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_llm_response_is_used() {
        let llm = CannedLlm(Ok(r#"{
            "sections": [
                {"sectionId": "hero-split", "category": "hero", "position": 1,
                 "reasoning": "strong visual", "priority": "high"},
                {"sectionId": "cta-centered", "category": "cta", "position": 2,
                 "reasoning": "close the sale", "priority": "high"}
            ],
            "layout": {"structure": "Hero -> CTA", "pageCount": 1, "conversionFocus": "fast"},
            "reasoning": "short funnel"
        }"#));

        let layout = generate_optimized_layout(&llm, &context()).await;
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].section_id, "hero-split");
        assert_eq!(layout.sections[0].priority, Priority::High);
        assert_eq!(layout.layout.page_count, 1);
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_modern_default() {
        let llm = CannedLlm(Err(()));
        let layout = generate_optimized_layout(&llm, &context()).await;
        assert_eq!(layout.sections.len(), 5);
        assert!(layout
            .sections
            .iter()
            .all(|s| library::contains(&s.section_id)));
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back_by_tone() {
        let llm = CannedLlm(Ok("no json here"));
        let mut ctx = context();
        ctx.brand_tone = "elegant".to_string();
        let layout = generate_optimized_layout(&llm, &ctx).await;
        assert_eq!(layout.sections.len(), 4);
        assert_eq!(layout.sections[0].section_id, "hero-minimal");
    }

    #[test]
    fn test_default_layout_ids_all_exist_in_library() {
        for tone in ["modern", "elegant", "bold"] {
            let layout = default_layout(tone);
            for section in &layout.sections {
                assert!(library::contains(&section.section_id));
            }
        }
    }

    #[test]
    fn test_section_instances_shape() {
        let layout = default_layout("modern");
        let instances = section_instances(&layout.sections);
        let arr = instances.as_array().unwrap();
        assert_eq!(arr.len(), 5);

        let first = &arr[0];
        assert_eq!(first["type"], "hero-split");
        assert_eq!(first["visible"], true);
        assert_eq!(first["content"]["title"], "");
        assert_eq!(first["style"]["backgroundColor"], "transparent");
        assert!(first["id"]
            .as_str()
            .unwrap()
            .starts_with("hero-split-"));
    }

    #[test]
    fn test_instance_ids_are_distinct() {
        let layout = default_layout("modern");
        let instances = section_instances(&layout.sections);
        let ids: Vec<&str> = instances
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_prompt_includes_catalog_and_context() {
        let prompt = build_layout_prompt(&context());
        assert!(prompt.contains("Solar Lantern"));
        assert!(prompt.contains("hero-split"));
        assert!(prompt.contains("Category: Home"));
        assert!(prompt.contains("Goal: conversion"));
    }
}
