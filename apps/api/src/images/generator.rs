//! Image Generator: LLM-assisted prompt construction plus placeholder URLs.
//!
//! Real image generation is delegated to a provider that is not wired up
//! yet; until then every image is a placehold.co URL colored by variant.
//! Prompt optimization still runs through the LLM adapter so the optimized
//! prompt ships with each image for the eventual provider call.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{CompletionOptions, LlmProvider};
use crate::models::product::ProductVariant;

const IMAGE_PROMPT_SYSTEM: &str =
    "You are an expert at writing prompts for e-commerce product image generation. \
    Respond ONLY with the optimized prompt, in English, no quotes, no explanations.";

/// Pause between consecutive prompt-optimization calls when generating a set.
const PACING_MS: u64 = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationOptions {
    pub product_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub variant: Option<ProductVariant>,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    pub background_color: Option<String>,
}

fn default_style() -> String {
    "professional".to_string()
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub url: String,
    pub prompt: String,
    pub optimized_prompt: String,
    pub style: String,
    pub provider: String,
    pub generated_at: DateTime<Utc>,
}

/// Asks the LLM for an optimized English art prompt; falls back to a
/// deterministic prompt when the call fails.
pub async fn optimize_image_prompt(
    llm: &dyn LlmProvider,
    options: &ImageGenerationOptions,
) -> String {
    let mut request = format!(
        "Write a detailed, optimized prompt for generating a high-quality \
        e-commerce product image.\n\nProduct:\n- Name: {}\n",
        options.product_name
    );
    if let Some(description) = &options.description {
        request.push_str(&format!("- Description: {description}\n"));
    }
    if let Some(category) = &options.category {
        request.push_str(&format!("- Category: {category}\n"));
    }
    if let Some(variant) = &options.variant {
        request.push_str(&format!("- Variant: {} - {}\n", variant.kind, variant.value));
    }
    request.push_str(&format!(
        "\nDesired style: {}\n\nThe prompt must describe the product precisely, \
        specify professional lighting and a clean neutral background, and mention \
        high quality (4K, professional photography). Keep it to 1-2 sentences.",
        options.style
    ));

    let opts = CompletionOptions {
        system: Some(IMAGE_PROMPT_SYSTEM.to_string()),
        max_tokens: 300,
        temperature: 0.7,
    };

    match llm.complete(&request, &opts).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Image prompt optimization failed, using fallback: {e}");
            fallback_prompt(options)
        }
    }
}

/// Deterministic prompt used when the LLM is unavailable.
pub fn fallback_prompt(options: &ImageGenerationOptions) -> String {
    let mut prompt = options.product_name.clone();

    if let Some(variant) = &options.variant {
        prompt.push_str(&format!(" in {} color", variant.value));
    }

    let style_description = match options.style.as_str() {
        "realistic" => "photorealistic product photography",
        "minimalist" => "minimalist product photography on white background",
        "lifestyle" => "lifestyle product photography in use",
        "studio" => "studio lighting professional product shot",
        _ => "professional studio product photography",
    };

    prompt.push_str(&format!(
        ", {style_description}, high quality, 4K, clean background"
    ));
    prompt
}

/// Generates one product image (placeholder URL + optimized prompt).
pub async fn generate_product_image(
    llm: &dyn LlmProvider,
    options: &ImageGenerationOptions,
) -> GeneratedImage {
    let optimized_prompt = optimize_image_prompt(llm, options).await;

    let prompt = match &options.variant {
        Some(variant) => format!("{} - {}", options.product_name, variant.value),
        None => options.product_name.clone(),
    };

    GeneratedImage {
        url: placeholder_image_url(options),
        prompt,
        optimized_prompt,
        style: options.style.clone(),
        provider: "placeholder".to_string(),
        generated_at: Utc::now(),
    }
}

/// Generates up to four images with varied angles and styles.
pub async fn generate_product_image_set(
    llm: &dyn LlmProvider,
    options: &ImageGenerationOptions,
    count: usize,
) -> Vec<GeneratedImage> {
    const ANGLES: [&str; 4] = ["front view", "side view", "detail view", "lifestyle"];
    const STYLES: [&str; 4] = ["professional", "minimalist", "lifestyle", "studio"];

    let mut images = Vec::new();
    for i in 0..count.min(4) {
        if i > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(PACING_MS)).await;
        }
        let variation = ImageGenerationOptions {
            product_name: format!("{} - {}", options.product_name, ANGLES[i]),
            style: STYLES[i].to_string(),
            ..options.clone()
        };
        images.push(generate_product_image(llm, &variation).await);
    }
    images
}

/// Enhancement (upscale, background removal, color adjustment) is a pending
/// provider integration; the original URL passes through unchanged.
pub async fn enhance_product_image(image_url: &str) -> String {
    image_url.to_string()
}

/// Builds a placehold.co URL colored by the variant (or the supplied
/// background), with a luminance-contrasted text color.
pub fn placeholder_image_url(options: &ImageGenerationOptions) -> String {
    let mut background = options
        .background_color
        .as_deref()
        .map(|c| c.trim_start_matches('#').to_string())
        .unwrap_or_else(|| "F5F5F5".to_string());

    if let Some(variant) = &options.variant {
        if variant.kind == "color" {
            if let Some(hex) = color_hex(&variant.value) {
                background = hex.to_string();
            }
        }
    }

    let text_color = contrast_color(&background);
    let (width, height) = dimensions(&options.aspect_ratio);
    let label: String = options.product_name.chars().take(30).collect();
    let encoded = utf8_percent_encode(&label, NON_ALPHANUMERIC).to_string();

    format!("https://placehold.co/{width}x{height}/{background}/{text_color}?text={encoded}")
}

fn dimensions(aspect_ratio: &str) -> (u32, u32) {
    match aspect_ratio {
        "4:3" => (800, 600),
        "16:9" => (1280, 720),
        _ => (800, 800),
    }
}

fn color_hex(color: &str) -> Option<&'static str> {
    match color.to_lowercase().as_str() {
        "black" => Some("2C3E50"),
        "white" => Some("ECF0F1"),
        "red" => Some("E74C3C"),
        "blue" => Some("3498DB"),
        "pink" => Some("E91E63"),
        "green" => Some("27AE60"),
        "purple" => Some("9B59B6"),
        "orange" => Some("E67E22"),
        "yellow" => Some("F1C40F"),
        "gray" => Some("95A5A6"),
        _ => None,
    }
}

/// Picks black or white text by background luminance.
fn contrast_color(hex: &str) -> &'static str {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u32::from_str_radix(s, 16).ok())
            .unwrap_or(0) as f64
    };
    let r = channel(0..2);
    let g = channel(2..4);
    let b = channel(4..6);

    let luminance = (0.299 * r + 0.587 * g + 0.114 * b) / 255.0;
    if luminance > 0.5 {
        "333333"
    } else {
        "FFFFFF"
    }
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

    fn options() -> ImageGenerationOptions {
        ImageGenerationOptions {
            product_name: "Solar Lantern".to_string(),
            description: Some("Rechargeable lantern".to_string()),
            category: Some("Home".to_string()),
            variant: Some(ProductVariant {
                kind: "color".to_string(),
                value: "Black".to_string(),
            }),
            style: "professional".to_string(),
            aspect_ratio: "1:1".to_string(),
            background_color: None,
        }
    }

    #[test]
    fn test_placeholder_url_uses_variant_color() {
        let url = placeholder_image_url(&options());
        assert!(url.starts_with("https://placehold.co/800x800/2C3E50/"));
        assert!(url.contains("Solar%20Lantern"));
    }

    #[test]
    fn test_placeholder_dimensions_follow_aspect_ratio() {
        let mut opts = options();
        opts.aspect_ratio = "16:9".to_string();
        assert!(placeholder_image_url(&opts).contains("/1280x720/"));
        opts.aspect_ratio = "1:1".to_string();
        assert!(placeholder_image_url(&opts).contains("/800x800/"));
    }

    #[test]
    fn test_placeholder_url_ignores_non_color_variant() {
        let mut opts = options();
        opts.variant = Some(ProductVariant {
            kind: "model".to_string(),
            value: "Pro".to_string(),
        });
        let url = placeholder_image_url(&opts);
        assert!(url.contains("/F5F5F5/"));
    }

    #[test]
    fn test_contrast_color_flips_on_luminance() {
        assert_eq!(contrast_color("ECF0F1"), "333333"); // light background
        assert_eq!(contrast_color("2C3E50"), "FFFFFF"); // dark background
    }

    #[test]
    fn test_fallback_prompt_mentions_variant_and_style() {
        let prompt = fallback_prompt(&options());
        assert!(prompt.contains("Solar Lantern"));
        assert!(prompt.contains("in Black color"));
        assert!(prompt.contains("professional studio product photography"));
        assert!(prompt.contains("4K"));
    }

    #[tokio::test]
    async fn test_generate_image_uses_llm_prompt() {
        let llm = CannedLlm(Ok("A black solar lantern on a white sweep, studio lighting, 4K"));
        let image = generate_product_image(&llm, &options()).await;
        assert_eq!(image.provider, "placeholder");
        assert!(image.optimized_prompt.contains("studio lighting"));
        assert_eq!(image.prompt, "Solar Lantern - Black");
    }

    #[tokio::test]
    async fn test_generate_image_falls_back_when_llm_fails() {
        let llm = CannedLlm(Err(()));
        let image = generate_product_image(&llm, &options()).await;
        assert!(image.optimized_prompt.contains("clean background"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_set_caps_at_four_with_varied_styles() {
        let llm = CannedLlm(Ok("prompt"));
        let images = generate_product_image_set(&llm, &options(), 10).await;
        assert_eq!(images.len(), 4);
        let styles: Vec<&str> = images.iter().map(|i| i.style.as_str()).collect();
        assert_eq!(
            styles,
            vec!["professional", "minimalist", "lifestyle", "studio"]
        );
        assert!(images[0].prompt.contains("front view"));
    }

    #[tokio::test]
    async fn test_enhance_returns_original_url() {
        let url = enhance_product_image("https://example.com/a.jpg").await;
        assert_eq!(url, "https://example.com/a.jpg");
    }
}
