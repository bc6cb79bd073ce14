//! Axum route handlers for image generation and the AI image prompt helper.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::images::generator::{
    enhance_product_image, generate_product_image, generate_product_image_set,
    ImageGenerationOptions,
};
use crate::llm_client::CompletionOptions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImagesRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub variant: Option<crate::models::product::ProductVariant>,
    pub style: Option<String>,
    pub aspect_ratio: Option<String>,
    pub background_color: Option<String>,
    #[serde(default = "default_image_count")]
    pub count: usize,
}

fn default_image_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceImageRequest {
    pub image_url: Option<String>,
    #[serde(default)]
    pub upscale: bool,
    #[serde(default)]
    pub remove_background: bool,
    #[serde(default)]
    pub adjust_colors: bool,
}

#[derive(Debug, Deserialize)]
pub struct AiImageRequest {
    pub prompt: Option<String>,
    pub context: Option<AiImageContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiImageContext {
    pub style: Option<String>,
    pub mood: Option<String>,
    pub product_type: Option<String>,
}

/// POST /api/images/generate
///
/// Generates one image, or a set of up to four angle/style variations when
/// `count > 1`.
pub async fn handle_generate_images(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<GenerateImagesRequest>,
) -> Result<Json<Value>, AppError> {
    let product_name = request
        .product_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Product name is required".to_string()))?;

    let options = ImageGenerationOptions {
        product_name,
        description: request.description,
        category: request.category,
        variant: request.variant,
        style: request.style.unwrap_or_else(|| "professional".to_string()),
        aspect_ratio: request.aspect_ratio.unwrap_or_else(|| "1:1".to_string()),
        background_color: request.background_color,
    };

    info!(
        "Generating {} image(s) for: {}",
        request.count, options.product_name
    );

    let images = if request.count > 1 {
        generate_product_image_set(state.llm.as_ref(), &options, request.count).await
    } else {
        vec![generate_product_image(state.llm.as_ref(), &options).await]
    };

    Ok(Json(json!({
        "success": true,
        "count": images.len(),
        "images": images,
    })))
}

/// PUT /api/images/generate
///
/// Image enhancement passthrough until a provider is wired up.
pub async fn handle_enhance_image(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<EnhanceImageRequest>,
) -> Result<Json<Value>, AppError> {
    let image_url = request
        .image_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("Image URL is required".to_string()))?;

    info!(
        "Enhancement requested (upscale: {}, remove_background: {}, adjust_colors: {})",
        request.upscale, request.remove_background, request.adjust_colors
    );

    let enhanced_url = enhance_product_image(&image_url).await;

    Ok(Json(json!({
        "success": true,
        "originalUrl": image_url,
        "enhancedUrl": enhanced_url,
    })))
}

/// GET /api/images/generate
///
/// The available style catalog.
pub async fn handle_image_styles(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "styles": [
            {
                "id": "realistic",
                "name": "Realistic",
                "description": "High-quality realistic photo",
                "example": "https://placehold.co/200x200/3498DB/FFFFFF?text=Realistic",
            },
            {
                "id": "minimalist",
                "name": "Minimalist",
                "description": "Clean white background, e-commerce style",
                "example": "https://placehold.co/200x200/FFFFFF/333333?text=Minimalist",
            },
            {
                "id": "professional",
                "name": "Professional",
                "description": "Professional studio lighting",
                "example": "https://placehold.co/200x200/F5F5F5/333333?text=Pro",
            },
            {
                "id": "lifestyle",
                "name": "Lifestyle",
                "description": "Product shown in use",
                "example": "https://placehold.co/200x200/E74C3C/FFFFFF?text=Lifestyle",
            },
            {
                "id": "studio",
                "name": "Studio",
                "description": "Studio lighting with shadows",
                "example": "https://placehold.co/200x200/2C3E50/FFFFFF?text=Studio",
            },
        ]
    })))
}

/// POST /api/ai/generate-image
///
/// LLM-assisted prompt construction plus a placeholder image URL.
pub async fn handle_ai_generate_image(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<AiImageRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("A prompt is required to generate an image".to_string())
        })?;

    let context = request.context;
    let style = context
        .as_ref()
        .and_then(|c| c.style.clone())
        .unwrap_or_else(|| "modern and professional".to_string());
    let mood = context
        .as_ref()
        .and_then(|c| c.mood.clone())
        .unwrap_or_else(|| "bright and welcoming".to_string());
    let product_type = context
        .as_ref()
        .and_then(|c| c.product_type.clone())
        .unwrap_or_else(|| "e-commerce".to_string());

    let optimization_request = format!(
        "Write a VERY DETAILED prompt, in English, for generating a high-quality \
        image from this description:\n\"{prompt}\"\n\n\
        Additional context:\n- Desired style: {style}\n- Mood: {mood}\n\
        - Product type: {product_type}\n\n\
        The prompt must cover visual composition, dominant colors, lighting, \
        artistic style, and important details. Respond ONLY with the prompt."
    );

    let opts = CompletionOptions {
        system: None,
        max_tokens: 500,
        temperature: 0.7,
    };

    let optimized_prompt = state
        .llm
        .complete(&optimization_request, &opts)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let label: String = prompt.chars().take(50).collect();
    let encoded =
        percent_encoding::utf8_percent_encode(&label, percent_encoding::NON_ALPHANUMERIC);
    let image_url = format!("https://placehold.co/1200x800/ea580c/ffffff?text={encoded}");

    Ok(Json(json!({
        "success": true,
        "imageUrl": image_url,
        "optimizedPrompt": optimized_prompt,
    })))
}
