// All LLM prompt constants for product generation.

/// System prompt for product copy. Enforces JSON-only output.
pub const PRODUCT_COPY_SYSTEM: &str =
    "You are an expert e-commerce copywriter for African online stores. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Color variation prompt. Replace `{base_name}`, `{base_description}`,
/// `{base_price}`, `{currency}`, `{color}`, `{tone}`, `{target_market}`.
pub const COLOR_PROMPT_TEMPLATE: &str = r#"Generate a variation of the product "{base_name}" in the color {color}.

Base product:
- Name: {base_name}
- Description: {base_description}
- Price: {base_price} {currency}

Instructions:
1. Create a new product name that includes the color {color}
2. Adapt the description to highlight this color
3. Keep the same style and technical characteristics
4. Tone: {tone}
5. Target market: {target_market}

Respond with JSON (no markdown):
{
  "name": "Product name with color",
  "description": "Adapted description (2-3 sentences)",
  "tags": ["tag1", "tag2", "tag3"]
}"#;

/// Model-tier variation prompt. Replace `{base_name}`, `{base_description}`,
/// `{base_price}`, `{currency}`, `{model}`, `{tone}`, `{target_market}`.
pub const MODEL_PROMPT_TEMPLATE: &str = r#"Generate a "{model}" edition of the product "{base_name}".

Base product:
- Name: {base_name}
- Description: {base_description}
- Price: {base_price} {currency}

Instructions:
1. Create a name that includes "{model}"
2. Adapt the description to justify this edition (extra capabilities)
3. Tone: {tone}
4. Target market: {target_market}

Respond with JSON (no markdown):
{
  "name": "Product name {model}",
  "description": "Description with the {model} edition's advantages",
  "tags": ["tag1", "tag2", "tag3"]
}"#;

/// Bundle prompt. Replace `{base_name}`, `{base_description}`,
/// `{base_price}`, `{currency}`, `{bundle}`, `{tone}`.
pub const BUNDLE_PROMPT_TEMPLATE: &str = r#"Generate a "{bundle}" based on "{base_name}".

Base product:
- Name: {base_name}
- Description: {base_description}
- Price: {base_price} {currency}

Instructions:
1. Create an attractive bundle name
2. Describe what the bundle includes
3. Justify the savings
4. Tone: {tone}

Respond with JSON (no markdown):
{
  "name": "Bundle name",
  "description": "Description of the bundle contents",
  "tags": ["pack", "bundle", "savings"]
}"#;

/// Premium prompt. Replace `{base_name}`, `{base_description}`,
/// `{base_price}`, `{currency}`, `{tone}`.
pub const PREMIUM_PROMPT_TEMPLATE: &str = r#"Generate a high-end PREMIUM version of "{base_name}".

Base product:
- Name: {base_name}
- Description: {base_description}
- Price: {base_price} {currency}

Instructions:
1. Create a luxurious, premium name
2. Add premium materials/capabilities
3. Justify the higher price
4. Tone: {tone}

Respond with JSON (no markdown):
{
  "name": "Premium name",
  "description": "Upscale description with premium arguments",
  "tags": ["premium", "luxury", "quality"]
}"#;
