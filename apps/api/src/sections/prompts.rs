// LLM prompt constants for layout orchestration.

/// System prompt for layout selection. Enforces JSON-only output.
pub const LAYOUT_SYSTEM: &str =
    "You are an expert e-commerce shop designer with 10 years of experience. \
    Your job is to select and order the BEST sections to build a shop that CONVERTS. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Layout selection prompt template.
/// Replace: {product_name}, {product_description}, {product_details},
///          {brand_tone}, {template}, {shop_goal}, {catalog}
pub const LAYOUT_PROMPT_TEMPLATE: &str = r#"# PROJECT CONTEXT

Product: {product_name}
Description: {product_description}
{product_details}Brand tone: {brand_tone}
Template: {template}
Goal: {shop_goal}

# AVAILABLE SECTION LIBRARY

{catalog}

# GOLDEN RULES

1. Effective page structure: a good shop has 5-8 sections maximum (no more!)
2. Logical flow: Hero -> Features -> How it Works -> Social Proof -> CTA
3. Conversion first: always include strategic CTAs
4. Visual consistency: sections must match the brand tone
5. Mobile-first: prefer simple, clear sections
6. Social proof: testimonials or stats when relevant
7. Answer objections: FAQ for complex products

# YOUR MISSION

Select 5-8 sections from the library above to build an OPTIMIZED shop.

For each selected section, provide:
- The exact ID (copied from the library)
- The category
- The position (1 = top, 8 = bottom)
- The reasoning (why this section for THIS product)
- The priority (high/medium/low)

Respond with this JSON shape:
{
  "sections": [
    {
      "sectionId": "hero-split",
      "category": "hero",
      "position": 1,
      "reasoning": "Split hero is perfect to showcase the strong product image",
      "priority": "high"
    }
  ],
  "layout": {
    "structure": "Hero -> Features -> CTA",
    "pageCount": 1,
    "conversionFocus": "Direct purchase with strategic CTA buttons"
  },
  "reasoning": "Minimalist layout focused on fast conversion."
}

IMPORTANT:
- Use EXACTLY the IDs from the library (copy them verbatim)
- Maximum 8 sections
- Always start with a Hero (position 1)
- Usually end with a CTA (last position)

Now generate the optimal layout for this product:"#;
