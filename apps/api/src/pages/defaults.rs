//! Starter pages for a freshly set-up shop.
//!
//! `default_pages` is a pure function of the imported product data and the
//! brand color: Home, About, Products, Contact, each with pre-filled
//! sections. Exactly one page (Home) carries `is_home = true`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The slice of imported product data the starter pages are derived from.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A starter page before insertion (no ids, no ownership).
#[derive(Debug, Clone, Serialize)]
pub struct DefaultPage {
    pub name: String,
    pub slug: String,
    pub is_home: bool,
    pub sections: Value,
    pub meta_title: String,
    pub meta_description: String,
}

pub const DEFAULT_BRAND_COLOR: &str = "#ea580c";

/// Builds the four starter pages. Every page is created unpublished.
pub fn default_pages(product: &ProductData, brand_color: &str) -> Vec<DefaultPage> {
    let millis = Utc::now().timestamp_millis();
    let color = brand_color.trim_start_matches('#');
    let product_image = product
        .images
        .first()
        .cloned()
        .unwrap_or_else(|| format!("https://placehold.co/800x600/{color}/ffffff?text=Product"));

    vec![
        DefaultPage {
            name: "Home".to_string(),
            slug: "home".to_string(),
            is_home: true,
            meta_title: format!("{} - Online store", product.name),
            meta_description: clip(&product.description, 160),
            sections: json!([
                {
                    "id": "hero-1",
                    "uniqueId": format!("hero-1-{millis}"),
                    "name": "Main Hero",
                    "category": "hero-split",
                    "content": {
                        "title": product.name,
                        "subtitle": "Discover our product",
                        "description": product.description,
                        "buttonText": "Buy now",
                        "buttonLink": "#products",
                        "image": product_image,
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "white",
                        "textAlign": "left",
                        "containerWidth": "container",
                    },
                },
                {
                    "id": "features-1",
                    "uniqueId": format!("features-1-{millis}"),
                    "name": "Benefits",
                    "category": "features-3-columns",
                    "content": {
                        "title": "Why choose us?",
                        "subtitle": "The benefits",
                        "description": "See what makes us different",
                        "features": [
                            {
                                "icon": "CheckCircle",
                                "title": "Superior quality",
                                "description": "Carefully selected, high-quality products",
                            },
                            {
                                "icon": "Truck",
                                "title": "Fast delivery",
                                "description": "Shipped within 24h across Africa",
                            },
                            {
                                "icon": "Shield",
                                "title": "Satisfaction guarantee",
                                "description": "30-day money-back guarantee",
                            },
                        ],
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "muted",
                        "containerWidth": "container",
                    },
                },
                {
                    "id": "cta-1",
                    "uniqueId": format!("cta-1-{millis}"),
                    "name": "Call to action",
                    "category": "cta-centered",
                    "content": {
                        "title": "Ready to order?",
                        "description": format!(
                            "Get your {} today from {} {}",
                            product.name, product.price, product.currency
                        ),
                        "buttonText": "Order now",
                        "buttonLink": "#products",
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "primary",
                        "textAlign": "center",
                        "containerWidth": "narrow",
                    },
                },
            ]),
        },
        DefaultPage {
            name: "About".to_string(),
            slug: "about".to_string(),
            is_home: false,
            meta_title: "About us".to_string(),
            meta_description: "Discover our story and our mission".to_string(),
            sections: json!([
                {
                    "id": "hero-about",
                    "uniqueId": format!("hero-about-{millis}"),
                    "name": "About Hero",
                    "category": "hero-centered",
                    "content": {
                        "title": "Our story",
                        "subtitle": "About",
                        "description": "We care about quality and exceptional customer service",
                        "buttonText": "Contact us",
                        "buttonLink": "/contact",
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "white",
                        "textAlign": "center",
                        "containerWidth": "narrow",
                    },
                },
                {
                    "id": "mission-1",
                    "uniqueId": format!("mission-1-{millis}"),
                    "name": "Our mission",
                    "category": "features-alternating",
                    "content": {
                        "title": "Our mission",
                        "subtitle": "What drives us",
                        "description": "Bringing quality products to customers across Africa",
                        "features": [
                            {
                                "title": "Quality first",
                                "description": "Every product is rigorously selected",
                                "image": format!("https://placehold.co/600x400/{color}/ffffff?text=Quality"),
                            },
                            {
                                "title": "Customer service",
                                "description": "Our team is available 7 days a week",
                                "image": format!("https://placehold.co/600x400/{color}/ffffff?text=Service"),
                            },
                        ],
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "muted",
                        "containerWidth": "container",
                    },
                },
            ]),
        },
        DefaultPage {
            name: "Products".to_string(),
            slug: "products".to_string(),
            is_home: false,
            meta_title: "Our products".to_string(),
            meta_description: format!(
                "Discover our selection of {}",
                product.category.as_deref().unwrap_or("products")
            ),
            sections: json!([
                {
                    "id": "hero-products",
                    "uniqueId": format!("hero-products-{millis}"),
                    "name": "Products Hero",
                    "category": "hero-centered",
                    "content": {
                        "title": "Our products",
                        "subtitle": "Catalog",
                        "description": format!(
                            "Browse our range of {}",
                            product.category.as_deref().unwrap_or("quality products")
                        ),
                    },
                    "style": {
                        "paddingTop": "normal",
                        "paddingBottom": "normal",
                        "backgroundColor": "muted",
                        "textAlign": "center",
                        "containerWidth": "narrow",
                    },
                },
                {
                    "id": "product-showcase",
                    "uniqueId": format!("product-showcase-{millis}"),
                    "name": "Product showcase",
                    "category": "hero-split",
                    "content": {
                        "title": product.name,
                        "subtitle": format!("{} {}", product.price, product.currency),
                        "description": product.description,
                        "buttonText": "Buy",
                        "buttonLink": "#",
                        "image": product_image,
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "white",
                        "textAlign": "left",
                        "containerWidth": "container",
                    },
                },
                {
                    "id": "product-features",
                    "uniqueId": format!("product-features-{millis}"),
                    "name": "Key features",
                    "category": "features-3-columns",
                    "content": {
                        "title": "Key features",
                        "description": "What makes this product unique",
                        "features": [
                            { "icon": "Star", "title": "Premium", "description": "Superior quality, guaranteed" },
                            { "icon": "Zap", "title": "Performant", "description": "Exceptional results" },
                            { "icon": "Heart", "title": "Loved", "description": "Adored by our customers" },
                        ],
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "muted",
                        "containerWidth": "container",
                    },
                },
            ]),
        },
        DefaultPage {
            name: "Contact".to_string(),
            slug: "contact".to_string(),
            is_home: false,
            meta_title: "Contact us".to_string(),
            meta_description: "Reach out with any question or request".to_string(),
            sections: json!([
                {
                    "id": "hero-contact",
                    "uniqueId": format!("hero-contact-{millis}"),
                    "name": "Contact Hero",
                    "category": "hero-centered",
                    "content": {
                        "title": "Contact us",
                        "subtitle": "Customer support",
                        "description": "Our team is here to answer all your questions",
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "normal",
                        "backgroundColor": "white",
                        "textAlign": "center",
                        "containerWidth": "narrow",
                    },
                },
                {
                    "id": "contact-info",
                    "uniqueId": format!("contact-info-{millis}"),
                    "name": "Contact details",
                    "category": "features-3-columns",
                    "content": {
                        "title": "How to reach us",
                        "features": [
                            { "icon": "Envelope", "title": "Email", "description": "contact@yourshop.com" },
                            { "icon": "Phone", "title": "Phone", "description": "+225 XX XX XX XX XX" },
                            { "icon": "MapPin", "title": "Address", "description": "Abidjan, Ivory Coast" },
                        ],
                    },
                    "style": {
                        "paddingTop": "normal",
                        "paddingBottom": "large",
                        "backgroundColor": "muted",
                        "containerWidth": "container",
                    },
                },
                {
                    "id": "contact-cta",
                    "uniqueId": format!("contact-cta-{millis}"),
                    "name": "Contact CTA",
                    "category": "cta-centered",
                    "content": {
                        "title": "Have a question?",
                        "description": "Write to us and we'll reply within 24h",
                        "buttonText": "Send a message",
                        "buttonLink": "mailto:contact@yourshop.com",
                    },
                    "style": {
                        "paddingTop": "large",
                        "paddingBottom": "large",
                        "backgroundColor": "primary",
                        "textAlign": "center",
                        "containerWidth": "narrow",
                    },
                },
            ]),
        },
    ]
}

/// Truncates on a character boundary; meta descriptions cap at 160.
fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> ProductData {
        ProductData {
            name: "Solar Lantern".to_string(),
            description: "A rechargeable lantern. ".repeat(20),
            price: 24.99,
            currency: "USD".to_string(),
            category: Some("Home".to_string()),
            images: vec!["https://example.com/lantern.jpg".to_string()],
        }
    }

    #[test]
    fn test_generates_exactly_four_pages() {
        let pages = default_pages(&sample_product(), DEFAULT_BRAND_COLOR);
        assert_eq!(pages.len(), 4);
        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "about", "products", "contact"]);
    }

    #[test]
    fn test_exactly_one_home_page() {
        let pages = default_pages(&sample_product(), DEFAULT_BRAND_COLOR);
        let homes: Vec<&DefaultPage> = pages.iter().filter(|p| p.is_home).collect();
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].slug, "home");
    }

    #[test]
    fn test_meta_description_is_clipped_to_160() {
        let pages = default_pages(&sample_product(), DEFAULT_BRAND_COLOR);
        assert_eq!(pages[0].meta_description.chars().count(), 160);
    }

    #[test]
    fn test_product_image_flows_into_hero() {
        let pages = default_pages(&sample_product(), DEFAULT_BRAND_COLOR);
        let hero = &pages[0].sections[0];
        assert_eq!(hero["content"]["image"], "https://example.com/lantern.jpg");
        assert_eq!(hero["content"]["title"], "Solar Lantern");
    }

    #[test]
    fn test_missing_image_falls_back_to_brand_colored_placeholder() {
        let mut product = sample_product();
        product.images.clear();
        let pages = default_pages(&product, "#123abc");
        let image = pages[0].sections[0]["content"]["image"].as_str().unwrap();
        assert!(image.contains("123abc"));
        assert!(image.starts_with("https://placehold.co/"));
    }

    #[test]
    fn test_every_page_has_sections() {
        let pages = default_pages(&sample_product(), DEFAULT_BRAND_COLOR);
        for page in &pages {
            assert!(!page.sections.as_array().unwrap().is_empty());
        }
    }
}
