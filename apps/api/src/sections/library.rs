//! The fixed library of visual sections the orchestrator can pick from.
//!
//! Every candidate the LLM may select is described here; the catalog text is
//! rendered into the selection prompt verbatim.

/// A selectable section template.
#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub use_cases: &'static [&'static str],
    pub complexity: &'static str,
    pub popular: bool,
}

pub struct SectionCategory {
    pub key: &'static str,
    pub sections: &'static [SectionDef],
}

const HERO: &[SectionDef] = &[
    SectionDef {
        id: "hero-centered",
        name: "Centered Hero",
        description: "Hero section with centered content, ideal for a strong message",
        use_cases: &["premium product", "luxury brand", "important message"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "hero-split",
        name: "Split Hero",
        description: "Hero split into 2 columns (text + image)",
        use_cases: &["product with strong visual", "classic e-commerce"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "hero-video",
        name: "Video Hero",
        description: "Hero with video background",
        use_cases: &["tech product", "dynamic demonstration"],
        complexity: "medium",
        popular: false,
    },
    SectionDef {
        id: "hero-gradient",
        name: "Gradient Hero",
        description: "Hero with a modern color gradient",
        use_cases: &["modern brand", "tech startup", "innovative product"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "hero-minimal",
        name: "Minimal Hero",
        description: "Minimalist hero with plenty of white space",
        use_cases: &["elegant brand", "design product", "fashion"],
        complexity: "simple",
        popular: false,
    },
];

const FEATURES: &[SectionDef] = &[
    SectionDef {
        id: "features-3-columns",
        name: "Features 3 Columns",
        description: "3 columns of features with icons",
        use_cases: &["products with 3-6 features", "services"],
        complexity: "simple",
        popular: true,
    },
    SectionDef {
        id: "features-2-columns",
        name: "Features 2 Columns",
        description: "2 columns of features, more detailed",
        use_cases: &["products with key features", "comparison"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "features-4-columns",
        name: "Features 4 Columns",
        description: "4 compact columns for many features",
        use_cases: &["complex products", "SaaS with many functions"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "features-alternating",
        name: "Alternating Features",
        description: "Alternating image-text layout for detailed presentation",
        use_cases: &["product storytelling", "in-depth explanation"],
        complexity: "medium",
        popular: true,
    },
    SectionDef {
        id: "features-cards",
        name: "Feature Cards",
        description: "Cards with shadows and hover effects",
        use_cases: &["modern products", "premium UX"],
        complexity: "medium",
        popular: false,
    },
];

const HOW_IT_WORKS: &[SectionDef] = &[
    SectionDef {
        id: "how-it-works-numbered",
        name: "Numbered Steps",
        description: "Process in 3 numbered steps",
        use_cases: &["simple process", "usage guide"],
        complexity: "simple",
        popular: true,
    },
    SectionDef {
        id: "how-it-works-timeline",
        name: "Vertical Timeline",
        description: "Timeline with visual connectors",
        use_cases: &["customer journey", "product evolution"],
        complexity: "medium",
        popular: false,
    },
    SectionDef {
        id: "how-it-works-flow",
        name: "Process Flow",
        description: "Flow with arrows and connections",
        use_cases: &["complex workflow", "integrations"],
        complexity: "medium",
        popular: false,
    },
];

const TESTIMONIALS: &[SectionDef] = &[
    SectionDef {
        id: "testimonials-carousel",
        name: "Testimonials Carousel",
        description: "Scrolling carousel of testimonials",
        use_cases: &["many testimonials", "social proof"],
        complexity: "medium",
        popular: true,
    },
    SectionDef {
        id: "testimonials-grid",
        name: "Testimonials Grid",
        description: "Grid of 3-6 testimonials",
        use_cases: &["show several reviews", "credibility"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "testimonials-stars",
        name: "Testimonials with Stars",
        description: "Focus on ratings and reviews",
        use_cases: &["high ratings", "customer satisfaction"],
        complexity: "simple",
        popular: false,
    },
];

const FAQ: &[SectionDef] = &[
    SectionDef {
        id: "faq-accordion",
        name: "FAQ Accordion",
        description: "FAQ with expandable accordion",
        use_cases: &["many questions", "customer support"],
        complexity: "simple",
        popular: true,
    },
    SectionDef {
        id: "faq-two-columns",
        name: "FAQ 2 Columns",
        description: "FAQ organized in 2 columns",
        use_cases: &["short FAQs", "clear organization"],
        complexity: "simple",
        popular: false,
    },
];

const CTA: &[SectionDef] = &[
    SectionDef {
        id: "cta-centered",
        name: "Centered CTA",
        description: "Centered call-to-action with a primary button",
        use_cases: &["final conversion", "signup", "purchase"],
        complexity: "simple",
        popular: true,
    },
    SectionDef {
        id: "cta-banner",
        name: "CTA Banner",
        description: "Full-width CTA banner",
        use_cases: &["promotion", "urgency", "limited offer"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "cta-split",
        name: "Split CTA",
        description: "CTA with 2 options side by side",
        use_cases: &["2 offers", "free trial vs paid"],
        complexity: "simple",
        popular: false,
    },
];

const SOCIAL: &[SectionDef] = &[
    SectionDef {
        id: "social-proof-logos",
        name: "Client Logos",
        description: "Strip of client/partner logos",
        use_cases: &["known brands", "B2B credibility"],
        complexity: "simple",
        popular: false,
    },
    SectionDef {
        id: "social-proof-stats",
        name: "Statistics",
        description: "Key figures and metrics",
        use_cases: &["quantifiable proof", "growth"],
        complexity: "simple",
        popular: false,
    },
];

pub const CATEGORIES: &[SectionCategory] = &[
    SectionCategory {
        key: "hero",
        sections: HERO,
    },
    SectionCategory {
        key: "features",
        sections: FEATURES,
    },
    SectionCategory {
        key: "howItWorks",
        sections: HOW_IT_WORKS,
    },
    SectionCategory {
        key: "testimonials",
        sections: TESTIMONIALS,
    },
    SectionCategory {
        key: "faq",
        sections: FAQ,
    },
    SectionCategory {
        key: "cta",
        sections: CTA,
    },
    SectionCategory {
        key: "social",
        sections: SOCIAL,
    },
];

/// True when `id` names a section in the library.
pub fn contains(id: &str) -> bool {
    CATEGORIES
        .iter()
        .flat_map(|c| c.sections)
        .any(|s| s.id == id)
}

/// Renders the library as the catalog block of the selection prompt.
pub fn catalog_text() -> String {
    let mut out = String::new();
    for category in CATEGORIES {
        out.push_str(&format!(
            "\n## Category: {}\n",
            category.key.to_uppercase()
        ));
        for section in category.sections {
            out.push_str(&format!(
                "- ID: \"{}\"\n  Name: {}\n  Description: {}\n  Use cases: {}\n  Complexity: {}\n{}\n",
                section.id,
                section.name,
                section.description,
                section.use_cases.join(", "),
                section.complexity,
                if section.popular { "  POPULAR\n" } else { "" },
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_has_seven_categories() {
        assert_eq!(CATEGORIES.len(), 7);
    }

    #[test]
    fn test_contains_known_and_unknown_ids() {
        assert!(contains("hero-split"));
        assert!(contains("cta-centered"));
        assert!(!contains("hero-imaginary"));
    }

    #[test]
    fn test_section_ids_are_unique() {
        let mut ids: Vec<&str> = CATEGORIES
            .iter()
            .flat_map(|c| c.sections)
            .map(|s| s.id)
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_catalog_text_lists_every_section() {
        let catalog = catalog_text();
        for section in CATEGORIES.iter().flat_map(|c| c.sections) {
            assert!(catalog.contains(section.id), "missing {}", section.id);
        }
        assert!(catalog.contains("## Category: HERO"));
    }

    #[test]
    fn test_catalog_text_shows_complexity_and_popularity() {
        let catalog = catalog_text();
        assert!(catalog.contains("Complexity: medium"));
        assert!(catalog.contains("POPULAR"));
    }
}
