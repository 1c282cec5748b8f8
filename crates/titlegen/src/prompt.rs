use crate::pipeline::TitleGenError;

/// Attributes a seller supplies for a listing. Only `name` is required;
/// the optional fields enrich the prompt when present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductAttributes {
    pub name: String,
    pub colour: Option<String>,
    pub size: Option<String>,
    pub material: Option<String>,
    pub pack: Option<String>,
    pub features: Option<String>,
}

impl ProductAttributes {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Render the instruction prompt for the completion service. Deterministic
/// over its inputs; fails only when the product name is missing.
pub fn build_prompt(attrs: &ProductAttributes, market: &str) -> Result<String, TitleGenError> {
    let name = attrs.name.trim();
    if name.is_empty() {
        return Err(TitleGenError::EmptyProductName);
    }

    let mut attribute_block = format!("Product Name: {name}");
    for (label, value) in [
        ("Colour", &attrs.colour),
        ("Size", &attrs.size),
        ("Material", &attrs.material),
        ("Pack", &attrs.pack),
        ("Key Features", &attrs.features),
    ] {
        if let Some(value) = value.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            attribute_block.push_str(&format!("\n{label}: {value}"));
        }
    }

    Ok(format!(
        r#"You are a professional marketplace SEO listing expert for {market}.
Generate 3 optimized and unique product titles for this product:

{attribute_block}

Strict Title Rules:
--------------------------------------------------------
Language: British English ({market} - use "Colour" instead of "Color")
Each title must be 90-120 characters
Every title must have a different structure - vary word order and phrasing
Do NOT repeat the same key phrases or structure across titles

Title format: [Brand] [Product Type] [Key Feature] [Size/Colour/Pack]
Use Title Case (Capitalize Each Word)
Keep the most important keywords in the first 60 characters
Include relevant search terms customers would use
Output only:
1. ...
2. ...
3. ...

Do NOT include:
- Promotional terms (Buy Now, Offer, Deal, Discount, Free Shipping, Sale, Best Price)
- Condition words (New, Used, Refurbished, Pre-Owned)
- Subjective adjectives (Beautiful, Stylish, Perfect, Premium, High Quality)
- Emojis or symbols (!@#$%^&*)
- ALL CAPS
- Repeated or meaningless filler words

Example good titles:
1. LEDSONE 18W Ceiling LED Light Round Warm White - Energy Saving Indoor Lighting
2. Samsung 25W Fast Charger Type-C - Original Adaptive Power Adapter for Galaxy Series
3. Philips LED Bulb 12W B22 Base - Cool Daylight Energy Efficient Pack of 2
--------------------------------------------------------"#
    ))
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, ProductAttributes};
    use crate::pipeline::TitleGenError;

    #[test]
    fn prompt_embeds_name_and_market() {
        let attrs = ProductAttributes::named("LED Ceiling Light");
        let prompt = build_prompt(&attrs, "Sri Lanka").expect("valid prompt");

        assert!(prompt.contains("Product Name: LED Ceiling Light"));
        assert!(prompt.contains("listing expert for Sri Lanka"));
        assert!(prompt.contains("90-120 characters"));
    }

    #[test]
    fn optional_attributes_render_only_when_present() {
        let attrs = ProductAttributes {
            name: "LED Ceiling Light".to_string(),
            colour: Some("Warm White".to_string()),
            size: Some("  ".to_string()),
            ..ProductAttributes::default()
        };
        let prompt = build_prompt(&attrs, "Sri Lanka").expect("valid prompt");

        assert!(prompt.contains("Colour: Warm White"));
        assert!(!prompt.contains("Size:"));
        assert!(!prompt.contains("Material:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let attrs = ProductAttributes {
            name: "LED Ceiling Light".to_string(),
            colour: Some("Warm White".to_string()),
            pack: Some("Pack of 2".to_string()),
            ..ProductAttributes::default()
        };

        let first = build_prompt(&attrs, "Sri Lanka").expect("valid prompt");
        let second = build_prompt(&attrs, "Sri Lanka").expect("valid prompt");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_name_is_rejected_before_any_work() {
        let attrs = ProductAttributes::named("   ");
        let result = build_prompt(&attrs, "Sri Lanka");
        assert!(matches!(result, Err(TitleGenError::EmptyProductName)));
    }
}
