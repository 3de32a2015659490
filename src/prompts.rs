//! Prompt construction. Everything here is a pure function of its arguments.

use crate::models::{GenerationOptions, NOT_AVAILABLE};
use serde_json::{Map, Value};

/// Field names the description prompt asks for; extraction fallbacks mirror them.
pub const DESCRIPTION_FIELDS: [&str; 5] = ["seo_title", "description", "features", "specifications", "keywords"];
pub const SEO_FIELDS: [&str; 4] = ["seo_title", "meta_description", "optimized_description", "alt_text"];

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn build_description_prompt(product: &Map<String, Value>, category: &str) -> String {
    build_description_prompt_with(product, category, &GenerationOptions::default())
}

pub fn build_description_prompt_with(product: &Map<String, Value>, category: &str, options: &GenerationOptions) -> String {
    let rating = product.get("rating").and_then(Value::as_object);
    let rate = render(rating.and_then(|r| r.get("rate")));
    let count = render(rating.and_then(|r| r.get("count")));

    format!(
        "Generate a comprehensive e-commerce product description for the following product:\n\
        \n\
        Product Information:\n\
        - Title: {title}\n\
        - Category: {category}\n\
        - Price: ${price}\n\
        - Current Description: {description}\n\
        - Image URL: {image}\n\
        - Rating: {rate} ({count} reviews)\n\
        \n\
        Please provide:\n\
        1. SEO-optimized product title (compelling and keyword-rich)\n\
        2. Detailed product description (3-4 paragraphs)\n\
        3. Key features (5-7 bullet points)\n\
        4. Technical specifications (if applicable)\n\
        5. Suggested keywords for SEO\n\
        \n\
        {guidelines}\n\
        Format the response as JSON with keys:\n\
        {fields}\n\
        \n\
        Make it engaging, informative, and optimized for e-commerce conversion.",
        title = render(product.get("title")),
        price = render(product.get("price")),
        description = render(product.get("description")),
        image = render(product.get("image")),
        guidelines = writing_guidelines(options),
        fields = DESCRIPTION_FIELDS.join(", "),
    )
}

fn writing_guidelines(options: &GenerationOptions) -> String {
    let mut lines = vec![
        "Writing guidelines:".to_string(),
        format!("- Tone: {}", options.tone.label()),
        format!("- Description length: {}", options.length.describe()),
        format!("- Target audience: {}", options.target_audience.label()),
    ];
    if !options.focus_keywords.is_empty() {
        lines.push(format!("- Focus keywords: {}", options.focus_keywords.join(", ")));
    }
    if options.include_specs {
        lines.push("- Include technical specifications".to_string());
    }
    if options.include_benefits {
        lines.push("- Emphasize benefits over features".to_string());
    }
    if options.include_cta {
        lines.push("- End the description with a call-to-action".to_string());
    }
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

pub fn build_seo_prompt(content: &str, keywords: &[String]) -> String {
    format!(
        "Optimize the following product content for SEO:\n\
        \n\
        Content: {content}\n\
        Target Keywords: {keywords}\n\
        \n\
        Please provide:\n\
        1. SEO-optimized title (under 60 characters)\n\
        2. Meta description (under 160 characters)\n\
        3. Improved product description with natural keyword integration\n\
        4. Suggested alt text for images\n\
        \n\
        Format as JSON with keys: {fields}",
        keywords = keywords.join(", "),
        fields = SEO_FIELDS.join(", "),
    )
}
