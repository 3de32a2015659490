use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// One catalog entry, as served by the demo store (or the built-in samples).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl ProductRecord {
    /// Mapping form used by the prompt builder, which also accepts partial products.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Enthusiastic,
    Technical,
    Luxury,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Technical => "Technical",
            Tone::Luxury => "Luxury",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LengthBand {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthBand {
    /// Inclusive word range; `None` upper bound means open-ended.
    pub fn word_range(self) -> (u32, Option<u32>) {
        match self {
            LengthBand::Short => (100, Some(150)),
            LengthBand::Medium => (150, Some(250)),
            LengthBand::Long => (250, None),
        }
    }

    pub fn describe(self) -> String {
        match self.word_range() {
            (lo, Some(hi)) => format!("{lo}-{hi} words"),
            (lo, None) => format!("{lo}+ words"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    General,
    BudgetConscious,
    PremiumBuyers,
    TechEnthusiasts,
    FashionForward,
}

impl Audience {
    pub fn label(self) -> &'static str {
        match self {
            Audience::General => "General",
            Audience::BudgetConscious => "Budget-conscious",
            Audience::PremiumBuyers => "Premium buyers",
            Audience::TechEnthusiasts => "Tech enthusiasts",
            Audience::FashionForward => "Fashion-forward",
        }
    }
}

fn yes() -> bool { true }

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub length: LengthBand,
    #[serde(default)]
    pub focus_keywords: Vec<String>,
    #[serde(default)]
    pub target_audience: Audience,
    #[serde(default = "yes")]
    pub include_specs: bool,
    #[serde(default = "yes")]
    pub include_benefits: bool,
    #[serde(default = "yes")]
    pub include_cta: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            length: LengthBand::default(),
            focus_keywords: Vec::new(),
            target_audience: Audience::default(),
            include_specs: true,
            include_benefits: true,
            include_cta: true,
        }
    }
}

/// Marketing copy extracted from a description-generation run. All five fields are
/// always present; anything else the model sent is carried in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GeneratedContent {
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeoOptimizationResult {
    pub seo_title: String,
    pub meta_description: String,
    pub optimized_description: String,
    pub alt_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What an SEO run hands back: either the four fields, or the single `error` record
/// produced when the model's answer held no usable payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SeoOutcome {
    Optimized(SeoOptimizationResult),
    Unparsed { error: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerateDescriptionRequest {
    #[serde(default)]
    pub product_data: Option<Map<String, Value>>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

fn default_category() -> String { "general".to_string() }

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OptimizeSeoRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExportRequest {
    pub original_product: Map<String, Value>,
    pub generated_content: GeneratedContent,
    #[serde(default)]
    pub final_title: Option<String>,
    #[serde(default)]
    pub final_description: Option<String>,
}

/// Success envelope shared by the JSON endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data, degraded: None }
    }

    pub fn generated(data: T, degraded: bool) -> Self {
        Self { success: true, data, degraded: Some(degraded) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn options_default_from_empty_object() {
        let opts: GenerationOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, GenerationOptions::default());
        assert!(opts.include_cta);
    }

    #[test]
    fn options_accept_snake_case_enums() {
        let opts: GenerationOptions = serde_json::from_value(json!({
            "tone": "luxury",
            "length": "long",
            "target_audience": "premium_buyers",
            "include_specs": false
        }))
        .unwrap();
        assert_eq!(opts.tone, Tone::Luxury);
        assert_eq!(opts.length.describe(), "250+ words");
        assert_eq!(opts.target_audience.label(), "Premium buyers");
        assert!(!opts.include_specs);
    }

    #[test]
    fn product_without_optional_fields() {
        let p: ProductRecord = serde_json::from_value(json!({"id": 7, "title": "Mug", "price": 4.5})).unwrap();
        assert_eq!(p.description, "");
        assert!(p.rating.is_none());
        let fields = p.to_fields();
        assert_eq!(fields["title"], json!("Mug"));
        assert_eq!(fields["image"], Value::Null);
    }

    #[test]
    fn seo_outcome_serializes_flat() {
        let unparsed = SeoOutcome::Unparsed { error: "Invalid JSON response".into() };
        assert_eq!(serde_json::to_value(&unparsed).unwrap(), json!({"error": "Invalid JSON response"}));
    }
}
