use crate::models::{ExportRequest, GeneratedContent};
use serde::Serialize;
use serde_json::{Map, Value};

/// Downloadable bundle of the source product, the generated copy and the user's final edits.
#[derive(Debug, Serialize, Clone)]
pub struct ExportBundle {
    pub original_product: Map<String, Value>,
    pub generated_content: GeneratedContent,
    pub final_title: String,
    pub final_description: String,
}

impl From<ExportRequest> for ExportBundle {
    fn from(req: ExportRequest) -> Self {
        let final_title = req.final_title.unwrap_or_else(|| req.generated_content.seo_title.clone());
        let final_description = req.final_description.unwrap_or_else(|| req.generated_content.description.clone());
        Self {
            original_product: req.original_product,
            generated_content: req.generated_content,
            final_title,
            final_description,
        }
    }
}

impl ExportBundle {
    pub fn file_name(&self) -> String {
        let id = match self.original_product.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => "unknown".to_string(),
        };
        format!("product_{}_description.json", id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
