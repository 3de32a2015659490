//! Prompt → model → extraction, for both description generation and SEO optimization.
//!
//! Each call is independent. A model failure ends the run with an error before extraction;
//! extraction itself cannot fail, it only marks the result as degraded.

use crate::extract::{extract_description, extract_seo, Extraction};
use crate::gemini::{preview, GeminiError, TextGenerator};
use crate::models::{GeneratedContent, GenerationOptions, SeoOutcome};
use crate::prompts::{build_description_prompt_with, build_seo_prompt};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Model service error: {0}")]
    Model(#[from] GeminiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Prompting,
    Invoking,
    Extracting,
}

#[derive(Clone)]
pub struct ContentPipeline {
    model: Arc<dyn TextGenerator>,
}

impl ContentPipeline {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    pub async fn generate_description(
        &self,
        product: &Map<String, Value>,
        category: &str,
        options: &GenerationOptions,
    ) -> Result<Extraction<GeneratedContent>, PipelineError> {
        if product.is_empty() {
            return Err(PipelineError::InvalidInput("Product data is required".to_string()));
        }

        debug!(stage = ?Stage::Prompting, "description run");
        let prompt = build_description_prompt_with(product, category, options);

        let raw = self.invoke(&prompt).await?;

        debug!(stage = ?Stage::Extracting, "description run");
        let extraction = extract_description(&raw);
        info!(
            "✅ Description generated: {:?} ({} features, {} keywords, degraded={})",
            extraction.value.seo_title,
            extraction.value.features.len(),
            extraction.value.keywords.len(),
            extraction.is_degraded()
        );
        Ok(extraction)
    }

    pub async fn optimize_seo(&self, content: &str, keywords: &[String]) -> Result<Extraction<SeoOutcome>, PipelineError> {
        if content.is_empty() {
            return Err(PipelineError::InvalidInput("Content is required".to_string()));
        }

        debug!(stage = ?Stage::Prompting, "seo run");
        let prompt = build_seo_prompt(content, keywords);

        let raw = self.invoke(&prompt).await?;

        debug!(stage = ?Stage::Extracting, "seo run");
        let extraction = extract_seo(&raw);
        info!("✅ SEO optimization finished (degraded={})", extraction.is_degraded());
        Ok(extraction)
    }

    async fn invoke(&self, prompt: &str) -> Result<String, PipelineError> {
        debug!(stage = ?Stage::Invoking, "🎯 Prompt: {}", preview(prompt, 120));
        self.model.generate_text(prompt).await.map_err(|e| {
            error!("❌ Model call failed: {}", e);
            PipelineError::Model(e)
        })
    }
}
