//! Pulls a structured record out of free-form model output.
//!
//! The payload span runs from the first `{` to the last `}` in the text. That keeps nested
//! objects intact, but prose after the payload that itself contains `}` gets swallowed into
//! the span and the decode fails. Existing callers depend on that behaviour, so it stays.
//!
//! Extraction never fails: when no payload can be decoded a fixed placeholder record for
//! the requested schema comes back instead, flagged as degraded.

use crate::models::{GeneratedContent, SeoOptimizationResult, SeoOutcome, NOT_AVAILABLE};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const PLACEHOLDER_TITLE: &str = "Generated Product Title";
pub const NO_PAYLOAD_FEATURE: &str = "Feature extraction from response";
pub const MALFORMED_FEATURE: &str = "Unable to parse features";
pub const NO_PAYLOAD_KEYWORDS: [&str; 2] = ["product", "ecommerce"];
pub const MALFORMED_KEYWORDS: [&str; 1] = ["product"];
pub const SEO_NO_PAYLOAD_ERROR: &str = "Could not parse response";
pub const SEO_MALFORMED_ERROR: &str = "Invalid JSON response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Description,
    Seo,
}

/// Why the placeholder record was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// No `{` anywhere in the text.
    NoPayload,
    /// A span was found (or started) but did not decode as an object.
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Record(Map<String, Value>),
    Malformed(String),
    Absent,
}

/// First `{` through last `}` inclusive. `Err(())` means an opening brace exists but no
/// closing brace follows it.
fn payload_span(raw: &str) -> Option<Result<&str, ()>> {
    let start = raw.find('{')?;
    Some(match raw.rfind('}') {
        Some(end) if end >= start => Ok(&raw[start..=end]),
        _ => Err(()),
    })
}

pub fn decode_payload(raw: &str) -> Decoded {
    match payload_span(raw) {
        None => Decoded::Absent,
        Some(Err(())) => Decoded::Malformed("no closing brace after opening brace".to_string()),
        Some(Ok(span)) => match serde_json::from_str::<Map<String, Value>>(span) {
            Ok(record) => Decoded::Record(record),
            Err(e) => Decoded::Malformed(e.to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub value: T,
    pub fallback: Option<Fallback>,
}

impl<T> Extraction<T> {
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
        Extraction { value: f(self.value), fallback: self.fallback }
    }
}

/// Untyped extraction: the decoded record as-is, or the schema's placeholder record.
pub fn extract(raw: &str, schema: Schema) -> Extraction<Map<String, Value>> {
    let fallback = match decode_payload(raw) {
        Decoded::Record(record) => return Extraction { value: record, fallback: None },
        Decoded::Malformed(reason) => {
            tracing::warn!("⚠️ Model payload did not decode ({}); using placeholder", reason);
            Fallback::Malformed
        }
        Decoded::Absent => {
            tracing::warn!("⚠️ No structured payload in model output; using placeholder");
            Fallback::NoPayload
        }
    };
    Extraction { value: placeholder_record(raw, schema, fallback), fallback: Some(fallback) }
}

fn placeholder_record(raw: &str, schema: Schema, fallback: Fallback) -> Map<String, Value> {
    let value = match (schema, fallback) {
        (Schema::Description, Fallback::NoPayload) => serde_json::json!({
            "seo_title": PLACEHOLDER_TITLE,
            "description": raw,
            "features": [NO_PAYLOAD_FEATURE],
            "specifications": {},
            "keywords": NO_PAYLOAD_KEYWORDS,
        }),
        (Schema::Description, Fallback::Malformed) => serde_json::json!({
            "seo_title": PLACEHOLDER_TITLE,
            "description": raw,
            "features": [MALFORMED_FEATURE],
            "specifications": {},
            "keywords": MALFORMED_KEYWORDS,
        }),
        (Schema::Seo, Fallback::NoPayload) => serde_json::json!({ "error": SEO_NO_PAYLOAD_ERROR }),
        (Schema::Seo, Fallback::Malformed) => serde_json::json!({ "error": SEO_MALFORMED_ERROR }),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn extract_description(raw: &str) -> Extraction<GeneratedContent> {
    extract(raw, Schema::Description).map(content_from_record)
}

pub fn extract_seo(raw: &str) -> Extraction<SeoOutcome> {
    let extraction = extract(raw, Schema::Seo);
    match extraction.fallback {
        None => extraction.map(|record| SeoOutcome::Optimized(seo_from_record(record))),
        Some(_) => extraction.map(|mut record| SeoOutcome::Unparsed {
            error: match record.remove("error") {
                Some(Value::String(s)) => s,
                _ => SEO_MALFORMED_ERROR.to_string(),
            },
        }),
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn list_of(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter(|v| !v.is_null()).map(text_of).collect(),
        Value::Null => Vec::new(),
        other => vec![text_of(other)],
    }
}

fn spec_map_of(value: Value) -> BTreeMap<String, String> {
    match value {
        Value::Object(map) => map.into_iter().map(|(k, v)| (k, text_of(v))).collect(),
        _ => BTreeMap::new(),
    }
}

/// Coerces a decoded record into typed content. Known fields land in their slots
/// (absent ones empty), everything else is kept in `extra`.
pub fn content_from_record(mut record: Map<String, Value>) -> GeneratedContent {
    let mut take = |key: &str| record.remove(key).unwrap_or(Value::Null);
    let seo_title = text_of(take("seo_title"));
    let description = text_of(take("description"));
    let features = list_of(take("features"));
    let specifications = spec_map_of(take("specifications"));
    let keywords = list_of(take("keywords"));
    GeneratedContent { seo_title, description, features, specifications, keywords, extra: record }
}

/// Absent SEO fields read "N/A"; unrecognised keys (including a model-sent `error`) stay in `extra`.
fn seo_from_record(mut record: Map<String, Value>) -> SeoOptimizationResult {
    let mut field = |key: &str| match record.remove(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(v) => text_of(v),
    };
    let seo_title = field("seo_title");
    let meta_description = field("meta_description");
    let optimized_description = field("optimized_description");
    let alt_text = field("alt_text");
    SeoOptimizationResult { seo_title, meta_description, optimized_description, alt_text, extra: record }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_payload_wrapped_in_prose() {
        let raw = "Sure! Here is your copy:\n```json\n{\"seo_title\": \"Widget Pro\", \"description\": \"Solid.\", \
                   \"features\": [\"Light\", \"Strong\"], \"specifications\": {\"Weight\": \"1kg\"}, \
                   \"keywords\": [\"widget\", \"widget\"]}\n```\nEnjoy.";
        let out = extract_description(raw);
        assert!(!out.is_degraded());
        assert_eq!(out.value.seo_title, "Widget Pro");
        assert_eq!(out.value.description, "Solid.");
        assert_eq!(out.value.features, vec!["Light", "Strong"]);
        assert_eq!(out.value.specifications.get("Weight").map(String::as_str), Some("1kg"));
        assert_eq!(out.value.keywords, vec!["widget", "widget"]);
        assert!(out.value.extra.is_empty());
    }

    #[test]
    fn nested_objects_survive_last_brace_search() {
        let raw = r#"{"seo_title": "T", "specifications": {"size": {"w": 1}}}"#;
        let out = extract(raw, Schema::Description);
        assert_eq!(out.fallback, None);
        assert_eq!(out.value["specifications"], json!({"size": {"w": 1}}));
    }

    #[test]
    fn plain_prose_yields_no_payload_placeholder() {
        let raw = "A lovely widget that does widget things.";
        let out = extract_description(raw);
        assert_eq!(out.fallback, Some(Fallback::NoPayload));
        assert_eq!(out.value, GeneratedContent {
            seo_title: PLACEHOLDER_TITLE.to_string(),
            description: raw.to_string(),
            features: vec![NO_PAYLOAD_FEATURE.to_string()],
            specifications: BTreeMap::new(),
            keywords: vec!["product".to_string(), "ecommerce".to_string()],
            extra: Map::new(),
        });
    }

    #[test]
    fn broken_json_yields_malformed_placeholder() {
        let raw = "Result: {\"seo_title\": \"Oops\", \"features\": [\"a\",]} done";
        let out = extract_description(raw);
        assert_eq!(out.fallback, Some(Fallback::Malformed));
        assert_eq!(out.value.seo_title, PLACEHOLDER_TITLE);
        assert_eq!(out.value.description, raw);
        assert_eq!(out.value.features, vec![MALFORMED_FEATURE]);
        assert!(out.value.specifications.is_empty());
        assert_eq!(out.value.keywords, vec!["product"]);
    }

    #[test]
    fn trailing_brace_in_prose_breaks_extraction() {
        let raw = r#"{"seo_title": "Fine"} and a stray } here"#;
        assert_eq!(extract(raw, Schema::Description).fallback, Some(Fallback::Malformed));
    }

    #[test]
    fn opening_without_closing_is_malformed() {
        assert!(matches!(decode_payload("starts { never ends"), Decoded::Malformed(_)));
        assert!(matches!(decode_payload("} backwards {"), Decoded::Malformed(_)));
        assert_eq!(decode_payload("no braces"), Decoded::Absent);
        assert_eq!(extract("only a } here", Schema::Description).fallback, Some(Fallback::NoPayload));
    }

    #[test]
    fn schema_mismatch_is_passed_through() {
        let out = extract_description(r#"{"headline": "Hi", "features": "just one", "keywords": null}"#);
        assert!(!out.is_degraded());
        assert_eq!(out.value.seo_title, "");
        assert_eq!(out.value.features, vec!["just one"]);
        assert!(out.value.keywords.is_empty());
        assert_eq!(out.value.extra.get("headline"), Some(&json!("Hi")));
    }

    #[test]
    fn non_string_specifications_are_stringified() {
        let out = extract_description(r#"{"specifications": {"Watts": 60, "Wireless": true}, "features": [1, null, "x"]}"#);
        assert_eq!(out.value.specifications.get("Watts").map(String::as_str), Some("60"));
        assert_eq!(out.value.specifications.get("Wireless").map(String::as_str), Some("true"));
        assert_eq!(out.value.features, vec!["1", "x"]);
    }

    #[test]
    fn seo_payload_decodes_with_sentinels() {
        let out = extract_seo(r#"Here you go {"seo_title": "Kettle", "meta_description": "Boils fast"}"#);
        assert!(!out.is_degraded());
        assert_eq!(out.value, SeoOutcome::Optimized(SeoOptimizationResult {
            seo_title: "Kettle".into(),
            meta_description: "Boils fast".into(),
            optimized_description: "N/A".into(),
            alt_text: "N/A".into(),
            extra: Map::new(),
        }));
    }

    #[test]
    fn seo_schema_mismatch_keeps_unknown_keys() {
        let out = extract_seo(r#"{"title": "Kettle", "meta": "m", "error": "model refused"}"#);
        assert!(!out.is_degraded());
        let SeoOutcome::Optimized(result) = out.value else {
            panic!("expected a decoded record");
        };
        assert_eq!(result.seo_title, "N/A");
        assert_eq!(result.extra.get("title"), Some(&json!("Kettle")));
        assert_eq!(result.extra.get("meta"), Some(&json!("m")));
        assert_eq!(result.extra.get("error"), Some(&json!("model refused")));

        let wire = serde_json::to_value(SeoOutcome::Optimized(result)).unwrap();
        assert_eq!(wire["error"], json!("model refused"));
        assert_eq!(wire["alt_text"], json!("N/A"));
    }

    #[test]
    fn seo_fallbacks_are_single_field_errors() {
        let absent = extract_seo("nothing structured");
        assert_eq!(absent.fallback, Some(Fallback::NoPayload));
        assert_eq!(absent.value, SeoOutcome::Unparsed { error: SEO_NO_PAYLOAD_ERROR.into() });

        let malformed = extract_seo("{not json}");
        assert_eq!(malformed.fallback, Some(Fallback::Malformed));
        assert_eq!(malformed.value, SeoOutcome::Unparsed { error: SEO_MALFORMED_ERROR.into() });

        assert_eq!(extract("{bad", Schema::Seo).value.len(), 1);
    }
}
