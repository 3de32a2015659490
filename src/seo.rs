//! Fixed-threshold quality scoring for generated copy.

use crate::models::GeneratedContent;
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_WORDS: usize = 150;
pub const DESCRIPTION_MAX_WORDS: usize = 300;
pub const KEYWORDS_MIN: usize = 5;
pub const KEYWORDS_MAX: usize = 10;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Good,
    TooShort,
    TooLong,
    NeedsReview,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TitleMetric {
    pub verdict: Verdict,
    pub length: usize,
    /// Distance from the 60-char limit, on whichever side the title sits.
    pub delta: usize,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DescriptionMetric {
    pub verdict: Verdict,
    pub word_count: usize,
    pub char_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct KeywordMetric {
    pub verdict: Verdict,
    pub count: usize,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QualityReport {
    pub title: TitleMetric,
    pub description: DescriptionMetric,
    pub keywords: KeywordMetric,
}

pub fn analyze(content: &GeneratedContent) -> QualityReport {
    QualityReport {
        title: analyze_title(&content.seo_title),
        description: analyze_description(&content.description),
        keywords: analyze_keywords(&content.keywords),
    }
}

pub fn analyze_title(title: &str) -> TitleMetric {
    let length = title.chars().count();
    let (delta, note) = if length < TITLE_MAX_CHARS {
        let d = TITLE_MAX_CHARS - length;
        (d, format!("{d} from ideal"))
    } else {
        let d = length - TITLE_MAX_CHARS;
        (d, format!("{d} over limit"))
    };
    let verdict = if length <= TITLE_MAX_CHARS { Verdict::Good } else { Verdict::TooLong };
    TitleMetric { verdict, length, delta, note }
}

pub fn analyze_description(description: &str) -> DescriptionMetric {
    let word_count = description.split_whitespace().count();
    let verdict = if word_count < DESCRIPTION_MIN_WORDS {
        Verdict::TooShort
    } else if word_count <= DESCRIPTION_MAX_WORDS {
        Verdict::Good
    } else {
        Verdict::NeedsReview
    };
    DescriptionMetric { verdict, word_count, char_count: description.chars().count() }
}

pub fn analyze_keywords(keywords: &[String]) -> KeywordMetric {
    let count = keywords.len();
    let (verdict, note) = if (KEYWORDS_MIN..=KEYWORDS_MAX).contains(&count) {
        (Verdict::Good, "SEO optimized")
    } else {
        (Verdict::NeedsReview, "Review needed")
    };
    KeywordMetric { verdict, count, note: note.to_string() }
}
