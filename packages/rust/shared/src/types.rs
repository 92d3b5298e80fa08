//! Core domain types: content records, the SEO block, and generation options.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeoPressError};

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// Kind of publishable content. Unrecognized kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    #[default]
    Blog,
    Project,
    School,
    Notice,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blog => "blog",
            Self::Project => "project",
            Self::School => "school",
            Self::Notice => "notice",
            Self::Other(s) => s,
        }
    }

    /// Site path segment for canonical URLs. `None` means root-relative.
    pub fn path_segment(&self) -> Option<&'static str> {
        match self {
            Self::Blog => Some("blog"),
            Self::Project => Some("project"),
            Self::School => Some("school"),
            Self::Notice => Some("notice"),
            Self::Other(_) => None,
        }
    }

    /// Human-readable label used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "education program introduction",
            Self::School => "institution profile",
            Self::Notice => "academic notice",
            Self::Blog | Self::Other(_) => "blog article",
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "blog" => Self::Blog,
            "project" => Self::Project,
            "school" => Self::School,
            "notice" => Self::Notice,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContentRecord
// ---------------------------------------------------------------------------

/// An image attached to a content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// A normalized unit of publishable content, as produced by the ingestion step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub content_type: ContentType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub date: DateTime<Utc>,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Free-form metadata such as `author`, `source`, `category`.
    #[serde(default)]
    pub meta_data: BTreeMap<String, String>,
}

impl ContentRecord {
    /// Check the fields enrichment relies on: a title, and a slug usable as
    /// a single URL path segment.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SeoPressError::validation("record title is empty"));
        }
        if self.slug.trim().is_empty() {
            return Err(SeoPressError::validation("record slug is empty"));
        }
        if let Some(bad) = self
            .slug
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(SeoPressError::validation(format!(
                "record slug '{}' contains {bad:?}",
                self.slug
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SEO block
// ---------------------------------------------------------------------------

/// A single question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A suggested internal link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    /// Phrase in the content to turn into a link.
    pub anchor: String,
    /// Kind of page the link should point to.
    pub target: String,
    #[serde(default)]
    pub reason: String,
}

/// Competitive SEO analysis. Missing lists deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitiveAnalysis {
    pub competitive_keywords: Vec<String>,
    pub content_gaps: Vec<String>,
    pub user_intent_strategies: Vec<String>,
    pub unique_opportunities: Vec<String>,
}

/// Fully populated SEO metadata for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoBlock {
    pub title: String,
    pub description: String,
    /// Comma-joined keyword list.
    pub keywords: String,
    pub canonical_url: String,
    /// JSON-LD object.
    pub structured_data: serde_json::Value,
    pub faq: Vec<FaqEntry>,
    pub internal_links: Vec<InternalLink>,
    /// Present only when competitive analysis is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_analysis: Option<CompetitiveAnalysis>,
}

/// A content record together with its SEO block.
///
/// `seo` is `None` only when enrichment degraded to the unenriched input;
/// in that case the serialized form is identical to the input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ContentRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoBlock>,
}

impl EnrichedRecord {
    pub fn new(record: ContentRecord, seo: SeoBlock) -> Self {
        Self {
            record,
            seo: Some(seo),
        }
    }

    /// Wrap a record that could not be enriched.
    pub fn unenriched(record: ContentRecord) -> Self {
        Self { record, seo: None }
    }

    pub fn is_enriched(&self) -> bool {
        self.seo.is_some()
    }
}

// ---------------------------------------------------------------------------
// GenerationOptions
// ---------------------------------------------------------------------------

/// Options for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model override; `None` uses the provider's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Upper bound on generated tokens, always at least 1.
    pub max_tokens: u32,
}

impl GenerationOptions {
    pub const PROSE_TEMPERATURE: f32 = 0.7;
    pub const STRICT_JSON_TEMPERATURE: f32 = 0.2;

    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: None,
            temperature: clamp_temperature(temperature),
            max_tokens: max_tokens.max(1),
        }
    }

    /// Options for free-text output.
    pub fn prose(max_tokens: u32) -> Self {
        Self::new(Self::PROSE_TEMPERATURE, max_tokens)
    }

    /// Options for output that must parse as JSON.
    pub fn strict_json(max_tokens: u32) -> Self {
        Self::new(Self::STRICT_JSON_TEMPERATURE, max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = clamp_temperature(temperature);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::prose(200)
    }
}

fn clamp_temperature(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
