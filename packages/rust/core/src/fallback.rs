//! Generation-free values: canonical URLs and the defaults substituted
//! when a generation task fails.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use seopress_shared::{CompetitiveAnalysis, ContentType, SeoConfig};

use crate::prompts::PromptParams;

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Schema.org shape targeted for a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Course,
    CollegeOrUniversity,
    Article,
}

impl SchemaKind {
    pub fn for_content_type(content_type: &ContentType) -> Self {
        match content_type {
            ContentType::Project => Self::Course,
            ContentType::School => Self::CollegeOrUniversity,
            _ => Self::Article,
        }
    }

    /// The `@type` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "Course",
            Self::CollegeOrUniversity => "CollegeOrUniversity",
            Self::Article => "Article",
        }
    }
}

/// Canonical URL for a record: `{base}/{segment}/{slug}`, or `{base}/{slug}`
/// for content types without a section of their own.
pub fn canonical_url(base_url: &str, content_type: &ContentType, slug: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match content_type.path_segment() {
        Some(segment) => format!("{base}/{segment}/{slug}"),
        None => format!("{base}/{slug}"),
    }
}

/// Description used when generation fails: the record's own, else its title.
pub fn fallback_description(params: &PromptParams) -> String {
    description_or_title(params).to_string()
}

/// Keywords used when generation fails: the tags, else the site defaults.
pub fn fallback_keywords(params: &PromptParams, default_keywords: &str) -> String {
    let tags: Vec<&str> = params
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.is_empty() {
        default_keywords.to_string()
    } else {
        tags.join(", ")
    }
}

/// Minimal JSON-LD for the given schema, built without any generation call.
pub fn fallback_structured_data(
    kind: SchemaKind,
    params: &PromptParams,
    date: Option<DateTime<Utc>>,
    config: &SeoConfig,
) -> Value {
    let description = description_or_title(params);

    match kind {
        SchemaKind::Course => json!({
            "@context": SCHEMA_CONTEXT,
            "@type": kind.as_str(),
            "name": params.title,
            "description": description,
            "provider": {
                "@type": "Organization",
                "name": config.organization_name,
                "sameAs": config.organization_url,
            },
        }),
        SchemaKind::CollegeOrUniversity => json!({
            "@context": SCHEMA_CONTEXT,
            "@type": kind.as_str(),
            "name": params.title,
            "description": description,
        }),
        SchemaKind::Article => json!({
            "@context": SCHEMA_CONTEXT,
            "@type": kind.as_str(),
            "headline": params.title,
            "description": description,
            "datePublished": date
                .unwrap_or(params.date)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            "author": {
                "@type": "Organization",
                "name": config.organization_name,
            },
        }),
    }
}

/// Competitive analysis with every list empty.
pub fn fallback_competitive_analysis() -> CompetitiveAnalysis {
    CompetitiveAnalysis::default()
}

fn description_or_title(params: &PromptParams) -> &str {
    if params.description.trim().is_empty() {
        &params.title
    } else {
        &params.description
    }
}
