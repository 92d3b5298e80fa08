//! Prompt builders, one per SEO artifact.
//!
//! Every builder is a pure function of [`PromptParams`]: no I/O, no
//! randomness, and always a non-empty prompt.

use chrono::{DateTime, Utc};

use seopress_shared::{ContentRecord, ContentType};

use crate::fallback::SchemaKind;

/// Content excerpt length for description and keyword prompts.
const SUMMARY_EXCERPT_CHARS: usize = 500;

/// Content excerpt length for the internal-link prompt.
const LINK_EXCERPT_CHARS: usize = 300;

const DEFAULT_CATEGORY: &str = "adult higher education";
/// Focus keywords for the description. It is generated alongside the
/// keywords, so it cannot use the resolved ones.
const DESCRIPTION_FOCUS_KEYWORDS: &str = "成人高等教育、学历提升";

/// The site publishes in Chinese; every prompt asks for Chinese output.
const OUTPUT_LANGUAGE: &str = "Write all generated text in Simplified Chinese.";

/// Inputs shared by all prompt builders, derived from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptParams {
    pub title: String,
    pub content: String,
    pub content_type: ContentType,
    pub description: String,
    /// `category` metadata, if the record carries one.
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub date: DateTime<Utc>,
    /// Resolved keywords; empty until the keyword task has finished.
    pub keywords: Vec<String>,
}

impl PromptParams {
    pub fn from_record(record: &ContentRecord) -> Self {
        Self {
            title: record.title.clone(),
            content: record.content.clone(),
            content_type: record.content_type.clone(),
            description: record.description.clone(),
            category: record
                .meta_data
                .get("category")
                .filter(|c| !c.trim().is_empty())
                .cloned(),
            tags: record.tags.clone(),
            date: record.date,
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// First `max_chars` characters of the content, or the title when empty.
    fn excerpt(&self, max_chars: usize) -> &str {
        if self.content.trim().is_empty() {
            &self.title
        } else {
            truncate_chars(&self.content, max_chars)
        }
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn description_prompt(params: &PromptParams) -> String {
    format!(
        "As an SEO specialist and education advisor, write an engaging, informative meta \
description of 120-160 characters for the following adult-education content.
Work in the keywords \"{DESCRIPTION_FOCUS_KEYWORDS}\" and stress the educational value and recognized credentials.
Guidelines:
1. State a clear value proposition
2. Emphasize that the diploma is officially recognized
3. Hint at better career prospects
4. Use action-oriented language
5. Keep the tone professional, credible, and positive
{OUTPUT_LANGUAGE} Return only the description.

Title: {title}
Content excerpt: {excerpt}...",
        title = params.title,
        excerpt = params.excerpt(SUMMARY_EXCERPT_CHARS),
    )
}

pub fn keywords_prompt(params: &PromptParams) -> String {
    format!(
        "As an SEO specialist and education-industry analyst, extract the 8-10 keywords with the \
highest search potential for the following adult-education content, separated by commas.
The keywords should:
1. Mix long-tail and short-tail keywords
2. Match how people in Guangdong phrase their searches
3. Cover search intent (\"how to\", \"how much\" and similar questions)
4. Include both industry terms and everyday search terms
5. Favor high-conversion terms such as \"enrollment\" and \"tuition\"
{OUTPUT_LANGUAGE} Return only the comma-separated list.

Category: {category}
Title: {title}
Content: {excerpt}...",
        category = params.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
        title = params.title,
        excerpt = params.excerpt(SUMMARY_EXCERPT_CHARS),
    )
}

pub fn faq_prompt(params: &PromptParams) -> String {
    let keyword_line = if params.keywords.is_empty() {
        String::new()
    } else {
        format!(
            "Weave these keywords into the answers naturally: {}\n",
            params.keywords.join(", ")
        )
    };

    format!(
        "As an education consultant, write the 5 most common, most searched questions and expert \
answers about the \"{title}\" program for prospective students in Guangdong.
Cover:
1. Eligibility and the enrollment process
2. Study format and difficulty
3. Recognition and uses of the certificate
4. Tuition and available discounts
5. Career or promotion prospects

{keyword_line}Each answer should be specific, 100-150 characters, in an authoritative tone.
{OUTPUT_LANGUAGE}
Return a strict JSON array: [{{\"question\": \"...\", \"answer\": \"...\"}}, ...]",
        title = params.title,
    )
}

/// Alt-text prompt. `position` is `(index, total)` with a 1-based index,
/// given when the record has more than one image.
pub fn image_alt_prompt(params: &PromptParams, position: Option<(usize, usize)>) -> String {
    let which = match position {
        Some((index, total)) => format!("image {index} of {total}"),
        None => "main image".to_string(),
    };

    format!(
        "Write SEO-friendly alt text for the {which} of the {label} titled \"{title}\".
Rules:
1. 10-15 Chinese characters
2. Carry the key information of the topic
3. Describe the image, not the article
4. Do not use words like \"image\" or \"photo\"
5. Work in 1-2 relevant keywords naturally
{OUTPUT_LANGUAGE} Return only the alt text.",
        label = params.content_type.label(),
        title = params.title,
    )
}

pub fn structured_data_prompt(params: &PromptParams, kind: SchemaKind) -> String {
    let mut prompt = format!(
        "Generate complete JSON-LD structured data for \"{title}\", a {label}.",
        title = params.title,
        label = params.content_type.label(),
    );

    match kind {
        SchemaKind::Course => prompt.push_str(
            "
The structured data must follow the Schema.org Course type and include:
1. Course name and description
2. Provider organization
3. Where the course is offered
4. Approximate tuition range and duration",
        ),
        SchemaKind::CollegeOrUniversity => prompt.push_str(
            "
The structured data must follow the Schema.org CollegeOrUniversity type and include:
1. Institution name and description
2. Location
3. Main programs offered",
        ),
        SchemaKind::Article => {
            prompt.push_str(
                "
The structured data must follow the Schema.org Article type and include:
1. Headline, description, and publication date
2. Author organization
3. Publisher organization
4. Main content category",
            );
            prompt.push_str(&format!(
                "\nPublication date: {}",
                params.date.format("%Y-%m-%d")
            ));
        }
    }

    prompt.push_str("\n\nText values in Simplified Chinese. Return one complete JSON object with valid syntax that parses as-is.");
    prompt
}

pub fn internal_links_prompt(params: &PromptParams) -> String {
    format!(
        "As a content strategist, analyze the following adult-education content and identify 3-5 \
keywords or phrases that should carry internal links.
The goal is denser internal linking, stronger topical relevance, and guiding readers to related pages.

Content type: {label}
Title: {title}
Content excerpt: {excerpt}...

For each, give:
1. The linkable keyword or phrase
2. The kind of target page (program overview, enrollment guide, etc.)
3. Why the link helps

{OUTPUT_LANGUAGE}
Return a JSON array: [{{\"anchor\": \"...\", \"target\": \"...\", \"reason\": \"...\"}}, ...]",
        label = params.content_type.label(),
        title = params.title,
        excerpt = params.excerpt(LINK_EXCERPT_CHARS),
    )
}

pub fn competitive_analysis_prompt(params: &PromptParams) -> String {
    format!(
        "As an SEO competitive analyst, analyze the competition around \"{title}\", a {label}.
Consider the adult-education market in Guangdong and suggest 3-5 differentiation strategies.

Cover:
1. Likely competing keywords and how hard they are
2. Content differentiation ideas
3. Strategies for matching user intent
4. Unique content opportunities

{OUTPUT_LANGUAGE}
Return JSON: {{
  \"competitiveKeywords\": [\"...\"],
  \"contentGaps\": [\"...\"],
  \"userIntentStrategies\": [\"...\"],
  \"uniqueOpportunities\": [\"...\"]
}}",
        title = params.title,
        label = params.content_type.label(),
    )
}
