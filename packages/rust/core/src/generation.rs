//! The generation capability the enrichment tasks depend on.
//!
//! Provider selection, transport, and cross-provider fallback live behind
//! this trait; the rest of the crate only sees text in, text (or JSON) out.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use seopress_shared::{GenerationOptions, Result};

/// Leading/trailing Markdown code fence around a JSON payload.
static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\n?\s*```$").expect("valid code fence regex")
});

/// One prompt plus its options, for batch generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

/// Something that can turn a prompt into generated text.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    /// Generate text for a prompt.
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Generate text and parse it as JSON.
    ///
    /// Returns `Ok(None)` when the response is not valid JSON; errors are
    /// reserved for generation failures.
    async fn generate_json(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<serde_json::Value>> {
        let text = self.generate_text(prompt, options).await?;
        Ok(parse_json_response(&text))
    }

    /// Generate text for several prompts concurrently.
    ///
    /// Results are in request order. Any single failure fails the batch.
    async fn generate_text_batch(&self, requests: &[GenerationRequest]) -> Result<Vec<String>> {
        futures::future::try_join_all(
            requests
                .iter()
                .map(|req| self.generate_text(&req.prompt, &req.options)),
        )
        .await
    }
}

/// Parse a model response as JSON, tolerating a surrounding code fence.
pub fn parse_json_response(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();
    let body = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str().trim());

    serde_json::from_str(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerator;
    use seopress_shared::SeoPressError;

    #[test]
    fn parses_plain_json() {
        let value = parse_json_response(r#" [{"question":"q","answer":"a"}] "#).expect("json");
        assert_eq!(value[0]["question"], "q");
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"@type\": \"Course\"}\n```";
        let value = parse_json_response(text).expect("json");
        assert_eq!(value["@type"], "Course");
    }

    #[test]
    fn parses_bare_fence() {
        let value = parse_json_response("```\n[1, 2]\n```").expect("json");
        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[test]
    fn rejects_prose() {
        assert!(parse_json_response("Here are your FAQs: none").is_none());
    }

    #[tokio::test]
    async fn generate_json_returns_none_for_prose() {
        let generator = ScriptedGenerator::new(|_| Ok("not json at all".into()));
        let value = generator
            .generate_json("p", &GenerationOptions::strict_json(10))
            .await
            .expect("generation succeeded");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn generate_json_propagates_generation_errors() {
        let generator = ScriptedGenerator::failing();
        let result = generator
            .generate_json("p", &GenerationOptions::strict_json(10))
            .await;
        assert!(matches!(result, Err(SeoPressError::Generation(_))));
    }

    #[tokio::test]
    async fn batch_preserves_request_order() {
        let generator = ScriptedGenerator::new(|prompt| Ok(format!("alt for {prompt}")));
        let requests = vec![
            GenerationRequest::new("one", GenerationOptions::prose(50)),
            GenerationRequest::new("two", GenerationOptions::prose(50)),
            GenerationRequest::new("three", GenerationOptions::prose(50)),
        ];
        let texts = generator.generate_text_batch(&requests).await.expect("batch");
        assert_eq!(texts, vec!["alt for one", "alt for two", "alt for three"]);
    }

    #[tokio::test]
    async fn batch_fails_as_a_whole() {
        let generator = ScriptedGenerator::new(|prompt| {
            if prompt == "two" {
                Err(SeoPressError::Generation("rate limited".into()))
            } else {
                Ok("ok".into())
            }
        });
        let requests = vec![
            GenerationRequest::new("one", GenerationOptions::prose(50)),
            GenerationRequest::new("two", GenerationOptions::prose(50)),
        ];
        assert!(generator.generate_text_batch(&requests).await.is_err());
    }
}
