//! Task runners: one prompt plus one generation call per SEO artifact,
//! each with its own fallback.
//!
//! A runner never returns an error. Generation failures, timeouts, empty
//! text, unparseable JSON, and JSON of the wrong shape are all handled the
//! same way: log, report the fallback, substitute the local value.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use seopress_shared::{
    CompetitiveAnalysis, FaqEntry, GenerationOptions, InternalLink, Result, SeoConfig,
    SeoPressError,
};

use crate::enrichment::{EnrichmentProgress, TaskKind, TaskOutcome};
use crate::fallback::{self, SchemaKind};
use crate::generation::{GenerationCapability, GenerationRequest};
use crate::prompts::{self, PromptParams};

/// Temperature for structured data: low, but not as strict as the other JSON tasks.
const STRUCTURED_DATA_TEMPERATURE: f32 = 0.3;

/// Runs individual generation tasks against one capability.
pub struct TaskRunner<'a> {
    generator: &'a dyn GenerationCapability,
    config: &'a SeoConfig,
    progress: &'a dyn EnrichmentProgress,
}

impl<'a> TaskRunner<'a> {
    pub fn new(
        generator: &'a dyn GenerationCapability,
        config: &'a SeoConfig,
        progress: &'a dyn EnrichmentProgress,
    ) -> Self {
        Self {
            generator,
            config,
            progress,
        }
    }

    /// Meta description; falls back to the record's description or title.
    pub async fn description(&self, params: &PromptParams) -> String {
        let kind = TaskKind::Description;
        let prompt = prompts::description_prompt(params);
        let result = self.text(kind, &prompt, &GenerationOptions::prose(200)).await;
        self.settle(kind, result, || fallback::fallback_description(params))
    }

    /// Comma-separated keywords; falls back to tags, then the site defaults.
    pub async fn keywords(&self, params: &PromptParams) -> String {
        let kind = TaskKind::Keywords;
        let prompt = prompts::keywords_prompt(params);
        let result = self.text(kind, &prompt, &GenerationOptions::prose(100)).await;
        self.settle(kind, result, || {
            fallback::fallback_keywords(params, &self.config.default_keywords)
        })
    }

    /// FAQ pairs; falls back to an empty list.
    pub async fn faq(&self, params: &PromptParams) -> Vec<FaqEntry> {
        let kind = TaskKind::Faq;
        let prompt = prompts::faq_prompt(params);
        let result = self
            .json(kind, &prompt, &GenerationOptions::strict_json(800))
            .await;
        self.settle(kind, result, Vec::new)
    }

    /// JSON-LD object; falls back to a minimal object of the same schema.
    pub async fn structured_data(
        &self,
        params: &PromptParams,
        schema: SchemaKind,
        date: Option<DateTime<Utc>>,
    ) -> Value {
        let kind = TaskKind::StructuredData;
        let prompt = prompts::structured_data_prompt(params, schema);
        let options =
            GenerationOptions::strict_json(600).with_temperature(STRUCTURED_DATA_TEMPERATURE);
        let result = self
            .json::<Map<String, Value>>(kind, &prompt, &options)
            .await
            .map(Value::Object);
        self.settle(kind, result, || {
            fallback::fallback_structured_data(schema, params, date, self.config)
        })
    }

    /// Internal-link suggestions; falls back to an empty list.
    pub async fn internal_links(&self, params: &PromptParams) -> Vec<InternalLink> {
        let kind = TaskKind::InternalLinks;
        let prompt = prompts::internal_links_prompt(params);
        let result = self
            .json(kind, &prompt, &GenerationOptions::strict_json(600))
            .await;
        self.settle(kind, result, Vec::new)
    }

    /// Competitive analysis; falls back to empty lists in every field.
    pub async fn competitive_analysis(&self, params: &PromptParams) -> CompetitiveAnalysis {
        let kind = TaskKind::CompetitiveAnalysis;
        let prompt = prompts::competitive_analysis_prompt(params);
        let result = self
            .json(kind, &prompt, &GenerationOptions::strict_json(800))
            .await;
        self.settle(kind, result, fallback::fallback_competitive_analysis)
    }

    /// Alt text for a single image. `None` means keep the current alt.
    pub async fn image_alt(
        &self,
        params: &PromptParams,
        position: Option<(usize, usize)>,
    ) -> Option<String> {
        let kind = TaskKind::ImageAlt;
        let prompt = prompts::image_alt_prompt(params, position);
        let result = self
            .text(kind, &prompt, &image_alt_options())
            .await
            .map(Some);
        self.settle(kind, result, || None)
    }

    /// Alt text for several images in one concurrent batch, in request order.
    /// `None` means the whole batch failed.
    pub async fn image_alt_batch(&self, requests: &[GenerationRequest]) -> Option<Vec<String>> {
        let kind = TaskKind::ImageAlt;
        let result = self
            .bounded(kind, self.generator.generate_text_batch(requests))
            .await
            .map(Some);
        self.settle(kind, result, || None)
    }

    async fn text(
        &self,
        kind: TaskKind,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let text = self
            .bounded(kind, self.generator.generate_text(prompt, options))
            .await?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SeoPressError::malformed(format!(
                "{} response was empty",
                kind.as_str()
            )));
        }
        Ok(trimmed.to_string())
    }

    async fn json<T: DeserializeOwned>(
        &self,
        kind: TaskKind,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<T> {
        let value = self
            .bounded(kind, self.generator.generate_json(prompt, options))
            .await?
            .ok_or_else(|| {
                SeoPressError::malformed(format!("{} response was not valid JSON", kind.as_str()))
            })?;

        serde_json::from_value(value).map_err(|e| {
            SeoPressError::malformed(format!(
                "{} response has the wrong shape: {e}",
                kind.as_str()
            ))
        })
    }

    /// Apply the per-call time budget.
    async fn bounded<T, F>(&self, kind: TaskKind, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let after = self.config.task_timeout;
        tokio::time::timeout(after, call)
            .await
            .map_err(|_| SeoPressError::Timeout {
                task: kind.as_str(),
                after,
            })?
    }

    fn settle<T>(&self, kind: TaskKind, result: Result<T>, fallback: impl FnOnce() -> T) -> T {
        match result {
            Ok(value) => {
                debug!(task = kind.as_str(), "generated");
                self.progress.task_finished(kind, TaskOutcome::Generated);
                value
            }
            Err(e) => {
                warn!(task = kind.as_str(), error = %e, "generation failed, using fallback");
                self.progress.task_finished(kind, TaskOutcome::FellBack);
                fallback()
            }
        }
    }
}

pub(crate) fn image_alt_options() -> GenerationOptions {
    GenerationOptions::prose(50)
}

/// Split a generated keyword string into trimmed, non-empty keywords.
/// Accepts ASCII and full-width commas as well as the enumeration comma.
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split([',', '，', '、'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}
