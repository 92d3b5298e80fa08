//! SEO enrichment orchestrator.
//!
//! Turns one [`ContentRecord`] into an [`EnrichedRecord`] by running the
//! generation tasks in three stages:
//!
//! 1. primary fan-out: description, keywords, image alt text
//! 2. conditional fan-out, all concurrent: content-type-specific tasks
//!    (FAQ needs the resolved keywords), internal links, and optionally
//!    competitive analysis
//! 3. a single merge into a fresh record
//!
//! Each task substitutes its own fallback on failure, so enrichment never
//! fails. A panic during composition degrades to the unenriched record.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, instrument};

use seopress_shared::{
    ContentRecord, ContentType, EnrichedRecord, SeoBlock, SeoConfig, SeoPressError,
};

use crate::fallback::{SchemaKind, canonical_url};
use crate::generation::GenerationCapability;
use crate::images::enhance_image_metadata;
use crate::prompts::PromptParams;
use crate::tasks::{TaskRunner, split_keywords};

// ---------------------------------------------------------------------------
// Task bookkeeping
// ---------------------------------------------------------------------------

/// The generation tasks the orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Description,
    Keywords,
    ImageAlt,
    Faq,
    StructuredData,
    InternalLinks,
    CompetitiveAnalysis,
}

impl TaskKind {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Keywords => "keywords",
            Self::ImageAlt => "image_alt",
            Self::Faq => "faq",
            Self::StructuredData => "structured_data",
            Self::InternalLinks => "internal_links",
            Self::CompetitiveAnalysis => "competitive_analysis",
        }
    }
}

/// How a task finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Generated,
    FellBack,
}

/// Progress callback for enrichment runs.
pub trait EnrichmentProgress: Send + Sync {
    /// Called when entering a new stage.
    fn phase(&self, name: &str);
    /// Called once per finished task.
    fn task_finished(&self, kind: TaskKind, outcome: TaskOutcome);
}

/// No-op enrichment progress.
pub struct SilentEnrichmentProgress;

impl EnrichmentProgress for SilentEnrichmentProgress {
    fn phase(&self, _name: &str) {}
    fn task_finished(&self, _kind: TaskKind, _outcome: TaskOutcome) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Enriches content records with generated SEO metadata.
#[derive(Clone)]
pub struct SeoEnricher {
    generator: Arc<dyn GenerationCapability>,
    config: SeoConfig,
}

impl SeoEnricher {
    pub fn new(generator: Arc<dyn GenerationCapability>, config: SeoConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &SeoConfig {
        &self.config
    }

    /// Enrich a record. Never fails; the input is not modified.
    pub async fn enrich_with_seo(&self, record: &ContentRecord) -> EnrichedRecord {
        self.enrich_with_progress(record, &SilentEnrichmentProgress)
            .await
    }

    /// Like [`Self::enrich_with_seo`], reporting stages and task outcomes.
    #[instrument(skip_all, fields(slug = %record.slug, content_type = %record.content_type))]
    pub async fn enrich_with_progress(
        &self,
        record: &ContentRecord,
        progress: &dyn EnrichmentProgress,
    ) -> EnrichedRecord {
        match AssertUnwindSafe(self.compose(record, progress))
            .catch_unwind()
            .await
        {
            Ok(enriched) => enriched,
            Err(panic) => {
                let err = SeoPressError::Orchestration(panic_message(panic.as_ref()).to_string());
                error!(error = %err, "SEO enrichment failed, returning the unenriched record");
                EnrichedRecord::unenriched(record.clone())
            }
        }
    }

    async fn compose(
        &self,
        record: &ContentRecord,
        progress: &dyn EnrichmentProgress,
    ) -> EnrichedRecord {
        let params = PromptParams::from_record(record);
        let runner = TaskRunner::new(self.generator.as_ref(), &self.config, progress);

        // --- Stage 1: primary fan-out ---
        progress.phase("Generating description, keywords and image text");
        let canonical_url = canonical_url(&self.config.base_url, &record.content_type, &record.slug);
        let (description, keywords, images) = tokio::join!(
            runner.description(&params),
            runner.keywords(&params),
            enhance_image_metadata(&runner, &record.images, &params),
        );

        // --- Stage 2: conditional fan-out ---
        progress.phase("Generating structured data, FAQ and links");
        let schema = SchemaKind::for_content_type(&record.content_type);
        let content_specific = async {
            match record.content_type {
                ContentType::Project => {
                    let faq_params = params.clone().with_keywords(split_keywords(&keywords));
                    tokio::join!(
                        runner.faq(&faq_params),
                        runner.structured_data(&params, schema, None),
                    )
                }
                ContentType::School => (
                    Vec::new(),
                    runner.structured_data(&params, schema, None).await,
                ),
                _ => (
                    Vec::new(),
                    runner
                        .structured_data(&params, schema, Some(record.date))
                        .await,
                ),
            }
        };
        let competitive = async {
            if self.config.competitive_analysis {
                Some(runner.competitive_analysis(&params).await)
            } else {
                None
            }
        };
        let ((faq, structured_data), internal_links, competitive_analysis) = tokio::join!(
            content_specific,
            runner.internal_links(&params),
            competitive,
        );

        // --- Stage 3: merge ---
        let seo = SeoBlock {
            title: record.title.clone(),
            description,
            keywords,
            canonical_url,
            structured_data,
            faq,
            internal_links,
            competitive_analysis,
        };

        let mut enriched = record.clone();
        enriched.images = images;

        info!(
            faq = seo.faq.len(),
            internal_links = seo.internal_links.len(),
            competitive_analysis = seo.competitive_analysis.is_some(),
            "SEO enrichment complete"
        );

        EnrichedRecord::new(enriched, seo)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
