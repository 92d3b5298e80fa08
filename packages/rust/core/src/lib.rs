//! SEO enrichment for content records.
//!
//! This crate ties prompt building, fallible generation tasks, and their
//! local fallbacks into one orchestrated, never-failing enrichment step
//! ([`SeoEnricher::enrich_with_seo`]).

pub mod enrichment;
pub mod fallback;
pub mod generation;
pub mod images;
pub mod prompts;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use enrichment::{
    EnrichmentProgress, SeoEnricher, SilentEnrichmentProgress, TaskKind, TaskOutcome,
};
pub use generation::{GenerationCapability, GenerationRequest, parse_json_response};
