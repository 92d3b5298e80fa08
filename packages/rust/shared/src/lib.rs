//! Shared types, error model, and configuration for seopress.
//!
//! This crate is the foundation depended on by all other seopress crates.
//! It provides:
//! - [`SeoPressError`] — the unified error type
//! - Domain types ([`ContentRecord`], [`SeoBlock`], [`EnrichedRecord`], [`GenerationOptions`])
//! - Configuration ([`AppConfig`], [`SeoConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FeaturesConfig, GenerationConfig, ProviderEntry, SeoConfig, SiteConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_base_url,
    validate_config,
};
pub use error::{Result, SeoPressError};
pub use types::{
    CompetitiveAnalysis, ContentRecord, ContentType, EnrichedRecord, FaqEntry, GenerationOptions,
    ImageRef, InternalLink, SeoBlock,
};
