//! Application configuration for seopress.
//!
//! User config lives at `~/.seopress/seopress.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SeoPressError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "seopress.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".seopress";

// ---------------------------------------------------------------------------
// Config structs (matching seopress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity used for canonical URLs and structured data.
    #[serde(default)]
    pub site: SiteConfig,

    /// Optional enrichment features.
    #[serde(default)]
    pub features: FeaturesConfig,

    /// Generation call settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Generation providers, tried in order.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            features: FeaturesConfig::default(),
            generation: GenerationConfig::default(),
            providers: default_providers(),
        }
    }
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public base URL of the static site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Publisher name embedded in structured data.
    #[serde(default = "default_organization_name")]
    pub organization_name: String,

    /// Publisher URL embedded in structured data.
    #[serde(default = "default_base_url")]
    pub organization_url: String,

    /// Keywords used when generation fails and the record has no tags.
    #[serde(default = "default_keywords")]
    pub default_keywords: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization_name: default_organization_name(),
            organization_url: default_base_url(),
            default_keywords: default_keywords(),
        }
    }
}

fn default_base_url() -> String {
    "https://weipei.edu.cn".into()
}
fn default_organization_name() -> String {
    "Dongguan Weipei Education and Training Center".into()
}
fn default_keywords() -> String {
    "成人高考, 学历提升, 专升本, 广东学历教育".into()
}

/// `[features]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Generate a competitive SEO analysis for every record.
    #[serde(default)]
    pub competitive_analysis: bool,
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Budget for a single generation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[[providers]]` entry: an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Short name used in logs (e.g. `deepseek`).
    pub name: String,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Name of the env var holding the API key (never store the key itself).
    pub api_key_env: String,
    /// Default model for this provider.
    pub model: String,
}

fn default_providers() -> Vec<ProviderEntry> {
    vec![
        ProviderEntry {
            name: "deepseek".into(),
            base_url: "https://api.deepseek.com/v1".into(),
            api_key_env: "DEEPSEEK_API_KEY".into(),
            model: "deepseek-chat".into(),
        },
        ProviderEntry {
            name: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            model: "gpt-4o-mini".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// SEO config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime enrichment configuration, passed explicitly to the orchestrator.
#[derive(Debug, Clone)]
pub struct SeoConfig {
    /// Base URL for canonical links, without trailing slash.
    pub base_url: String,
    /// Publisher name for fallback structured data.
    pub organization_name: String,
    /// Publisher URL for fallback structured data.
    pub organization_url: String,
    /// Keyword fallback when a record has no tags.
    pub default_keywords: String,
    /// Whether to run competitive analysis.
    pub competitive_analysis: bool,
    /// Budget for each generation call.
    pub task_timeout: Duration,
}

impl SeoConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_competitive_analysis(mut self, enabled: bool) -> Self {
        self.competitive_analysis = enabled;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SeoConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.site.base_url.trim_end_matches('/').to_string(),
            organization_name: config.site.organization_name.clone(),
            organization_url: config.site.organization_url.clone(),
            default_keywords: config.site.default_keywords.clone(),
            competitive_analysis: config.features.competitive_analysis,
            task_timeout: Duration::from_secs(config.generation.timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.seopress/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SeoPressError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.seopress/seopress.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SeoPressError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SeoPressError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SeoPressError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SeoPressError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SeoPressError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that URLs parse and the timeout is usable.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    validate_base_url(&config.site.base_url)?;

    if config.generation.timeout_secs == 0 {
        return Err(SeoPressError::config("generation.timeout_secs must be positive"));
    }

    for provider in &config.providers {
        Url::parse(&provider.base_url).map_err(|e| {
            SeoPressError::config(format!(
                "provider '{}' has an invalid base_url '{}': {e}",
                provider.name, provider.base_url
            ))
        })?;
    }

    Ok(())
}

/// Check that a site base URL is absolute http(s).
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| SeoPressError::config(format!("invalid base_url '{base_url}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SeoPressError::config(format!(
            "base_url must use http or https, got '{other}'"
        ))),
    }
}
