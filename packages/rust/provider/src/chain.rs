//! Ordered provider fallback.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use seopress_core::GenerationCapability;
use seopress_shared::{AppConfig, GenerationOptions, ProviderEntry, Result, SeoPressError};

use crate::client::{ChatProvider, api_key_from_env};

/// Lower bound on a single provider's HTTP timeout.
const MIN_PROVIDER_TIMEOUT: Duration = Duration::from_millis(100);

/// Tries each provider in order until one succeeds.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    providers: Vec<ChatProvider>,
}

impl ProviderChain {
    pub fn new(providers: Vec<ChatProvider>) -> Result<Self> {
        if providers.is_empty() {
            return Err(SeoPressError::config(
                "no generation provider available; set an API key for at least one [[providers]] entry",
            ));
        }
        Ok(Self { providers })
    }

    /// Build the chain from `[[providers]]`, skipping entries without an API key.
    ///
    /// `task_budget` is the time one generation call may take end to end;
    /// it is split across the providers so a hung provider still leaves
    /// time for the next one.
    pub fn from_config(config: &AppConfig, task_budget: Duration) -> Result<Self> {
        let keyed = config
            .providers
            .iter()
            .filter_map(|entry| api_key_from_env(entry).map(|key| (entry.clone(), key)))
            .collect();
        Self::from_entries(keyed, task_budget)
    }

    /// Build the chain from entries with already-resolved API keys.
    pub fn from_entries(entries: Vec<(ProviderEntry, String)>, task_budget: Duration) -> Result<Self> {
        let timeout = provider_timeout(task_budget, entries.len());

        let providers = entries
            .iter()
            .map(|(entry, key)| ChatProvider::from_entry(entry, key, timeout))
            .collect::<Result<Vec<_>>>()?;

        let chain = Self::new(providers)?;
        info!(
            providers = ?chain.provider_names(),
            timeout_ms = timeout.as_millis() as u64,
            "generation providers ready"
        );
        Ok(chain)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(ChatProvider::name).collect()
    }
}

/// Per-provider share of the task budget.
fn provider_timeout(task_budget: Duration, providers: usize) -> Duration {
    let share = task_budget / u32::try_from(providers.max(1)).unwrap_or(u32::MAX);
    share.max(MIN_PROVIDER_TIMEOUT)
}

#[async_trait]
impl GenerationCapability for ProviderChain {
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.complete(prompt, options).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SeoPressError::Generation("no providers configured".into())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use seopress_core::SeoEnricher;
    use seopress_shared::{ContentRecord, SeoConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(name: &str) -> ChatProvider {
        ChatProvider::new(
            name,
            "https://api.example.test/v1",
            "sk-test",
            "model",
            Duration::from_secs(5),
        )
        .expect("build provider")
    }

    fn entry(name: &str, server: &MockServer) -> (ProviderEntry, String) {
        (
            ProviderEntry {
                name: name.into(),
                base_url: format!("{}/v1", server.uri()),
                api_key_env: format!("{}_API_KEY", name.to_uppercase()),
                model: "model".into(),
            },
            "sk-test".into(),
        )
    }

    async fn replying(content: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            })))
            .mount(&server)
            .await;
        server
    }

    async fn failing(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    async fn hanging() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn empty_chain_is_a_config_error() {
        let err = ProviderChain::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SeoPressError::Config { .. }));
    }

    #[test]
    fn chain_keeps_configured_order() {
        let chain = ProviderChain::new(vec![provider("deepseek"), provider("openai")])
            .expect("chain");
        assert_eq!(chain.provider_names(), vec!["deepseek", "openai"]);
    }

    #[test]
    fn from_config_without_keys_fails() {
        let mut config = AppConfig::default();
        config.providers = vec![ProviderEntry {
            name: "local".into(),
            base_url: "http://localhost:8080/v1".into(),
            api_key_env: "SEOPRESS_TEST_NONEXISTENT_KEY_67890".into(),
            model: "qwen".into(),
        }];
        let err = ProviderChain::from_config(&config, Duration::from_secs(30)).unwrap_err();
        assert!(err.to_string().contains("no generation provider available"));
    }

    #[test]
    fn task_budget_is_split_across_providers() {
        assert_eq!(
            provider_timeout(Duration::from_secs(30), 1),
            Duration::from_secs(30)
        );
        assert_eq!(
            provider_timeout(Duration::from_secs(30), 2),
            Duration::from_secs(15)
        );
        assert_eq!(
            provider_timeout(Duration::from_secs(120), 3),
            Duration::from_secs(40)
        );
        assert_eq!(
            provider_timeout(Duration::from_millis(150), 4),
            MIN_PROVIDER_TIMEOUT
        );
        assert_eq!(
            provider_timeout(Duration::from_secs(10), 0),
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn falls_through_to_next_provider() {
        let primary = failing(503, "overloaded").await;
        let backup = replying("from backup").await;

        let chain = ProviderChain::from_entries(
            vec![entry("deepseek", &primary), entry("openai", &backup)],
            Duration::from_secs(10),
        )
        .expect("chain");

        let text = chain
            .generate_text("hello", &GenerationOptions::default())
            .await
            .expect("backup reply");
        assert_eq!(text, "from backup");
    }

    #[tokio::test]
    async fn returns_last_error_when_every_provider_fails() {
        let primary = failing(503, "overloaded").await;
        let backup = failing(401, "bad key").await;

        let chain = ProviderChain::from_entries(
            vec![entry("deepseek", &primary), entry("openai", &backup)],
            Duration::from_secs(10),
        )
        .expect("chain");

        let err = chain
            .generate_text("hello", &GenerationOptions::default())
            .await
            .unwrap_err();
        match err {
            SeoPressError::Generation(message) => {
                assert!(message.starts_with("openai: HTTP 401"));
                assert!(message.contains("bad key"));
            }
            other => panic!("expected Generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hung_primary_leaves_time_for_backup_within_task_budget() {
        let primary = hanging().await;
        let backup = replying("FROM BACKUP").await;
        let budget = Duration::from_secs(2);

        let chain = ProviderChain::from_entries(
            vec![entry("deepseek", &primary), entry("openai", &backup)],
            budget,
        )
        .expect("chain");
        let enricher = SeoEnricher::new(
            Arc::new(chain),
            SeoConfig::default().with_task_timeout(budget),
        );

        let record: ContentRecord = serde_json::from_value(serde_json::json!({
            "contentType": "blog",
            "title": "Spring enrollment opens",
            "description": "ORIGINAL",
            "content": "Applications for the spring intake are now open.",
            "date": "2024-03-01T08:00:00Z",
            "slug": "spring-enrollment-opens"
        }))
        .expect("record");

        let enriched = enricher.enrich_with_seo(&record).await;
        let seo = enriched.seo.expect("seo block");
        assert_eq!(seo.description, "FROM BACKUP");
        assert_eq!(seo.keywords, "FROM BACKUP");
    }
}
