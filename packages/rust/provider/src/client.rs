//! A single OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use seopress_shared::{GenerationOptions, ProviderEntry, Result, SeoPressError};

/// User-Agent string for provider requests.
const USER_AGENT: &str = concat!("seopress/", env!("CARGO_PKG_VERSION"));

/// How much of an error body to keep in error messages.
const ERROR_BODY_CHARS: usize = 300;

/// Client for one chat completions endpoint.
#[derive(Clone)]
pub struct ChatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl std::fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SeoPressError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            http,
        })
    }

    /// Build a provider from a config entry and its resolved API key.
    pub fn from_entry(entry: &ProviderEntry, api_key: &str, timeout: Duration) -> Result<Self> {
        Self::new(&entry.name, &entry.base_url, api_key, &entry.model, timeout)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str, options: &GenerationOptions) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: options.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Send one prompt and return the trimmed completion text.
    pub async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = self.build_request(prompt, options);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SeoPressError::Network(format!("{}: {e}", self.name)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_CHARS).collect();
            return Err(SeoPressError::Generation(format!(
                "{}: HTTP {status}: {body}",
                self.name
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            SeoPressError::Generation(format!("{}: invalid completion response: {e}", self.name))
        })?;

        let text = completion_text(completion)
            .ok_or_else(|| SeoPressError::Generation(format!("{}: no choices returned", self.name)))?;

        debug!(provider = %self.name, model = %request.model, chars = text.len(), "completion received");
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Read an entry's API key from the environment. `None` when the variable
/// is unset or blank.
pub(crate) fn api_key_from_env(entry: &ProviderEntry) -> Option<String> {
    match std::env::var(&entry.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Some(key.trim().to_string()),
        _ => {
            debug!(provider = %entry.name, env = %entry.api_key_env, "API key not set, skipping provider");
            None
        }
    }
}

fn completion_text(completion: ChatCompletionResponse) -> Option<String> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
}
