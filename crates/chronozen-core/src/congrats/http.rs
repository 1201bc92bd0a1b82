//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::Url;

use super::{keyring_store, CongratsMessage, CongratsRequest, MessageGenerator};
use crate::error::GeneratorError;
use crate::storage::CongratsConfig;

pub struct HttpMessageGenerator {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpMessageGenerator {
    pub fn new(endpoint: Url, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model: model.into(),
            api_key,
        }
    }

    /// Build from config, resolving the API key from the configured
    /// environment variable first and the OS keyring second.
    ///
    /// Loopback endpoints (local model servers) may run without a key.
    ///
    /// # Errors
    /// Returns an error if the generator is disabled, the endpoint is not a
    /// valid URL, or a remote endpoint has no key.
    pub fn from_config(config: &CongratsConfig) -> Result<Self, GeneratorError> {
        if !config.enabled {
            return Err(GeneratorError::Disabled);
        }
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| GeneratorError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;

        let api_key = resolve_api_key(&config.api_key_env);
        if api_key.is_none() && !is_loopback(&endpoint) {
            return Err(GeneratorError::MissingApiKey {
                env: config.api_key_env.clone(),
            });
        }
        Ok(Self::new(endpoint, config.model.clone(), api_key))
    }

    fn prompt(name: &str) -> String {
        format!(
            "Generate a short, fun, and encouraging message for a user named {name} who just completed a task."
        )
    }
}

#[async_trait]
impl MessageGenerator for HttpMessageGenerator {
    async fn generate(&self, request: CongratsRequest) -> Result<CongratsMessage, GeneratorError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "Reply with the message only, one or two sentences, personalised with the user's name."
                },
                { "role": "user", "content": Self::prompt(&request.name) }
            ],
            "max_tokens": 60,
        });

        let mut req = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        let message = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .map(|s| s.trim().trim_matches('"').trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(GeneratorError::EmptyResponse)?;

        Ok(CongratsMessage { message })
    }
}

/// The key from `env_var`, else the keyring entry. An unusable keyring
/// (no secret service, headless session) counts as no key.
fn resolve_api_key(env_var: &str) -> Option<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => return Some(key),
        _ => {}
    }
    match keyring_store::get(keyring_store::API_KEY_ENTRY) {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "keyring unavailable, continuing without API key");
            None
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]" | "::1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(server: &mockito::ServerGuard, key: Option<&str>) -> HttpMessageGenerator {
        let endpoint = Url::parse(&format!("{}/v1/chat/completions", server.url())).unwrap();
        HttpMessageGenerator::new(endpoint, "test-model", key.map(str::to_string))
    }

    fn request() -> CongratsRequest {
        CongratsRequest { name: "Ada".into() }
    }

    #[tokio::test]
    async fn parses_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::Regex("named Ada".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" \"Another one bites the dust, Ada!\" "}}]}"#)
            .create_async()
            .await;

        let reply = generator(&server, Some("sk-test")).generate(request()).await.unwrap();
        assert_eq!(reply.message, "Another one bites the dust, Ada!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = generator(&server, None).generate(request()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = generator(&server, None).generate(request()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::EmptyResponse));
    }

    #[test]
    fn disabled_config_is_rejected() {
        let config = CongratsConfig {
            enabled: false,
            ..CongratsConfig::default()
        };
        assert!(matches!(
            HttpMessageGenerator::from_config(&config),
            Err(GeneratorError::Disabled)
        ));
    }

    #[test]
    fn loopback_endpoint_needs_no_key() {
        let config = CongratsConfig {
            endpoint: "http://localhost:11434/v1/chat/completions".into(),
            api_key_env: "CHRONOZEN_TEST_UNSET_KEY".into(),
            ..CongratsConfig::default()
        };
        assert!(HttpMessageGenerator::from_config(&config).is_ok());
        assert!(is_loopback(&Url::parse(&config.endpoint).unwrap()));
        assert!(!is_loopback(&Url::parse("https://api.openai.com/v1").unwrap()));
    }

    #[test]
    fn env_key_wins_over_keyring() {
        std::env::set_var("CHRONOZEN_TEST_SET_KEY", "sk-test");
        assert_eq!(
            resolve_api_key("CHRONOZEN_TEST_SET_KEY").as_deref(),
            Some("sk-test")
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = CongratsConfig {
            endpoint: "not a url".into(),
            ..CongratsConfig::default()
        };
        assert!(matches!(
            HttpMessageGenerator::from_config(&config),
            Err(GeneratorError::InvalidEndpoint(_))
        ));
    }
}
