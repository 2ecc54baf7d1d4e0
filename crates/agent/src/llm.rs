use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clerky_core::config::{LlmConfig, LlmProvider};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";
const DEFAULT_ANTHROPIC_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const MAX_COMPLETION_TOKENS: u32 = 1024;

/// Completion client backed by an HTTP provider. Every request is a single
/// user message; the reply text is returned as-is. There is no retry policy:
/// a provider failure aborts the turn.
pub struct HttpCompletionClient {
    client: Client,
    provider: LlmProvider,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl HttpCompletionClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build http client")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| match config.provider {
                LlmProvider::OpenAi => DEFAULT_OPENAI_BASE.to_string(),
                LlmProvider::Anthropic => DEFAULT_ANTHROPIC_BASE.to_string(),
                // Config validation requires a base_url for ollama.
                LlmProvider::Ollama => String::new(),
            })
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            provider: config.provider,
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or_else(|| anyhow!("provider {:?} requires an api key", self.provider))
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = OpenAiChatRequest {
            model: self.model.clone(),
            messages: vec![ChatTurn { role: "user".to_string(), content: prompt.to_string() }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("openai api error (http {status}): {detail}"));
        }

        let parsed: OpenAiChatResponse =
            response.json().await.context("failed to parse openai response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("openai response contained no choices"))
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = AnthropicMessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_COMPLETION_TOKENS,
            messages: vec![ChatTurn { role: "user".to_string(), content: prompt.to_string() }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key()?)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("anthropic api error (http {status}): {detail}"));
        }

        let parsed: AnthropicMessagesResponse =
            response.json().await.context("failed to parse anthropic response")?;
        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(anyhow!("anthropic response contained no text content"));
        }
        Ok(text)
    }

    async fn complete_ollama(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![ChatTurn { role: "user".to_string(), content: prompt.to_string() }],
            stream: false,
        };

        let response =
            self.client.post(&url).json(&body).send().await.context("ollama request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("ollama api error (http {status}): {detail}"));
        }

        let parsed: OllamaChatResponse =
            response.json().await.context("failed to parse ollama response")?;
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAi => self.complete_openai(prompt).await,
            LlmProvider::Anthropic => self.complete_anthropic(prompt).await,
            LlmProvider::Ollama => self.complete_ollama(prompt).await,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatTurn {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: ChatTurn,
}

#[derive(Debug, Serialize)]
struct AnthropicMessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct AnthropicMessagesResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatTurn>,
    /// Disable streaming so the endpoint returns a single response object.
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatTurn,
}


#[cfg(test)]
mod tests {
    use clerky_core::config::{LlmConfig, LlmProvider};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{CompletionClient, HttpCompletionClient};

    fn config(provider: LlmProvider, base_url: &str) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: Some("test-key".to_string().into()),
            base_url: Some(base_url.to_string()),
            model: "test-model".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn openai_reply_text_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "RETRIEVE_PRODUCT"}}]
            })))
            .mount(&server)
            .await;

        let client = HttpCompletionClient::from_config(&config(LlmProvider::OpenAi, &server.uri()))
            .expect("client builds");
        let reply = client.complete("classify this").await.expect("completion succeeds");

        assert_eq!(reply, "RETRIEVE_PRODUCT");
    }

    #[tokio::test]
    async fn anthropic_text_blocks_are_joined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "text", "text": "NO_ORDER"},
                    {"type": "text", "text": "_NUMBER"}
                ]
            })))
            .mount(&server)
            .await;

        let client =
            HttpCompletionClient::from_config(&config(LlmProvider::Anthropic, &server.uri()))
                .expect("client builds");
        let reply = client.complete("extract the order number").await.expect("completion succeeds");

        assert_eq!(reply, "NO_ORDER_NUMBER");
    }

    #[tokio::test]
    async fn ollama_message_content_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": "iPhone 15 Pro"}
            })))
            .mount(&server)
            .await;

        let client = HttpCompletionClient::from_config(&config(LlmProvider::Ollama, &server.uri()))
            .expect("client builds");
        let reply = client.complete("extract the product").await.expect("completion succeeds");

        assert_eq!(reply, "iPhone 15 Pro");
    }

    #[tokio::test]
    async fn provider_error_statuses_surface_as_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let client = HttpCompletionClient::from_config(&config(LlmProvider::Ollama, &server.uri()))
            .expect("client builds");
        let error = client.complete("anything").await.expect_err("http 500 must fail the call");

        assert!(error.to_string().contains("500"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_the_call() {
        let client =
            HttpCompletionClient::from_config(&config(LlmProvider::Ollama, "http://127.0.0.1:1"))
                .expect("client builds");
        let error = client.complete("anything").await.expect_err("connection must fail");

        assert!(error.to_string().contains("ollama request failed"), "unexpected error: {error}");
    }
}
