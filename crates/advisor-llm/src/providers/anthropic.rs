//! Anthropic Claude provider implementation
//!
//! Implements [`TextGenerator`] against the Messages API. The prompt is sent
//! as a single user message and the returned text blocks are concatenated.
//! See: https://docs.anthropic.com/en/api/messages

use crate::{GenerationParams, LLMError, Result, TextGenerator, TokenObserver};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider for a fixed model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create a provider from the `ANTHROPIC_API_KEY` environment variable
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            LLMError::ConfigurationError(
                "ANTHROPIC_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key, model)
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams, stream: bool) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            messages: vec![RequestMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            stop_sequences: if params.stop_sequences.is_empty() {
                None
            } else {
                Some(params.stop_sequences.clone())
            },
            stream,
        }
    }

    async fn post(&self, request: &MessagesRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{ANTHROPIC_API_BASE}/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model.clone()),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        Ok(response)
    }

    async fn generate_blocking(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = self.build_request(prompt, params, false);
        let response = self.post(&request).await?;

        let body: MessagesResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        debug!(
            stop_reason = %body.stop_reason,
            input_tokens = body.usage.input_tokens,
            output_tokens = body.usage.output_tokens,
            "Received response"
        );

        Ok(body
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
            })
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn generate_streaming(
        &self,
        prompt: &str,
        params: &GenerationParams,
        observer: &dyn TokenObserver,
    ) -> Result<String> {
        let request = self.build_request(prompt, params, true);
        let response = self.post(&request).await?;

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut assembled = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // SSE events are separated by a blank line
            while let Some(boundary) = buffer.find("\n\n") {
                let event: String = buffer.drain(..boundary + 2).collect();
                for line in event.lines() {
                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let Ok(payload) = serde_json::from_str::<StreamEvent>(data) else {
                        continue;
                    };
                    if let StreamEvent::ContentBlockDelta {
                        delta: Delta::TextDelta { text },
                    } = payload
                    {
                        observer.on_token(&text);
                        assembled.push_str(&text);
                    }
                }
            }
        }

        Ok(assembled)
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    #[instrument(skip(self, prompt, params, observer), fields(model = %self.model))]
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        observer: Option<&dyn TokenObserver>,
    ) -> Result<String> {
        debug!(prompt_length = prompt.len(), "Sending request to Anthropic API");

        match observer {
            Some(observer) => self.generate_streaming(prompt, params, observer).await,
            None => self.generate_blocking(prompt, params).await,
        }
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

// Anthropic-specific request/response types
// These match the Anthropic API format exactly

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<RequestMessage>,
    max_tokens: usize,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: String,
    usage: UsageResponse,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct UsageResponse {
    input_tokens: usize,
    output_tokens: usize,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
}
