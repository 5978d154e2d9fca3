use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    clients::sse::SseDecoder,
    config::Config,
    models::{
        generation::STORY_TEMPERATURE,
        provider::{
            ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
            GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
            GeminiThinkingConfig, JsonSchemaFormat, Provider, ResponseFormat, StreamOptions,
            TokenUsage,
        },
        retry::RetryConfig,
    },
    prompts::{METADATA_SCHEMA_NAME, STORY_SCHEMA_NAME, metadata_schema, story_schema},
    utils::retry_with_backoff,
};

const OPENAI_DONE: &str = "[DONE]";

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub story_model: String,
    pub metadata_model: String,
}

/// A request for one JSON object matching `schema`.
#[derive(Debug, Clone)]
pub struct ObjectRequest {
    pub provider: Provider,
    pub model: String,
    pub prompt: String,
    pub schema_name: String,
    pub schema: JsonValue,
    pub temperature: Option<f32>,
    /// Enables the provider's reasoning options (OpenAI low effort, Gemini
    /// high thinking level). Only reasoning-capable models accept them.
    pub reasoning: bool,
}

impl ObjectRequest {
    pub fn story(provider: Provider, settings: &ProviderSettings, prompt: String) -> Self {
        Self {
            provider,
            model: settings.story_model.clone(),
            prompt,
            schema_name: STORY_SCHEMA_NAME.to_string(),
            schema: story_schema(),
            temperature: Some(STORY_TEMPERATURE),
            reasoning: true,
        }
    }

    pub fn metadata(provider: Provider, settings: &ProviderSettings, prompt: String) -> Self {
        Self {
            provider,
            model: settings.metadata_model.clone(),
            prompt,
            schema_name: METADATA_SCHEMA_NAME.to_string(),
            schema: metadata_schema(),
            temperature: None,
            reasoning: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectCompletion {
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    google: ProviderSettings,
    openai: ProviderSettings,
    request_timeout: Duration,
    retry_config: RetryConfig,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        // Streams may run long, so only gaps between reads are bounded here.
        // Whole-request deadlines are set per request on the non-streaming path.
        let request_timeout = Duration::from_secs(config.llm_timeout_seconds);
        let http_client = Client::builder()
            .connect_timeout(request_timeout)
            .read_timeout(request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!(
            google_model = %config.google_story_model,
            openai_model = %config.openai_story_model,
            "LLM client initialized"
        );

        Ok(Self {
            http_client,
            google: ProviderSettings {
                base_url: config.google_base_url.trim_end_matches('/').to_string(),
                api_key: config.google_api_key.clone(),
                story_model: config.google_story_model.clone(),
                metadata_model: config.google_metadata_model.clone(),
            },
            openai: ProviderSettings {
                base_url: config.openai_base_url.trim_end_matches('/').to_string(),
                api_key: config.openai_api_key.clone(),
                story_model: config.openai_story_model.clone(),
                metadata_model: config.openai_metadata_model.clone(),
            },
            request_timeout,
            retry_config: config.retry_config(),
        })
    }

    pub fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Google => &self.google,
            Provider::OpenAi => &self.openai,
        }
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.settings(provider)
            .api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    /// Starts a streaming generation. Connection failures and non-success
    /// statuses are retried; once this returns the body is ready to be read.
    pub async fn open_stream(&self, request: &ObjectRequest) -> Result<ObjectStream, Error> {
        debug!(
            provider = %request.provider,
            model = %request.model,
            "Opening streaming object generation"
        );

        let response = self.send_with_retry(request, true).await?;

        Ok(ObjectStream {
            provider: request.provider,
            response,
        })
    }

    /// Requests a complete object in one response and deserializes it.
    pub async fn generate_object<T>(&self, request: &ObjectRequest) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        debug!(
            provider = %request.provider,
            model = %request.model,
            "Generating object"
        );

        let response = self.send_with_retry(request, false).await?;

        let text = match request.provider {
            Provider::OpenAi => {
                let completion: ChatCompletionResponse = response
                    .json()
                    .await
                    .map_err(|e| anyhow!("Failed to parse OpenAI response: {}", e))?;

                completion
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| anyhow!("OpenAI response contained no content"))?
            }
            Provider::Google => {
                let completion: GeminiResponse = response
                    .json()
                    .await
                    .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

                completion.text()
            }
        };

        serde_json::from_str::<T>(&text)
            .map_err(|e| anyhow!("Model output did not match the schema: {}", e))
    }

    async fn send_with_retry(&self, request: &ObjectRequest, stream: bool) -> Result<Response> {
        if !self.is_configured(request.provider) {
            return Err(anyhow!("No API key configured for {}", request.provider));
        }

        retry_with_backoff(&self.retry_config, || {
            let builder = self.request_builder(request, stream);

            async move {
                let response = builder?
                    .send()
                    .await
                    .map_err(|e| anyhow!("Request to {} failed: {}", request.provider, e))?;

                let status = response.status();
                if status.is_success() {
                    Ok(response)
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(anyhow!(
                        "{} returned status {}: {}",
                        request.provider,
                        status,
                        body
                    ))
                }
            }
        })
        .await
    }

    fn request_builder(&self, request: &ObjectRequest, stream: bool) -> Result<RequestBuilder> {
        let settings = self.settings(request.provider);
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("No API key configured for {}", request.provider))?;

        let builder = match request.provider {
            Provider::OpenAi => {
                let body = ChatCompletionRequest {
                    model: request.model.clone(),
                    messages: vec![ChatMessage {
                        role: "user".to_string(),
                        content: request.prompt.clone(),
                    }],
                    temperature: request.temperature,
                    stream,
                    stream_options: stream.then_some(StreamOptions {
                        include_usage: true,
                    }),
                    response_format: ResponseFormat {
                        kind: "json_schema".to_string(),
                        json_schema: JsonSchemaFormat {
                            name: request.schema_name.clone(),
                            strict: true,
                            schema: request.schema.clone(),
                        },
                    },
                    reasoning_effort: request.reasoning.then(|| "low".to_string()),
                };

                self.http_client
                    .post(format!("{}/chat/completions", settings.base_url))
                    .bearer_auth(api_key)
                    .json(&body)
            }
            Provider::Google => {
                let body = GeminiRequest {
                    contents: vec![GeminiContent {
                        role: Some("user".to_string()),
                        parts: vec![GeminiPart {
                            text: Some(request.prompt.clone()),
                            thought: false,
                        }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        temperature: request.temperature,
                        response_mime_type: "application/json".to_string(),
                        response_json_schema: request.schema.clone(),
                        thinking_config: request.reasoning.then(|| GeminiThinkingConfig {
                            thinking_level: "high".to_string(),
                            include_thoughts: false,
                        }),
                    },
                };

                let url = if stream {
                    format!(
                        "{}/models/{}:streamGenerateContent?alt=sse",
                        settings.base_url, request.model
                    )
                } else {
                    format!(
                        "{}/models/{}:generateContent",
                        settings.base_url, request.model
                    )
                };

                self.http_client
                    .post(url)
                    .header("x-goog-api-key", api_key)
                    .json(&body)
            }
        };

        if stream {
            Ok(builder)
        } else {
            Ok(builder.timeout(self.request_timeout))
        }
    }
}

/// An open provider response whose body is a server-sent event stream.
pub struct ObjectStream {
    provider: Provider,
    response: Response,
}

impl ObjectStream {
    /// Reads the stream to the end, sending every text delta to `tx` and
    /// returning the accumulated text. Fails if `tx` is closed, which means
    /// the consumer went away.
    pub async fn forward(self, tx: &mpsc::Sender<String>) -> Result<ObjectCompletion, Error> {
        let provider = self.provider;
        let mut body = std::pin::pin!(self.response.bytes_stream());
        let mut decoder = SseDecoder::new();
        let mut completion = ObjectCompletion::default();
        let mut done = false;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| anyhow!("Stream from {} broke: {}", provider, e))?;

            for event in decoder.push(&chunk) {
                done = apply_event(provider, &event, &mut completion, tx).await?;
                if done {
                    break;
                }
            }

            if done {
                break;
            }
        }

        if !done {
            if let Some(event) = decoder.finish() {
                apply_event(provider, &event, &mut completion, tx).await?;
            }
        }

        debug!(
            provider = %provider,
            characters = completion.text.chars().count(),
            total_tokens = completion.usage.total_tokens,
            "Streaming object generation finished"
        );

        Ok(completion)
    }
}

/// Applies one SSE payload. Returns `true` on the OpenAI terminal marker.
async fn apply_event(
    provider: Provider,
    event: &str,
    completion: &mut ObjectCompletion,
    tx: &mpsc::Sender<String>,
) -> Result<bool, Error> {
    let (delta, usage) = match provider {
        Provider::OpenAi => {
            if event.trim() == OPENAI_DONE {
                return Ok(true);
            }

            let chunk: ChatCompletionChunk = serde_json::from_str(event)
                .map_err(|e| anyhow!("Malformed OpenAI stream chunk: {}", e))?;

            let delta = chunk
                .choices
                .into_iter()
                .filter_map(|choice| choice.delta.content)
                .collect::<String>();

            (delta, chunk.usage.map(TokenUsage::from))
        }
        Provider::Google => {
            let chunk: GeminiResponse = serde_json::from_str(event)
                .map_err(|e| anyhow!("Malformed Gemini stream chunk: {}", e))?;

            (chunk.text(), chunk.usage_metadata.map(TokenUsage::from))
        }
    };

    if let Some(usage) = usage {
        completion.usage = usage;
    }

    if !delta.is_empty() {
        completion.text.push_str(&delta);

        if tx.send(delta).await.is_err() {
            warn!(provider = %provider, "Stream consumer disconnected, aborting generation");
            return Err(anyhow!("Stream consumer disconnected"));
        }
    }

    Ok(false)
}
