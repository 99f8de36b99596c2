use super::api::{
    ChatCompletionRequestMessage, CompletionUsage, CreateChatCompletionRequest,
    CreateChatCompletionResponse,
};
use crate::{
    client_utils, LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult,
    ModelResponse, ModelUsage,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "openai";

/// A Chat Completions transport. Works against `OpenAI` and any backend that
/// speaks the same protocol under a different base URL.
pub struct OpenAIChatModel {
    provider: &'static str,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIChatModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIChatModel {
    #[must_use]
    pub fn new(options: OpenAIChatModelOptions) -> Self {
        let OpenAIChatModelOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            provider: PROVIDER,
            api_key,
            base_url,
            client,
            headers,
        }
    }

    /// Report errors and spans under a different provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: &'static str) -> Self {
        self.provider = provider;
        self
    }

    fn request_headers(&self, api_key: &str) -> LanguageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_header = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|error| {
            LanguageModelError::InvalidInput(format!(
                "Invalid {} API key header value: {error}",
                self.provider
            ))
        })?;
        headers.insert(header::AUTHORIZATION, auth_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid {} header name '{key}': {error}",
                    self.provider
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid {} header value for '{key}': {error}",
                    self.provider
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAIChatModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        crate::opentelemetry::trace_generate(self.provider, input, |input| async move {
            let api_key = input.api_key.as_deref().unwrap_or(&self.api_key);
            let headers = self.request_headers(api_key)?;
            let request = convert_to_chat_completion_request(&input);

            let response: CreateChatCompletionResponse = client_utils::send_json(
                &self.client,
                &format!("{}/chat/completions", self.base_url),
                &request,
                headers,
                input.timeout,
            )
            .await?;

            map_chat_completion_response(self.provider, response)
        })
        .await
    }
}

fn convert_to_chat_completion_request(input: &LanguageModelInput) -> CreateChatCompletionRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = &input.system_prompt {
        messages.push(ChatCompletionRequestMessage::System {
            content: system_prompt.clone(),
        });
    }
    messages.push(ChatCompletionRequestMessage::User {
        content: input.prompt.clone(),
    });

    CreateChatCompletionRequest {
        model: input.model_id.clone(),
        messages,
        max_tokens: input.max_tokens,
        temperature: input.temperature,
        stream: false,
    }
}

fn map_chat_completion_response(
    provider: &'static str,
    response: CreateChatCompletionResponse,
) -> LanguageModelResult<ModelResponse> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        LanguageModelError::Invariant(provider, "No choices in response".to_string())
    })?;

    let message = choice.message;

    if let Some(refusal) = &message.refusal {
        if !refusal.is_empty() {
            return Err(LanguageModelError::Refusal(refusal.clone()));
        }
    }

    let text = message.content.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LanguageModelError::Invariant(
            provider,
            "Empty content in response".to_string(),
        ));
    }

    Ok(ModelResponse {
        text,
        model_id: response.model,
        usage: response.usage.map(map_openai_usage),
    })
}

fn map_openai_usage(usage: CompletionUsage) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    }
}
