use super::api::{GenerateOptions, GenerateRequest, GenerateResponse};
use crate::{
    client_utils, LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult,
    ModelResponse, ModelUsage,
};
use reqwest::{header::HeaderMap, Client};

const PROVIDER: &str = "local";

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// A self-hosted Ollama server. No credentials; the base URL is the only
/// configuration.
pub struct OllamaModel {
    base_url: String,
    client: Client,
}

#[derive(Clone, Default)]
pub struct OllamaModelOptions {
    pub base_url: Option<String>,
    pub client: Option<Client>,
}

impl OllamaModel {
    #[must_use]
    pub fn new(options: OllamaModelOptions) -> Self {
        let OllamaModelOptions { base_url, client } = options;

        let base_url = base_url
            .unwrap_or_else(|| OLLAMA_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            client: client.unwrap_or_else(Client::new),
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for OllamaModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        crate::opentelemetry::trace_generate(PROVIDER, input, |input| async move {
            let request = convert_to_generate_request(&input);

            let response: GenerateResponse = client_utils::send_json(
                &self.client,
                &format!("{}/api/generate", self.base_url),
                &request,
                HeaderMap::new(),
                input.timeout,
            )
            .await?;

            map_generate_response(response)
        })
        .await
    }
}

fn convert_to_generate_request(input: &LanguageModelInput) -> GenerateRequest {
    let options = if input.temperature.is_some() || input.max_tokens.is_some() {
        Some(GenerateOptions {
            temperature: input.temperature,
            num_predict: input.max_tokens,
        })
    } else {
        None
    };

    GenerateRequest {
        model: input.model_id.clone(),
        prompt: input.prompt.clone(),
        system: input.system_prompt.clone(),
        stream: false,
        options,
    }
}

fn map_generate_response(response: GenerateResponse) -> LanguageModelResult<ModelResponse> {
    if response.response.trim().is_empty() {
        return Err(LanguageModelError::Invariant(
            PROVIDER,
            "Empty response from local model".to_string(),
        ));
    }

    let usage = match (response.prompt_eval_count, response.eval_count) {
        (None, None) => None,
        (input_tokens, output_tokens) => Some(ModelUsage {
            input_tokens: input_tokens.unwrap_or(0),
            output_tokens: output_tokens.unwrap_or(0),
        }),
    };

    Ok(ModelResponse {
        text: response.response,
        model_id: response.model,
        usage,
    })
}
