use crate::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, LanguageModelResult, ModelResponse,
};
use reqwest::Client;

const PROVIDER: &str = "groq";

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq serves an OpenAI-compatible Chat Completions API, so this wraps the
/// `OpenAI` transport with Groq's base URL and provider name.
pub struct GroqModel(OpenAIChatModel);

#[derive(Clone, Default)]
pub struct GroqModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub client: Option<Client>,
}

impl GroqModel {
    #[must_use]
    pub fn new(options: GroqModelOptions) -> Self {
        let GroqModelOptions {
            api_key,
            base_url,
            client,
        } = options;

        Self(
            OpenAIChatModel::new(OpenAIChatModelOptions {
                base_url: Some(base_url.unwrap_or_else(|| GROQ_BASE_URL.to_string())),
                api_key,
                headers: None,
                client,
            })
            .with_provider(PROVIDER),
        )
    }
}

#[async_trait::async_trait]
impl LanguageModel for GroqModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        self.0.generate(input).await
    }
}
