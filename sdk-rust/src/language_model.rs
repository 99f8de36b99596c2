use crate::{LanguageModelInput, LanguageModelResult, ModelResponse};

/// A text-generation transport for one upstream backend.
///
/// The model to call is chosen per request through
/// [`LanguageModelInput::model_id`], so a single instance serves every
/// model the backend exposes.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse>;
}
