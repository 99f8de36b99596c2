use crate::{
    classifier::{self, ErrorKind, Operation},
    config::{self, BackendConfig},
    confidence::ConfidenceScorer,
    parser,
    prompt::{self, Prompt},
    BackendError, BackendResult, CostTier, Generated, GenerationOptions, ParseError,
    ParsedDeckSlide, ParsedSlide, ProviderDescriptor, ProviderStatus, SlideContext, SlideType,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slidegen_sdk::{LanguageModel, LanguageModelInput, ModelResponse};
use std::{fmt, future::Future, str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// The closed set of upstream backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Cloud backend authenticated with an API key.
    OpenAI,
    /// Free cloud backend with tight rate limits.
    Groq,
    /// Self-hosted Ollama server.
    Local,
}

impl BackendKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Groq => "groq",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "groq" => Ok(Self::Groq),
            "local" | "ollama" => Ok(Self::Local),
            other => Err(format!("Unknown backend: {other}")),
        }
    }
}

/// The capability set every backend exposes.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    async fn generate_slide_content(
        &self,
        slide_type: SlideType,
        context: &SlideContext,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<ParsedSlide>>;

    async fn generate_freeform_deck(
        &self,
        prompt: &str,
        preferences: Option<&Value>,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<Vec<ParsedDeckSlide>>>;

    async fn generate_chat_response(
        &self,
        message: &str,
        deck_context: &Value,
        slide_context: Option<&Value>,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<String>>;

    /// Live probe with a short timeout.
    async fn status(&self) -> ProviderStatus;

    /// One descriptor per model tier, stamped with `status`.
    fn describe(&self, status: ProviderStatus) -> Vec<ProviderDescriptor>;
}

/// A public model name and the backend-native model behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTier {
    pub public_id: &'static str,
    pub native_id: &'static str,
    pub display_name: &'static str,
}

/// Static description of one backend variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendProfile {
    pub kind: BackendKind,
    pub tiers: &'static [ModelTier],
    pub default_model: &'static str,
    /// Used once when the default model fails.
    pub fallback_model: &'static str,
    pub baseline_confidence: f64,
    pub cost_tier: CostTier,
    pub is_local: bool,
    pub requires_api_key: bool,
    /// Whether a caller-supplied key in [`GenerationOptions::api_key`] is used.
    pub accepts_key_override: bool,
}

impl BackendProfile {
    /// Map a public model name (or a native one) onto a native model.
    #[must_use]
    pub fn native_model(&self, requested: &str) -> Option<&'static str> {
        self.tiers
            .iter()
            .find(|tier| tier.public_id == requested || tier.native_id == requested)
            .map(|tier| tier.native_id)
    }
}

/// Per-call defaults that differ by operation.
#[derive(Debug, Clone, Copy)]
struct CallSettings {
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl CallSettings {
    const SLIDE: Self = Self {
        max_tokens: 1000,
        temperature: 0.7,
        timeout: Duration::from_secs(60),
    };
    const DECK: Self = Self {
        max_tokens: 4000,
        temperature: 0.7,
        timeout: Duration::from_secs(60),
    };
    const CHAT: Self = Self {
        max_tokens: 500,
        temperature: 0.7,
        timeout: Duration::from_secs(30),
    };
    const STATUS: Self = Self {
        max_tokens: 1,
        temperature: 0.0,
        timeout: Duration::from_secs(5),
    };
}

/// A [`Backend`] driven by a [`LanguageModel`] transport. The three variants
/// share this implementation and differ only in their [`BackendProfile`] and
/// transport.
pub struct ModelBackend {
    profile: &'static BackendProfile,
    model: Arc<dyn LanguageModel>,
    api_key: Option<String>,
    default_model: String,
    unconfigured: Option<String>,
    scorer: ConfidenceScorer,
}

impl ModelBackend {
    #[must_use]
    pub fn new(
        profile: &'static BackendProfile,
        model: Arc<dyn LanguageModel>,
        config: &BackendConfig,
    ) -> Self {
        let default_model = config
            .default_model
            .as_deref()
            .filter(|model| !config::is_placeholder(model))
            .map_or(profile.default_model, |model| {
                profile.native_model(model).unwrap_or(model)
            })
            .to_string();

        Self {
            profile,
            model,
            api_key: config.api_key.clone(),
            default_model,
            unconfigured: (!config.enabled).then(|| "backend is disabled".to_string()),
            scorer: ConfidenceScorer::default(),
        }
    }

    /// Mark the backend as unusable; every operation fails fast.
    #[must_use]
    pub fn unconfigured(mut self, reason: impl Into<String>) -> Self {
        self.unconfigured = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: ConfidenceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    #[must_use]
    pub fn profile(&self) -> &'static BackendProfile {
        self.profile
    }

    /// The native model used when the request names none this backend knows.
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Native model for a requested public model; unknown names resolve to
    /// the default model.
    #[must_use]
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        requested
            .and_then(|requested| self.profile.native_model(requested))
            .map_or_else(|| self.default_model.clone(), str::to_string)
    }

    /// The API key to send, or a configuration error.
    fn credentials(&self, options: &GenerationOptions) -> BackendResult<Option<String>> {
        if let Some(reason) = &self.unconfigured {
            return Err(BackendError::NotConfigured(self.name(), reason.clone()));
        }
        if !self.profile.requires_api_key {
            return Ok(None);
        }

        fn usable(key: Option<&str>) -> Option<&str> {
            key.filter(|key| !config::is_placeholder(key))
        }

        let override_key = if self.profile.accepts_key_override {
            usable(options.api_key.as_deref())
        } else {
            None
        };

        override_key
            .or_else(|| usable(self.api_key.as_deref()))
            .map(|key| Some(key.to_string()))
            .ok_or_else(|| BackendError::NotConfigured(self.name(), "missing API key".to_string()))
    }

    async fn complete(
        &self,
        model_id: &str,
        prompt: &Prompt,
        api_key: Option<&str>,
        options: &GenerationOptions,
        settings: CallSettings,
    ) -> BackendResult<ModelResponse> {
        let input = LanguageModelInput {
            model_id: model_id.to_string(),
            system_prompt: Some(prompt.system.to_string()),
            prompt: prompt.user.clone(),
            max_tokens: Some(options.max_tokens.unwrap_or(settings.max_tokens)),
            temperature: Some(options.temperature.unwrap_or(settings.temperature)),
            api_key: api_key.map(str::to_string),
            timeout: Some(settings.timeout),
        };

        let response = self.model.generate(input).await?;
        if response.text.trim().is_empty() {
            return Err(BackendError::InvalidResponse(
                self.name(),
                "empty response payload".to_string(),
            ));
        }
        Ok(response)
    }

    /// Run `attempt` on the resolved model. A failure on the default model
    /// with an unused retry counter is retried exactly once on the fallback
    /// model, unless the default already is the fallback; every other
    /// failure propagates.
    async fn with_fallback_model<T, F, Fut>(
        &self,
        operation: Operation,
        options: &GenerationOptions,
        attempt: F,
    ) -> BackendResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let model_id = self.resolve_model(options.model.as_deref());
        let can_fall_back =
            model_id == self.default_model && model_id != self.profile.fallback_model;

        match attempt(model_id.clone()).await {
            Ok(value) => Ok(value),
            Err(error) if can_fall_back && options.retry_count == 0 => {
                let classified = classifier::classify(error, self.name(), operation);
                warn!(
                    provider = self.name(),
                    operation = operation.as_str(),
                    kind = %classified.kind,
                    failed_model = %model_id,
                    fallback_model = self.profile.fallback_model,
                    retry_count = options.retry_count + 1,
                    error = %classified.cause,
                    "default model failed, retrying with fallback model"
                );
                attempt(self.profile.fallback_model.to_string()).await
            }
            Err(error) => Err(error),
        }
    }

    fn generated<T>(&self, content: T, response: &ModelResponse, model_id: String) -> Generated<T> {
        Generated {
            content,
            model: model_id,
            tokens_used: response.usage.as_ref().map(slidegen_sdk::ModelUsage::total_tokens),
            confidence: Some(
                self.scorer
                    .score(&response.text, self.profile.baseline_confidence),
            ),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ModelBackend {
    fn kind(&self) -> BackendKind {
        self.profile.kind
    }

    async fn generate_slide_content(
        &self,
        slide_type: SlideType,
        context: &SlideContext,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<ParsedSlide>> {
        let api_key = self.credentials(options)?;
        let api_key = api_key.as_deref();
        let prompt = &prompt::slide_prompt(slide_type, context);

        self.with_fallback_model(Operation::GenerateSlide, options, |model_id| async move {
            let response = self
                .complete(&model_id, prompt, api_key, options, CallSettings::SLIDE)
                .await?;
            let slide = parser::parse_single(&response.text, slide_type)
                .map_err(|error| BackendError::Parse(self.name(), error))?;
            Ok(self.generated(slide, &response, model_id))
        })
        .await
    }

    async fn generate_freeform_deck(
        &self,
        prompt: &str,
        preferences: Option<&Value>,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<Vec<ParsedDeckSlide>>> {
        let api_key = self.credentials(options)?;
        let api_key = api_key.as_deref();
        let prompt = &prompt::deck_prompt(prompt, preferences);

        self.with_fallback_model(
            Operation::GenerateFreeformDeck,
            options,
            |model_id| async move {
                let response = self
                    .complete(&model_id, prompt, api_key, options, CallSettings::DECK)
                    .await?;
                let slides = parser::parse_deck(&response.text);
                if slides.is_empty() {
                    return Err(BackendError::Parse(self.name(), ParseError::NoSlides));
                }
                Ok(self.generated(slides, &response, model_id))
            },
        )
        .await
    }

    async fn generate_chat_response(
        &self,
        message: &str,
        deck_context: &Value,
        slide_context: Option<&Value>,
        options: &GenerationOptions,
    ) -> BackendResult<Generated<String>> {
        let api_key = self.credentials(options)?;
        let api_key = api_key.as_deref();
        let prompt = &prompt::chat_prompt(message, deck_context, slide_context);

        self.with_fallback_model(Operation::GenerateChat, options, |model_id| async move {
            let response = self
                .complete(&model_id, prompt, api_key, options, CallSettings::CHAT)
                .await?;
            let reply = response.text.trim().to_string();
            Ok(self.generated(reply, &response, model_id))
        })
        .await
    }

    async fn status(&self) -> ProviderStatus {
        let options = GenerationOptions::default();
        let probe = async {
            let api_key = self.credentials(&options)?;
            self.complete(
                &self.default_model,
                &prompt::status_prompt(),
                api_key.as_deref(),
                &options,
                CallSettings::STATUS,
            )
            .await
        };

        match probe.await {
            Ok(_) => ProviderStatus::Available,
            Err(error) => {
                let classified = classifier::classify(error, self.name(), Operation::Status);
                debug!(
                    provider = self.name(),
                    kind = %classified.kind,
                    error = %classified.cause,
                    "status probe failed"
                );
                if classified.kind == ErrorKind::QuotaExceeded {
                    ProviderStatus::QuotaExceeded
                } else {
                    ProviderStatus::Unavailable
                }
            }
        }
    }

    fn describe(&self, status: ProviderStatus) -> Vec<ProviderDescriptor> {
        self.profile
            .tiers
            .iter()
            .map(|tier| ProviderDescriptor {
                name: tier.public_id.to_string(),
                display_name: tier.display_name.to_string(),
                supported_models: vec![tier.native_id.to_string()],
                cost_tier: self.profile.cost_tier,
                is_local: self.profile.is_local,
                status,
            })
            .collect()
    }
}
