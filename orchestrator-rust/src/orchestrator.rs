use crate::{
    backend::{Backend, BackendKind},
    backends,
    classifier::{self, Operation},
    config::{OrchestratorConfig, DEFAULT_ORDER},
    opentelemetry::GenerationSpan,
    BackendError, BackendResult, ContentKind, Generated, GeneratedContent, GenerationOptions,
    GenerationRequest, GenerationResult, ProviderDescriptor, SlideContext, SlideType,
    ALL_PROVIDERS_FAILED,
};
use futures::{
    future::{join_all, ready},
    pin_mut, stream, StreamExt,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_futures::Instrument;

/// Error reported when a caller cancels the request.
pub const GENERATION_CANCELLED: &str = "Generation cancelled";

/// Compute the order in which backends are tried for a requested model.
///
/// Local model names (and the literal `local`) put the local backend first,
/// `groq-` models put Groq first, and anything else uses `default_order`.
#[must_use]
pub fn backend_order(model: Option<&str>, default_order: &[BackendKind]) -> Vec<BackendKind> {
    match model {
        Some(model) if backends::local::is_local_model(model) => {
            vec![BackendKind::Local, BackendKind::Groq, BackendKind::OpenAI]
        }
        Some(model) if model.starts_with(backends::groq::MODEL_PREFIX) => {
            vec![BackendKind::Groq, BackendKind::OpenAI, BackendKind::Local]
        }
        _ => default_order.to_vec(),
    }
}

/// Outcome of trying one backend.
enum Attempt {
    Succeeded(GenerationResult),
    Failed,
    Cancelled,
}

/// Drives generation requests across an ordered list of backends, stopping
/// at the first success.
///
/// Holds only read-only configuration, so one instance can serve concurrent
/// calls.
pub struct GenerationOrchestrator {
    backends: Vec<Arc<dyn Backend>>,
    default_order: Vec<BackendKind>,
}

impl GenerationOrchestrator {
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn Backend>>) -> Self {
        Self {
            backends,
            default_order: DEFAULT_ORDER.to_vec(),
        }
    }

    /// Build the three standard backends from configuration.
    #[must_use]
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(vec![
            Arc::new(backends::groq::backend(&config.groq)),
            Arc::new(backends::openai::backend(&config.openai)),
            Arc::new(backends::local::backend(&config.local)),
        ])
        .with_default_order(config.default_order.clone())
    }

    #[must_use]
    pub fn with_default_order(mut self, default_order: Vec<BackendKind>) -> Self {
        self.default_order = default_order;
        self
    }

    #[must_use]
    pub fn order_for(&self, model: Option<&str>) -> Vec<BackendKind> {
        backend_order(model, &self.default_order)
    }

    fn backend(&self, kind: BackendKind) -> Option<&Arc<dyn Backend>> {
        self.backends.iter().find(|backend| backend.kind() == kind)
    }

    pub async fn generate_slide(
        &self,
        slide_type: SlideType,
        context: SlideContext,
        options: GenerationOptions,
    ) -> GenerationResult {
        self.generate(GenerationRequest::Slide {
            slide_type,
            context,
            options,
        })
        .await
    }

    pub async fn generate_freeform_deck(
        &self,
        prompt: impl Into<String>,
        preferences: Option<Value>,
        options: GenerationOptions,
    ) -> GenerationResult {
        self.generate(GenerationRequest::FreeformDeck {
            prompt: prompt.into(),
            preferences,
            options,
        })
        .await
    }

    pub async fn generate_chat(
        &self,
        message: impl Into<String>,
        deck_context: Value,
        slide_context: Option<Value>,
        options: GenerationOptions,
    ) -> GenerationResult {
        self.generate(GenerationRequest::Chat {
            message: message.into(),
            deck_context,
            slide_context,
            options,
        })
        .await
    }

    /// Try each backend in order and return the first success. Failures are
    /// classified and logged, never returned; exhaustion yields
    /// [`ALL_PROVIDERS_FAILED`].
    pub async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let options = request.options();
        let order = self.order_for(options.model.as_deref());
        let mut span = GenerationSpan::new(request.kind(), options.model.as_deref());
        debug!(
            content_kind = request.kind().as_str(),
            order = ?order,
            "generating content"
        );

        let tracing_span = span.span();
        let outcome = {
            let attempts = stream::iter(order)
                .filter_map(|kind| ready(self.backend(kind)))
                .then(|backend| {
                    span.on_attempt();
                    attempt(backend.as_ref(), &request)
                })
                .skip_while(|attempt| ready(matches!(attempt, Attempt::Failed)));
            pin_mut!(attempts);
            attempts.next().instrument(tracing_span).await
        };

        let result = match outcome {
            Some(Attempt::Succeeded(result)) => result,
            Some(Attempt::Cancelled) => GenerationResult::failed(GENERATION_CANCELLED),
            Some(Attempt::Failed) | None => {
                warn!(
                    content_kind = request.kind().as_str(),
                    "all backends failed"
                );
                GenerationResult::failed(ALL_PROVIDERS_FAILED)
            }
        };

        span.on_end(&result);
        result
    }

    /// Descriptors for every model tier, each stamped with a live status.
    /// Backends are probed concurrently.
    pub async fn list_providers(&self) -> Vec<ProviderDescriptor> {
        let probes = self.backends.iter().map(|backend| async move {
            let status = backend.status().await;
            backend.describe(status)
        });

        join_all(probes).await.into_iter().flatten().collect()
    }
}

async fn attempt(backend: &dyn Backend, request: &GenerationRequest) -> Attempt {
    let options = request.options();
    if options.is_cancelled() {
        return Attempt::Cancelled;
    }

    let call = dispatch(backend, request);
    let result = match &options.cancellation_token {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(BackendError::Cancelled),
                result = call => result,
            }
        }
        None => call.await,
    };

    match result.and_then(|generated| validate(backend.name(), generated)) {
        Ok(generated) => {
            info!(
                provider = backend.name(),
                model = %generated.model,
                tokens_used = ?generated.tokens_used,
                confidence = ?generated.confidence,
                "generation succeeded"
            );
            Attempt::Succeeded(GenerationResult::succeeded(backend.name(), generated))
        }
        Err(BackendError::Cancelled) => {
            info!(provider = backend.name(), "generation cancelled");
            Attempt::Cancelled
        }
        Err(error) => {
            let classified = classifier::classify(error, backend.name(), operation(request));
            warn!(
                provider = %classified.provider,
                operation = classified.operation.as_str(),
                kind = %classified.kind,
                retryable = classified.retryable,
                error = %classified.cause,
                "backend attempt failed"
            );
            Attempt::Failed
        }
    }
}

fn operation(request: &GenerationRequest) -> Operation {
    match request.kind() {
        ContentKind::Slide => Operation::GenerateSlide,
        ContentKind::FreeformDeck => Operation::GenerateFreeformDeck,
        ContentKind::Chat => Operation::GenerateChat,
    }
}

async fn dispatch(
    backend: &dyn Backend,
    request: &GenerationRequest,
) -> BackendResult<Generated<GeneratedContent>> {
    match request {
        GenerationRequest::Slide {
            slide_type,
            context,
            options,
        } => Ok(backend
            .generate_slide_content(*slide_type, context, options)
            .await?
            .map(GeneratedContent::Slide)),
        GenerationRequest::FreeformDeck {
            prompt,
            preferences,
            options,
        } => Ok(backend
            .generate_freeform_deck(prompt, preferences.as_ref(), options)
            .await?
            .map(GeneratedContent::Deck)),
        GenerationRequest::Chat {
            message,
            deck_context,
            slide_context,
            options,
        } => Ok(backend
            .generate_chat_response(message, deck_context, slide_context.as_ref(), options)
            .await?
            .map(GeneratedContent::Chat)),
    }
}

/// Reject structurally empty content regardless of what the backend claims.
fn validate(
    provider: &'static str,
    generated: Generated<GeneratedContent>,
) -> BackendResult<Generated<GeneratedContent>> {
    let problem = match &generated.content {
        GeneratedContent::Slide(slide)
            if slide.title.trim().is_empty() || slide.content.trim().is_empty() =>
        {
            Some("slide without title or content")
        }
        GeneratedContent::Deck(slides) if slides.is_empty() => Some("deck without slides"),
        GeneratedContent::Chat(text) if text.trim().is_empty() => Some("empty chat reply"),
        _ => None,
    };

    match problem {
        Some(problem) => Err(BackendError::InvalidResponse(provider, problem.to_string())),
        None => Ok(generated),
    }
}
