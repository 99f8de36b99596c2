use reqwest::StatusCode;
use serde_json::json;
use slidegen_orchestrator::{
    backends, Backend, BackendConfig, BackendError, BackendKind, ConfidenceScorer, CostTier,
    GenerationOptions, ModelBackend, ParseError, ProviderStatus, SlideContext, SlideType,
};
use slidegen_sdk::{
    sdk_test::{MockGenerateResult, MockLanguageModel},
    LanguageModelError, ModelResponse, ModelUsage,
};
use std::{sync::Arc, time::Duration};

const SLIDE_TEXT: &str = "Title: The Problem\nContent: - Teams waste hours\nSpeaker Notes: Pause";

fn configured(api_key: Option<&str>) -> BackendConfig {
    BackendConfig {
        api_key: api_key.map(str::to_string),
        ..BackendConfig::default()
    }
}

fn openai_backend(model: &Arc<MockLanguageModel>) -> ModelBackend {
    ModelBackend::new(
        &backends::openai::PROFILE,
        model.clone(),
        &configured(Some("sk-test")),
    )
}

fn response(text: &str) -> ModelResponse {
    ModelResponse {
        text: text.to_string(),
        model_id: None,
        usage: Some(ModelUsage {
            input_tokens: 12,
            output_tokens: 30,
        }),
    }
}

fn unavailable() -> MockGenerateResult {
    MockGenerateResult::error(LanguageModelError::StatusCode(
        StatusCode::SERVICE_UNAVAILABLE,
        "overloaded".to_string(),
    ))
}

#[tokio::test]
async fn generate_slide_parses_and_scores_response() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response(SLIDE_TEXT));
    let backend = openai_backend(&model);

    let generated = backend
        .generate_slide_content(
            SlideType::Problem,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(generated.content.title, "The Problem");
    assert_eq!(generated.content.content, "- Teams waste hours");
    assert_eq!(generated.content.speaker_notes.as_deref(), Some("Pause"));
    assert_eq!(generated.model, "gpt-4o-mini");
    assert_eq!(generated.tokens_used, Some(42));
    let confidence = generated.confidence.unwrap();
    assert!((confidence - 0.9).abs() < 1e-9);

    let inputs = model.tracked_generate_inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].max_tokens, Some(1000));
    assert_eq!(inputs[0].temperature, Some(0.7));
    assert_eq!(inputs[0].api_key.as_deref(), Some("sk-test"));
    assert_eq!(inputs[0].timeout, Some(Duration::from_secs(60)));
    assert!(inputs[0].system_prompt.is_some());
}

#[tokio::test]
async fn custom_scorer_weights_confidence() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response(SLIDE_TEXT));
    let backend = openai_backend(&model).with_scorer(ConfidenceScorer {
        bullet_bonus: 0.1,
        length_bonus: 0.0,
        figures_bonus: 0.0,
        ..ConfidenceScorer::default()
    });

    let generated = backend
        .generate_slide_content(
            SlideType::Problem,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap();

    let confidence = generated.confidence.unwrap();
    assert!((confidence - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn options_override_call_defaults() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response(SLIDE_TEXT));
    let backend = openai_backend(&model);
    let options = GenerationOptions {
        model: Some("gpt-4o".to_string()),
        temperature: Some(0.2),
        max_tokens: Some(256),
        ..GenerationOptions::default()
    };

    let generated = backend
        .generate_slide_content(SlideType::Problem, &SlideContext::default(), &options)
        .await
        .unwrap();

    assert_eq!(generated.model, "gpt-4o");
    let inputs = model.tracked_generate_inputs();
    assert_eq!(inputs[0].model_id, "gpt-4o");
    assert_eq!(inputs[0].temperature, Some(0.2));
    assert_eq!(inputs[0].max_tokens, Some(256));
}

#[tokio::test]
async fn default_model_failure_retries_once_with_fallback_model() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([
        unavailable(),
        MockGenerateResult::response(response(SLIDE_TEXT)),
    ]);
    let backend = openai_backend(&model);

    let generated = backend
        .generate_slide_content(
            SlideType::Problem,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(generated.model, "gpt-3.5-turbo");
    assert_eq!(
        model.tracked_model_ids(),
        vec!["gpt-4o-mini", "gpt-3.5-turbo"]
    );
}

#[tokio::test]
async fn retry_is_bounded_to_two_calls() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([unavailable(), unavailable(), unavailable()]);
    let backend = ModelBackend::new(
        &backends::groq::PROFILE,
        model.clone(),
        &configured(Some("gsk-test")),
    );

    let error = backend
        .generate_slide_content(
            SlideType::Team,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::LanguageModel(_)));
    assert_eq!(
        model.tracked_model_ids(),
        vec!["llama-3.1-8b-instant", "llama-3.3-70b-versatile"]
    );
}

#[tokio::test]
async fn default_model_equal_to_fallback_is_not_retried() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([unavailable(), unavailable()]);
    let config = BackendConfig {
        default_model: Some("groq-llama-70b".to_string()),
        ..configured(Some("gsk-test"))
    };
    let backend = ModelBackend::new(&backends::groq::PROFILE, model.clone(), &config);

    backend
        .generate_slide_content(
            SlideType::Team,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(model.tracked_model_ids(), vec!["llama-3.3-70b-versatile"]);
}

#[tokio::test]
async fn explicitly_requested_model_is_not_retried() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([unavailable(), unavailable()]);
    let backend = ModelBackend::new(
        &backends::groq::PROFILE,
        model.clone(),
        &configured(Some("gsk-test")),
    );
    let options = GenerationOptions {
        model: Some("groq-mixtral".to_string()),
        ..GenerationOptions::default()
    };

    backend
        .generate_slide_content(SlideType::Team, &SlideContext::default(), &options)
        .await
        .unwrap_err();

    assert_eq!(model.tracked_model_ids(), vec!["mixtral-8x7b-32768"]);
}

#[tokio::test]
async fn spent_retry_count_disables_fallback_model() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([unavailable(), unavailable()]);
    let backend = openai_backend(&model);
    let options = GenerationOptions {
        retry_count: 1,
        ..GenerationOptions::default()
    };

    backend
        .generate_chat_response("Hi", &json!({}), None, &options)
        .await
        .unwrap_err();

    assert_eq!(model.tracked_model_ids(), vec!["gpt-4o-mini"]);
}

#[tokio::test]
async fn unparseable_output_triggers_fallback_model() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([
        MockGenerateResult::text("Title:\nContent: body"),
        MockGenerateResult::text(SLIDE_TEXT),
    ]);
    let backend = openai_backend(&model);

    let generated = backend
        .generate_slide_content(
            SlideType::Problem,
            &SlideContext::default(),
            &GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(generated.model, "gpt-3.5-turbo");
    assert_eq!(generated.tokens_used, None);
}

#[tokio::test]
async fn blank_output_is_an_invalid_response() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([
        MockGenerateResult::text("  "),
        MockGenerateResult::text("\n"),
    ]);
    let backend = openai_backend(&model);

    let error = backend
        .generate_chat_response("Hi", &json!({}), None, &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::InvalidResponse("openai", _)));
    assert_eq!(model.tracked_generate_inputs().len(), 2);
}

#[tokio::test]
async fn deck_without_slides_is_a_parse_error() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([
        MockGenerateResult::text("Sorry, I cannot help with that."),
        MockGenerateResult::text("Still no slides."),
    ]);
    let backend = openai_backend(&model);

    let error = backend
        .generate_freeform_deck("A deck about tea", None, &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        BackendError::Parse("openai", ParseError::NoSlides)
    ));
}

#[tokio::test]
async fn generate_freeform_deck_returns_ordered_slides() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response(
        "SLIDE 1: Cover\nTitle: Tea Co\nContent: Better tea\n---\nSLIDE 2: Ask\nTitle: Funding\nContent: $1M seed\n",
    ));
    let backend = openai_backend(&model);

    let generated = backend
        .generate_freeform_deck("A deck about tea", None, &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(generated.content.len(), 2);
    assert_eq!(generated.content[1].slide_type, SlideType::Ask);
    assert_eq!(model.tracked_generate_inputs()[0].max_tokens, Some(4000));
}

#[tokio::test]
async fn chat_reply_is_trimmed_and_uses_short_timeout() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response("\n  Try leading with the metric.  \n"));
    let backend = openai_backend(&model);

    let generated = backend
        .generate_chat_response(
            "How can I improve this slide?",
            &json!({ "title": "Deck" }),
            Some(&json!({ "title": "Traction" })),
            &GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(generated.content, "Try leading with the metric.");
    assert!(generated.confidence.is_some());
    let inputs = model.tracked_generate_inputs();
    assert_eq!(inputs[0].max_tokens, Some(500));
    assert_eq!(inputs[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn missing_or_placeholder_key_is_not_configured() {
    let keys = [
        None,
        Some(""),
        Some("your_openai_api_key_here"),
        Some("sk-placeholder"),
    ];
    for api_key in keys {
        let model = Arc::new(MockLanguageModel::new());
        let backend = ModelBackend::new(
            &backends::openai::PROFILE,
            model.clone(),
            &configured(api_key),
        );

        let error = backend
            .generate_slide_content(
                SlideType::Cover,
                &SlideContext::default(),
                &GenerationOptions::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, BackendError::NotConfigured("openai", _)));
        assert!(model.tracked_generate_inputs().is_empty());
    }
}

#[tokio::test]
async fn disabled_backend_is_not_configured() {
    let model = Arc::new(MockLanguageModel::new());
    let config = BackendConfig {
        enabled: false,
        ..configured(Some("gsk-test"))
    };
    let backend = ModelBackend::new(&backends::groq::PROFILE, model.clone(), &config);

    let error = backend
        .generate_chat_response("Hi", &json!({}), None, &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::NotConfigured("groq", _)));
    assert!(model.tracked_generate_inputs().is_empty());
}

#[tokio::test]
async fn caller_key_overrides_openai_key_only() {
    let options = GenerationOptions {
        api_key: Some("sk-user".to_string()),
        ..GenerationOptions::default()
    };

    let openai_model = Arc::new(MockLanguageModel::new());
    openai_model.enqueue_generate(response("Sure."));
    let openai = ModelBackend::new(
        &backends::openai::PROFILE,
        openai_model.clone(),
        &configured(None),
    );
    openai
        .generate_chat_response("Hi", &json!({}), None, &options)
        .await
        .unwrap();
    assert_eq!(
        openai_model.tracked_generate_inputs()[0].api_key.as_deref(),
        Some("sk-user")
    );

    let groq_model = Arc::new(MockLanguageModel::new());
    let groq = ModelBackend::new(
        &backends::groq::PROFILE,
        groq_model.clone(),
        &configured(None),
    );
    let error = groq
        .generate_chat_response("Hi", &json!({}), None, &options)
        .await
        .unwrap_err();
    assert!(matches!(error, BackendError::NotConfigured("groq", _)));
}

#[tokio::test]
async fn local_backend_needs_no_key() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(response("Hello there."));
    let backend = ModelBackend::new(
        &backends::local::PROFILE,
        model.clone(),
        &configured(None),
    );

    let generated = backend
        .generate_chat_response("Hi", &json!({}), None, &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(generated.model, "llama3.1:8b");
    assert_eq!(model.tracked_generate_inputs()[0].api_key, None);
}

#[tokio::test]
async fn placeholder_base_url_disables_local_backend() {
    let config = BackendConfig {
        base_url: Some("your_ollama_url_here".to_string()),
        ..BackendConfig::default()
    };
    let backend = backends::local::backend(&config);

    assert_eq!(backend.kind(), BackendKind::Local);
    let error = backend
        .generate_chat_response("Hi", &json!({}), None, &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(error, BackendError::NotConfigured("local", _)));
}

#[test]
fn resolve_model_maps_public_ids() {
    let model = Arc::new(MockLanguageModel::new());
    let backend = ModelBackend::new(
        &backends::groq::PROFILE,
        model,
        &BackendConfig {
            default_model: Some("groq-llama-70b".to_string()),
            ..configured(Some("gsk-test"))
        },
    );

    assert_eq!(backend.default_model(), "llama-3.3-70b-versatile");
    assert_eq!(
        backend.resolve_model(Some("groq-mixtral")),
        "mixtral-8x7b-32768"
    );
    assert_eq!(
        backend.resolve_model(Some("gpt-4o")),
        "llama-3.3-70b-versatile"
    );
    assert_eq!(backend.resolve_model(None), "llama-3.3-70b-versatile");
}

#[tokio::test]
async fn status_reflects_probe_outcome() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate_results([
        MockGenerateResult::text("ok"),
        MockGenerateResult::error(LanguageModelError::StatusCode(
            StatusCode::TOO_MANY_REQUESTS,
            "slow down".to_string(),
        )),
        unavailable(),
    ]);
    let backend = openai_backend(&model);

    assert_eq!(backend.status().await, ProviderStatus::Available);
    assert_eq!(backend.status().await, ProviderStatus::QuotaExceeded);
    assert_eq!(backend.status().await, ProviderStatus::Unavailable);

    let inputs = model.tracked_generate_inputs();
    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0].max_tokens, Some(1));
    assert_eq!(inputs[0].timeout, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn status_of_unconfigured_backend_is_unavailable_without_a_call() {
    let model = Arc::new(MockLanguageModel::new());
    let backend = ModelBackend::new(
        &backends::groq::PROFILE,
        model.clone(),
        &configured(None),
    );

    assert_eq!(backend.status().await, ProviderStatus::Unavailable);
    assert!(model.tracked_generate_inputs().is_empty());
}

#[test]
fn describe_lists_every_tier() {
    let model = Arc::new(MockLanguageModel::new());
    let backend = ModelBackend::new(
        &backends::groq::PROFILE,
        model,
        &configured(Some("gsk-test")),
    );

    let descriptors = backend.describe(ProviderStatus::QuotaExceeded);

    assert_eq!(
        descriptors
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect::<Vec<_>>(),
        vec!["groq-llama-8b", "groq-llama-70b", "groq-mixtral"]
    );
    assert!(descriptors.iter().all(|descriptor| {
        descriptor.cost_tier == CostTier::Free
            && !descriptor.is_local
            && descriptor.status == ProviderStatus::QuotaExceeded
    }));
    assert_eq!(
        descriptors[1].supported_models,
        vec!["llama-3.3-70b-versatile"]
    );
}
