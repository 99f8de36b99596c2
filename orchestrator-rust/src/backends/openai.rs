use crate::{
    config::BackendConfig, BackendKind, BackendProfile, CostTier, ModelBackend, ModelTier,
};
use slidegen_sdk::openai::{OpenAIChatModel, OpenAIChatModelOptions};
use std::sync::Arc;

pub static PROFILE: BackendProfile = BackendProfile {
    kind: BackendKind::OpenAI,
    tiers: &[
        ModelTier {
            public_id: "gpt-4o-mini",
            native_id: "gpt-4o-mini",
            display_name: "OpenAI GPT-4o mini",
        },
        ModelTier {
            public_id: "gpt-4o",
            native_id: "gpt-4o",
            display_name: "OpenAI GPT-4o",
        },
    ],
    default_model: "gpt-4o-mini",
    fallback_model: "gpt-3.5-turbo",
    baseline_confidence: 0.85,
    cost_tier: CostTier::Paid,
    is_local: false,
    requires_api_key: true,
    accepts_key_override: true,
};

#[must_use]
pub fn backend(config: &BackendConfig) -> ModelBackend {
    let model = OpenAIChatModel::new(OpenAIChatModelOptions {
        base_url: config.base_url.clone(),
        api_key: config.api_key.clone().unwrap_or_default(),
        ..Default::default()
    });
    ModelBackend::new(&PROFILE, Arc::new(model), config)
}
