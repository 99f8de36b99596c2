use crate::{
    config::BackendConfig, BackendKind, BackendProfile, CostTier, ModelBackend, ModelTier,
};
use slidegen_sdk::groq::{GroqModel, GroqModelOptions};
use std::sync::Arc;

/// Public model names of this backend all start with this prefix.
pub const MODEL_PREFIX: &str = "groq-";

pub static PROFILE: BackendProfile = BackendProfile {
    kind: BackendKind::Groq,
    tiers: &[
        ModelTier {
            public_id: "groq-llama-8b",
            native_id: "llama-3.1-8b-instant",
            display_name: "Groq Llama 3.1 8B",
        },
        ModelTier {
            public_id: "groq-llama-70b",
            native_id: "llama-3.3-70b-versatile",
            display_name: "Groq Llama 3.3 70B",
        },
        ModelTier {
            public_id: "groq-mixtral",
            native_id: "mixtral-8x7b-32768",
            display_name: "Groq Mixtral 8x7B",
        },
    ],
    default_model: "llama-3.1-8b-instant",
    fallback_model: "llama-3.3-70b-versatile",
    baseline_confidence: 0.8,
    cost_tier: CostTier::Free,
    is_local: false,
    requires_api_key: true,
    accepts_key_override: false,
};

#[must_use]
pub fn backend(config: &BackendConfig) -> ModelBackend {
    let model = GroqModel::new(GroqModelOptions {
        api_key: config.api_key.clone().unwrap_or_default(),
        base_url: config.base_url.clone(),
        client: None,
    });
    ModelBackend::new(&PROFILE, Arc::new(model), config)
}
