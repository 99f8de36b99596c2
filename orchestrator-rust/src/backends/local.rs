use crate::{
    config::{self, BackendConfig},
    BackendKind, BackendProfile, CostTier, ModelBackend, ModelTier,
};
use slidegen_sdk::ollama::{OllamaModel, OllamaModelOptions};
use std::sync::Arc;

/// Requested model that selects this backend without naming a tier.
pub const LOCAL_ALIAS: &str = "local";

pub static PROFILE: BackendProfile = BackendProfile {
    kind: BackendKind::Local,
    tiers: &[
        ModelTier {
            public_id: "llama3.1-8b",
            native_id: "llama3.1:8b",
            display_name: "Local Llama 3.1 8B",
        },
        ModelTier {
            public_id: "mistral-7b",
            native_id: "mistral:7b",
            display_name: "Local Mistral 7B",
        },
        ModelTier {
            public_id: "phi3-mini",
            native_id: "phi3:mini",
            display_name: "Local Phi-3 Mini",
        },
    ],
    default_model: "llama3.1:8b",
    fallback_model: "mistral:7b",
    baseline_confidence: 0.7,
    cost_tier: CostTier::Free,
    is_local: true,
    requires_api_key: false,
    accepts_key_override: false,
};

/// Whether `model` selects the local backend first.
#[must_use]
pub fn is_local_model(model: &str) -> bool {
    model == LOCAL_ALIAS || PROFILE.tiers.iter().any(|tier| tier.public_id == model)
}

#[must_use]
pub fn backend(config: &BackendConfig) -> ModelBackend {
    let base_url = config.base_url.clone();
    let model = OllamaModel::new(OllamaModelOptions {
        base_url: base_url.clone(),
        client: None,
    });
    let backend = ModelBackend::new(&PROFILE, Arc::new(model), config);

    match base_url {
        Some(url) if config::is_placeholder(&url) => backend.unconfigured("missing base URL"),
        _ => backend,
    }
}
