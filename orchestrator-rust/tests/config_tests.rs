use slidegen_orchestrator::{
    config::{is_placeholder, DEFAULT_ORDER},
    BackendKind, ConfigError, OrchestratorConfig,
};
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn empty_environment_yields_defaults() {
    let config = OrchestratorConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config, OrchestratorConfig::default());
    assert_eq!(config.default_order, DEFAULT_ORDER.to_vec());
    assert!(config.openai.enabled && config.groq.enabled && config.local.enabled);
}

#[test]
fn reads_per_backend_variables() {
    let config = OrchestratorConfig::from_lookup(lookup(&[
        ("OPENAI_API_KEY", "sk-live"),
        ("OPENAI_MODEL", "gpt-4o"),
        ("GROQ_API_KEY", "gsk-live"),
        ("GROQ_ENABLED", "false"),
        ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
        ("OLLAMA_MODEL", "mistral-7b"),
    ]))
    .unwrap();

    assert_eq!(config.openai.api_key.as_deref(), Some("sk-live"));
    assert_eq!(config.openai.default_model.as_deref(), Some("gpt-4o"));
    assert_eq!(config.groq.api_key.as_deref(), Some("gsk-live"));
    assert!(!config.groq.enabled);
    assert_eq!(
        config.local.base_url.as_deref(),
        Some("http://gpu-box:11434")
    );
    assert_eq!(config.local.default_model.as_deref(), Some("mistral-7b"));
}

#[test]
fn provider_order_override_is_parsed_and_deduplicated() {
    let config = OrchestratorConfig::from_lookup(lookup(&[(
        "SLIDEGEN_PROVIDER_ORDER",
        "ollama, openai,local",
    )]))
    .unwrap();

    assert_eq!(
        config.default_order,
        vec![BackendKind::Local, BackendKind::OpenAI]
    );
}

#[test]
fn invalid_values_are_rejected() {
    let error =
        OrchestratorConfig::from_lookup(lookup(&[("SLIDEGEN_PROVIDER_ORDER", "openai,azure")]))
            .unwrap_err();
    assert!(matches!(
        error,
        ConfigError::InvalidValue(ref name, _) if name == "SLIDEGEN_PROVIDER_ORDER"
    ));

    let error = OrchestratorConfig::from_lookup(lookup(&[("OPENAI_ENABLED", "maybe")]))
        .unwrap_err();
    assert!(matches!(
        error,
        ConfigError::InvalidValue(ref name, ref value)
            if name == "OPENAI_ENABLED" && value == "maybe"
    ));

    let blank_order = lookup(&[("SLIDEGEN_PROVIDER_ORDER", " , ")]);
    assert!(OrchestratorConfig::from_lookup(blank_order).is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let config: OrchestratorConfig = serde_json::from_str(
        r#"{ "groq": { "api_key": "gsk-file" }, "default_order": ["local", "groq"] }"#,
    )
    .unwrap();

    assert_eq!(config.groq.api_key.as_deref(), Some("gsk-file"));
    assert!(config.groq.enabled);
    assert!(config.openai.api_key.is_none());
    assert_eq!(
        config.default_order,
        vec![BackendKind::Local, BackendKind::Groq]
    );
}

#[test]
fn placeholders_count_as_missing() {
    for value in [
        "",
        "   ",
        "your_api_key",
        "your-groq-key",
        "openai_key_here",
        "sk-placeholder",
        "changeme",
    ] {
        assert!(is_placeholder(value), "{value:?}");
    }
    assert!(!is_placeholder("sk-proj-abc123"));
    assert!(!is_placeholder("http://localhost:11434"));
}
