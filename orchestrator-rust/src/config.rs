use crate::{BackendKind, ConfigError};
use serde::Deserialize;
use std::env;

/// Order used when the requested model does not pick one.
pub const DEFAULT_ORDER: [BackendKind; 3] =
    [BackendKind::Groq, BackendKind::OpenAI, BackendKind::Local];

const PROVIDER_ORDER_VAR: &str = "SLIDEGEN_PROVIDER_ORDER";

/// Credentials and defaults for one backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Public or native model used when the request names none.
    pub default_model: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            default_model: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub openai: BackendConfig,
    pub groq: BackendConfig,
    pub local: BackendConfig,
    pub default_order: Vec<BackendKind>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            openai: BackendConfig::default(),
            groq: BackendConfig::default(),
            local: BackendConfig::default(),
            default_order: DEFAULT_ORDER.to_vec(),
        }
    }
}

impl OrchestratorConfig {
    /// Read configuration from the process environment, loading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = |prefix: &str| -> Result<BackendConfig, ConfigError> {
            let enabled_var = format!("{prefix}_ENABLED");
            Ok(BackendConfig {
                enabled: parse_flag(&enabled_var, lookup(&enabled_var))?.unwrap_or(true),
                api_key: lookup(&format!("{prefix}_API_KEY")),
                base_url: lookup(&format!("{prefix}_BASE_URL")),
                default_model: lookup(&format!("{prefix}_MODEL")),
            })
        };

        let default_order = match lookup(PROVIDER_ORDER_VAR) {
            Some(value) => parse_order(&value)?,
            None => DEFAULT_ORDER.to_vec(),
        };

        Ok(Self {
            openai: backend("OPENAI")?,
            groq: backend("GROQ")?,
            local: backend("OLLAMA")?,
            default_order,
        })
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue(name.to_string(), value)),
    }
}

fn parse_order(value: &str) -> Result<Vec<BackendKind>, ConfigError> {
    let mut order = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let kind = entry.parse::<BackendKind>().map_err(|_| {
            ConfigError::InvalidValue(PROVIDER_ORDER_VAR.to_string(), value.to_string())
        })?;
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    if order.is_empty() {
        return Err(ConfigError::InvalidValue(
            PROVIDER_ORDER_VAR.to_string(),
            value.to_string(),
        ));
    }
    Ok(order)
}

/// Whether a configured credential or URL is absent in all but name.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value.is_empty()
        || value.starts_with("your_")
        || value.starts_with("your-")
        || value.ends_with("_here")
        || value.contains("placeholder")
        || matches!(value.as_str(), "changeme" | "change-me" | "xxx" | "none")
}
