use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use tokio_util::sync::CancellationToken;

/// The twelve slides of a pitch deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Cover,
    Problem,
    Solution,
    Market,
    Product,
    BusinessModel,
    Traction,
    Competition,
    GoToMarket,
    Team,
    Financials,
    Ask,
}

impl SlideType {
    pub const ALL: [Self; 12] = [
        Self::Cover,
        Self::Problem,
        Self::Solution,
        Self::Market,
        Self::Product,
        Self::BusinessModel,
        Self::Traction,
        Self::Competition,
        Self::GoToMarket,
        Self::Team,
        Self::Financials,
        Self::Ask,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Problem => "problem",
            Self::Solution => "solution",
            Self::Market => "market",
            Self::Product => "product",
            Self::BusinessModel => "business_model",
            Self::Traction => "traction",
            Self::Competition => "competition",
            Self::GoToMarket => "go_to_market",
            Self::Team => "team",
            Self::Financials => "financials",
            Self::Ask => "ask",
        }
    }

    /// Title used when the model output carries no `Title:` label.
    #[must_use]
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Cover => "Company Overview",
            Self::Problem => "The Problem",
            Self::Solution => "Our Solution",
            Self::Market => "Market Opportunity",
            Self::Product => "Product Overview",
            Self::BusinessModel => "Business Model",
            Self::Traction => "Traction & Milestones",
            Self::Competition => "Competitive Landscape",
            Self::GoToMarket => "Go-to-Market Strategy",
            Self::Team => "Our Team",
            Self::Financials => "Financial Projections",
            Self::Ask => "The Ask",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slide_type| slide_type.as_str() == s)
            .ok_or_else(|| format!("Unknown slide type: {s}"))
    }
}

/// Business context for a single-slide request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SlideContext {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub target_market: Option<String>,
    /// Free-text feedback on a previous generation.
    pub user_feedback: Option<String>,
    /// Arbitrary caller preferences (tone, length, emphasis).
    pub user_preferences: Option<Value>,
}

/// Per-request generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct GenerationOptions {
    /// Public model identifier. Also decides the backend order.
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Caller-supplied key for the `OpenAI` backend.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Number of fallback-model retries already spent within one backend.
    #[serde(default)]
    pub retry_count: u32,
    /// Aborts the in-flight attempt and stops the fallback chain.
    #[serde(skip)]
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    pub cancellation_token: Option<CancellationToken>,
}

impl GenerationOptions {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Slide,
    FreeformDeck,
    Chat,
}

impl ContentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::FreeformDeck => "freeform_deck",
            Self::Chat => "chat",
        }
    }
}

/// A request for generated content.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Slide {
        slide_type: SlideType,
        context: SlideContext,
        options: GenerationOptions,
    },
    FreeformDeck {
        prompt: String,
        preferences: Option<Value>,
        options: GenerationOptions,
    },
    Chat {
        message: String,
        /// Snapshot of the deck the conversation is about.
        deck_context: Value,
        /// Snapshot of the slide currently in focus, if any.
        slide_context: Option<Value>,
        options: GenerationOptions,
    },
}

impl GenerationRequest {
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Slide { .. } => ContentKind::Slide,
            Self::FreeformDeck { .. } => ContentKind::FreeformDeck,
            Self::Chat { .. } => ContentKind::Chat,
        }
    }

    #[must_use]
    pub fn options(&self) -> &GenerationOptions {
        match self {
            Self::Slide { options, .. }
            | Self::FreeformDeck { options, .. }
            | Self::Chat { options, .. } => options,
        }
    }
}

/// Slide fields extracted from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ParsedSlide {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

/// One slide of a freeform deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ParsedDeckSlide {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
    /// 0-based position; contiguous across the deck.
    pub slide_order: usize,
    pub slide_type: SlideType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum GeneratedContent {
    Slide(ParsedSlide),
    Deck(Vec<ParsedDeckSlide>),
    Chat(String),
}

/// Output of one successful backend operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub content: T,
    /// Backend-native model that produced the content.
    pub model: String,
    pub tokens_used: Option<u32>,
    pub confidence: Option<f64>,
}

impl<T> Generated<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            content: f(self.content),
            model: self.model,
            tokens_used: self.tokens_used,
            confidence: self.confidence,
        }
    }
}

/// Sentinel provider/model reported when every backend failed.
pub const NO_PROVIDER: &str = "none";

/// Error reported when every backend failed.
pub const ALL_PROVIDERS_FAILED: &str = "All AI providers failed";

/// Uniform result of an orchestration call. `content` is present exactly
/// when `success` is true; use the constructors to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<GeneratedContent>,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    #[must_use]
    pub fn succeeded(provider: &str, generated: Generated<GeneratedContent>) -> Self {
        Self {
            success: true,
            content: Some(generated.content),
            provider: provider.to_string(),
            model: generated.model,
            tokens_used: generated.tokens_used,
            confidence: generated.confidence,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            provider: NO_PROVIDER.to_string(),
            model: NO_PROVIDER.to_string(),
            tokens_used: None,
            confidence: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn slide(&self) -> Option<&ParsedSlide> {
        match &self.content {
            Some(GeneratedContent::Slide(slide)) => Some(slide),
            _ => None,
        }
    }

    #[must_use]
    pub fn deck(&self) -> Option<&[ParsedDeckSlide]> {
        match &self.content {
            Some(GeneratedContent::Deck(slides)) => Some(slides),
            _ => None,
        }
    }

    #[must_use]
    pub fn chat(&self) -> Option<&str> {
        match &self.content {
            Some(GeneratedContent::Chat(text)) => Some(text),
            _ => None,
        }
    }
}

/// Result of a live backend probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Available,
    Unavailable,
    QuotaExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Free,
    Paid,
}

/// One selectable model tier, as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ProviderDescriptor {
    /// Public model identifier accepted in [`GenerationOptions::model`].
    pub name: String,
    pub display_name: String,
    /// Backend-native models behind this tier.
    pub supported_models: Vec<String>,
    pub cost_tier: CostTier,
    pub is_local: bool,
    pub status: ProviderStatus,
}
