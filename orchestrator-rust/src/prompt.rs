//! Literal prompt text for each kind of generation request.
use crate::{SlideContext, SlideType};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// System and user text for one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

const SLIDE_SYSTEM_PROMPT: &str = "You are an expert pitch deck consultant who writes \
concise, investor-ready slide content. Always answer using the exact labels you are asked for.";

const DECK_SYSTEM_PROMPT: &str = "You are an expert presentation designer who turns a short \
brief into a complete, well-structured slide deck. Follow the requested slide format exactly.";

const CHAT_SYSTEM_PROMPT: &str = "You are a helpful presentation assistant. Answer questions \
about the user's deck and suggest concrete improvements. Keep replies short and specific.";

const SLIDE_FORMAT: &str = "Format your response exactly as:
Title: [slide title]
Content: [slide content, using bullet points where helpful]
Speaker Notes: [what the presenter should say]";

const COVER_TEMPLATE: &str = "Create a cover slide for {company_name}, a company in the \
{industry} industry serving {target_market}. Include a memorable tagline and a one-sentence \
description of what the company does.";

const PROBLEM_TEMPLATE: &str = "Create a problem slide for {company_name}. Describe the most \
painful problem that {target_market} faces in the {industry} industry today. Quantify the pain \
where possible and explain why existing options fall short.";

const SOLUTION_TEMPLATE: &str = "Create a solution slide for {company_name}. Explain how the \
company solves the core problem for {target_market} in the {industry} industry, and list the \
key benefits in plain language.";

const MARKET_TEMPLATE: &str = "Create a market opportunity slide for {company_name} in the \
{industry} industry. Estimate TAM, SAM and SOM for {target_market} and describe the growth \
trends that make this the right time.";

const PRODUCT_TEMPLATE: &str = "Create a product slide for {company_name}. Describe the product, \
its core features, and how {target_market} uses it day to day in the {industry} industry.";

const BUSINESS_MODEL_TEMPLATE: &str = "Create a business model slide for {company_name}. Explain \
how the company makes money from {target_market}, including pricing, revenue streams and unit \
economics typical for the {industry} industry.";

const TRACTION_TEMPLATE: &str = "Create a traction slide for {company_name}. Highlight key \
metrics, customer wins among {target_market}, partnerships and milestones that show momentum in \
the {industry} industry.";

const COMPETITION_TEMPLATE: &str = "Create a competition slide for {company_name}. Map the main \
competitors serving {target_market} in the {industry} industry and explain the company's \
sustainable competitive advantages.";

const GO_TO_MARKET_TEMPLATE: &str = "Create a go-to-market slide for {company_name}. Describe the \
channels, sales motion and marketing strategy used to reach {target_market} in the {industry} \
industry, with near-term milestones.";

const TEAM_TEMPLATE: &str = "Create a team slide for {company_name}. Present the founding team \
and key hires, and explain why this team is uniquely positioned to win {target_market} in the \
{industry} industry.";

const FINANCIALS_TEMPLATE: &str = "Create a financial projections slide for {company_name}. \
Provide a three-to-five year outlook of revenue, costs and key assumptions for selling to \
{target_market} in the {industry} industry.";

const ASK_TEMPLATE: &str = "Create an investment ask slide for {company_name}. State how much \
funding the company is raising, the use of funds, and the milestones the round unlocks in the \
{industry} industry for {target_market}.";

const DECK_TEMPLATE: &str = "Create a complete presentation based on this request:
{prompt}

Decide how many slides the topic needs (usually 6 to 12). For each slide use exactly this format:
SLIDE [number]: [slide type, e.g. Cover, Problem, Solution, Market, Product, Business Model, \
Traction, Competition, Go-to-Market, Team, Financials, Ask]
Title: [slide title]
Content: [slide content, using bullet points where helpful]
---";

const CHAT_TEMPLATE: &str = "Current deck:
{deck_context}

Slide in focus:
{slide_context}

User message:
{message}";

fn slide_template(slide_type: SlideType) -> &'static str {
    match slide_type {
        SlideType::Cover => COVER_TEMPLATE,
        SlideType::Problem => PROBLEM_TEMPLATE,
        SlideType::Solution => SOLUTION_TEMPLATE,
        SlideType::Market => MARKET_TEMPLATE,
        SlideType::Product => PRODUCT_TEMPLATE,
        SlideType::BusinessModel => BUSINESS_MODEL_TEMPLATE,
        SlideType::Traction => TRACTION_TEMPLATE,
        SlideType::Competition => COMPETITION_TEMPLATE,
        SlideType::GoToMarket => GO_TO_MARKET_TEMPLATE,
        SlideType::Team => TEAM_TEMPLATE,
        SlideType::Financials => FINANCIALS_TEMPLATE,
        SlideType::Ask => ASK_TEMPLATE,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"));

/// Replace every `{key}` in `template` with its value in a single pass.
/// Inserted values are never rescanned and unknown keys stay literal.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}

fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn append_preferences(user: &mut String, preferences: Option<&Value>) {
    if let Some(preferences) = preferences.filter(|value| !value.is_null()) {
        user.push_str("\n\nUser preferences:\n");
        user.push_str(&render_json(preferences));
    }
}

/// Prompt for one slide of a pitch deck.
#[must_use]
pub fn slide_prompt(slide_type: SlideType, context: &SlideContext) -> Prompt {
    let company_name = non_empty(context.company_name.as_deref()).unwrap_or("the company");
    let industry = non_empty(context.industry.as_deref()).unwrap_or("relevant");
    let target_market = non_empty(context.target_market.as_deref()).unwrap_or("its customers");

    let mut user = substitute(
        slide_template(slide_type),
        &[
            ("company_name", company_name),
            ("industry", industry),
            ("target_market", target_market),
        ],
    );

    if let Some(feedback) = non_empty(context.user_feedback.as_deref()) {
        user.push_str("\n\nIncorporate this feedback from the user:\n");
        user.push_str(feedback);
    }
    append_preferences(&mut user, context.user_preferences.as_ref());

    user.push_str("\n\n");
    user.push_str(SLIDE_FORMAT);

    Prompt {
        system: SLIDE_SYSTEM_PROMPT,
        user,
    }
}

/// Prompt for a whole deck from a natural-language brief.
#[must_use]
pub fn deck_prompt(prompt: &str, preferences: Option<&Value>) -> Prompt {
    let mut user = substitute(DECK_TEMPLATE, &[("prompt", prompt.trim())]);
    append_preferences(&mut user, preferences);

    Prompt {
        system: DECK_SYSTEM_PROMPT,
        user,
    }
}

/// Prompt for one conversational turn about a deck.
#[must_use]
pub fn chat_prompt(message: &str, deck_context: &Value, slide_context: Option<&Value>) -> Prompt {
    let deck_context = render_json(deck_context);
    let slide_context = slide_context.map_or_else(|| "(none)".to_string(), render_json);

    let user = substitute(
        CHAT_TEMPLATE,
        &[
            ("deck_context", deck_context.as_str()),
            ("slide_context", slide_context.as_str()),
            ("message", message.trim()),
        ],
    );

    Prompt {
        system: CHAT_SYSTEM_PROMPT,
        user,
    }
}

/// Cheapest possible request, used to probe backend health.
pub(crate) fn status_prompt() -> Prompt {
    Prompt {
        system: CHAT_SYSTEM_PROMPT,
        user: "Hi".to_string(),
    }
}
