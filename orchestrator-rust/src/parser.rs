//! Label-based extraction of slide fields from free-form model output.
use crate::{ParseError, ParsedDeckSlide, ParsedSlide, SlideType};
use regex::Regex;
use std::sync::LazyLock;

/// Labels that end a `Content:` section.
const SECTION_LABELS: [&str; 21] = [
    "Speaker Notes",
    "Notes",
    "Impact",
    "Benefits",
    "Growth",
    "Key Points",
    "Key Metrics",
    "Metrics",
    "Features",
    "Revenue",
    "Pricing",
    "Strategy",
    "Timeline",
    "Milestones",
    "Competitors",
    "Advantages",
    "Team Members",
    "Funding",
    "Use of Funds",
    "Market Size",
    "Target Market",
];

const DECK_SLIDE_DELIMITER: &str = "---";

/// A field label at the start of a line, optionally qualified by one word
/// (`Slide Title:`), wrapped in markdown emphasis or preceded by a heading
/// marker: `Title:`, `**Title:**`, `## Title:`.
fn field_label_regex(alternatives: &str) -> Regex {
    Regex::new(&format!(
        r"(?im)^[ \t]*[#>*_]*[ \t]*(?:[\w-]+[ \t]+)?(?:{alternatives})[ \t]*[*_]*[ \t]*:[*_]*[ \t]*"
    ))
    .expect("label regex is valid")
}

static TITLE_LABEL: LazyLock<Regex> = LazyLock::new(|| field_label_regex("title"));
static CONTENT_LABEL: LazyLock<Regex> = LazyLock::new(|| field_label_regex("content"));
static SPEAKER_NOTES_LABEL: LazyLock<Regex> =
    LazyLock::new(|| field_label_regex("speaker notes"));

/// A section label that ends a block, either at the start of a line or
/// inline after sentence punctuation (`TAM is $10B. Growth: 20%`). The
/// `label` group starts where the preceding block ends. Bullet items such
/// as `- Growth:` are not labels.
static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = SECTION_LABELS
        .iter()
        .map(|label| regex::escape(label))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?im)(?:^|[.!?;][ \t]+)(?P<label>[ \t]*[#>*_]*[ \t]*(?:{alternatives})[ \t]*[*_]*[ \t]*:)"
    ))
    .expect("section label regex is valid")
});
static SLIDE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSLIDE[ \t]+\d+[ \t]*:[*_]*").expect("slide marker regex is valid")
});

fn clean_inline(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '"' | '#' | '[' | ']'))
        .trim()
        .to_string()
}

/// Value of a one-line label such as `Title:`.
fn extract_line(text: &str, label: &Regex) -> Option<String> {
    let found = label.find(text)?;
    let rest = &text[found.end()..];
    let line = rest.lines().next().unwrap_or_default();
    Some(clean_inline(line))
}

/// Value of a block label, stopping at the next known section label.
fn extract_section(text: &str, label: &Regex) -> Option<String> {
    let found = label.find(text)?;
    let rest = &text[found.end()..];
    let end = SECTION_LABEL
        .captures(rest)
        .and_then(|next| next.name("label"))
        .map_or(rest.len(), |next| next.start());
    Some(rest[..end].trim().to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Extract a single slide from model output.
///
/// A missing `Title:` falls back to the slide type's default title and a
/// missing `Content:` falls back to the whole text. Empty extractions are
/// rejected.
pub fn parse_single(text: &str, slide_type: SlideType) -> Result<ParsedSlide, ParseError> {
    let title = extract_line(text, &TITLE_LABEL)
        .unwrap_or_else(|| slide_type.default_title().to_string());
    let content =
        extract_section(text, &CONTENT_LABEL).unwrap_or_else(|| text.trim().to_string());
    let speaker_notes = non_empty(extract_section(text, &SPEAKER_NOTES_LABEL));

    if title.is_empty() {
        return Err(ParseError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(ParseError::EmptyContent);
    }

    Ok(ParsedSlide {
        title,
        content,
        speaker_notes,
    })
}

/// Split multi-slide output on `SLIDE <n>:` markers.
///
/// Segments missing a title or content are skipped; `slide_order` follows
/// emission order.
#[must_use]
pub fn parse_deck(text: &str) -> Vec<ParsedDeckSlide> {
    let markers: Vec<_> = SLIDE_MARKER.find_iter(text).collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(index, marker)| {
            let end = markers
                .get(index + 1)
                .map_or(text.len(), |next| next.start());
            parse_deck_segment(&text[marker.end()..end])
        })
        .enumerate()
        .map(|(slide_order, segment)| ParsedDeckSlide {
            title: segment.title,
            content: segment.content,
            speaker_notes: segment.speaker_notes,
            slide_order,
            slide_type: segment.slide_type,
        })
        .collect()
}

struct DeckSegment {
    title: String,
    content: String,
    speaker_notes: Option<String>,
    slide_type: SlideType,
}

fn parse_deck_segment(segment: &str) -> Option<DeckSegment> {
    let type_label = segment.lines().next().unwrap_or_default();
    let title = non_empty(extract_line(segment, &TITLE_LABEL))?;

    let found = CONTENT_LABEL.find(segment)?;
    let body = &segment[found.end()..];
    let body = body
        .find(DECK_SLIDE_DELIMITER)
        .map_or(body, |delimiter| &body[..delimiter]);

    let (content, speaker_notes) = match SPEAKER_NOTES_LABEL.find(body) {
        Some(notes) => (
            body[..notes.start()].trim().to_string(),
            non_empty(Some(body[notes.end()..].trim().to_string())),
        ),
        None => (body.trim().to_string(), None),
    };
    if content.is_empty() {
        return None;
    }

    Some(DeckSegment {
        title,
        content,
        speaker_notes,
        slide_type: normalize_slide_type(type_label),
    })
}

/// Map a free-text slide label onto [`SlideType`]. Unknown labels map to
/// [`SlideType::Cover`].
#[must_use]
pub fn normalize_slide_type(label: &str) -> SlideType {
    let normalized = clean_inline(label).to_lowercase().replace('_', " ");
    let normalized = normalized.trim_end_matches(" slide").trim();

    match normalized {
        "problem" | "the problem" | "pain point" | "pain points" | "challenge" => {
            SlideType::Problem
        }
        "solution" | "the solution" | "our solution" => SlideType::Solution,
        "market" | "market opportunity" | "market size" | "opportunity" => SlideType::Market,
        "product" | "product demo" | "demo" | "product overview" => SlideType::Product,
        "business model" | "revenue model" | "monetization" => SlideType::BusinessModel,
        "traction" | "milestones" | "metrics" | "traction & milestones" => SlideType::Traction,
        "competition" | "competitive landscape" | "competitors" | "competitive advantage" => {
            SlideType::Competition
        }
        "go-to-market" | "go to market" | "gtm" | "go-to-market strategy" | "marketing" => {
            SlideType::GoToMarket
        }
        "team" | "the team" | "our team" | "management" => SlideType::Team,
        "financials" | "financial" | "financial projections" | "projections" | "finances" => {
            SlideType::Financials
        }
        "ask" | "the ask" | "investment" | "investment ask" | "funding" | "use of funds" => {
            SlideType::Ask
        }
        _ => SlideType::Cover,
    }
}
