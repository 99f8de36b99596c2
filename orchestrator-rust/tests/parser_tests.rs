use slidegen_orchestrator::{
    parser::{normalize_slide_type, parse_deck, parse_single},
    ParseError, SlideType,
};

#[test]
fn parse_single_extracts_labelled_fields() {
    let text = "Title: The Problem\nContent: • Users waste 5 hours weekly\n• Costs 20%\nSpeaker Notes: Emphasize pain";

    let slide = parse_single(text, SlideType::Problem).unwrap();

    assert_eq!(slide.title, "The Problem");
    assert_eq!(
        slide.content,
        "• Users waste 5 hours weekly\n• Costs 20%"
    );
    assert_eq!(slide.speaker_notes.as_deref(), Some("Emphasize pain"));
}

#[test]
fn parse_single_accepts_markdown_labels() {
    let text = "**Title:** Market Opportunity\n**Content:**\n- TAM $40B\n- SAM $8B\n";

    let slide = parse_single(text, SlideType::Market).unwrap();

    assert_eq!(slide.title, "Market Opportunity");
    assert_eq!(slide.content, "- TAM $40B\n- SAM $8B");
    assert_eq!(slide.speaker_notes, None);
}

#[test]
fn parse_single_defaults_title_from_slide_type() {
    let text = "Content: We help teams ship faster.";

    let slide = parse_single(text, SlideType::Solution).unwrap();

    assert_eq!(slide.title, "Our Solution");
    assert_eq!(slide.content, "We help teams ship faster.");
}

#[test]
fn parse_single_uses_whole_text_without_content_label() {
    let text = "  A plain answer with no labels at all.  ";

    let slide = parse_single(text, SlideType::Team).unwrap();

    assert_eq!(slide.title, "Our Team");
    assert_eq!(slide.content, "A plain answer with no labels at all.");
}

#[test]
fn parse_single_stops_content_at_known_section_label() {
    let text = "Title: Traction\nContent: 10k users\nKey Metrics: 30% MoM growth";

    let slide = parse_single(text, SlideType::Traction).unwrap();

    assert_eq!(slide.content, "10k users");
}

#[test]
fn parse_single_stops_content_at_inline_section_label() {
    let text = "Title: Market Opportunity\nContent: TAM is $10B. Growth: 20% CAGR";

    let slide = parse_single(text, SlideType::Market).unwrap();

    assert_eq!(slide.title, "Market Opportunity");
    assert_eq!(slide.content, "TAM is $10B.");
}

#[test]
fn parse_single_keeps_bullets_that_look_like_labels() {
    let text = "Title: Traction\nContent:\n- Growth: 30% MoM\n- Revenue: $40k MRR";

    let slide = parse_single(text, SlideType::Traction).unwrap();

    assert_eq!(slide.content, "- Growth: 30% MoM\n- Revenue: $40k MRR");
}

#[test]
fn parse_single_accepts_qualified_labels() {
    let text = "Slide Title: Market Opportunity\nSlide Content: TAM is $10B";

    let slide = parse_single(text, SlideType::Market).unwrap();

    assert_eq!(slide.title, "Market Opportunity");
    assert_eq!(slide.content, "TAM is $10B");
}

#[test]
fn parse_single_rejects_empty_title() {
    let error = parse_single("Title:\nContent: something", SlideType::Cover).unwrap_err();

    assert_eq!(error, ParseError::EmptyTitle);
}

#[test]
fn parse_single_rejects_empty_content() {
    let error = parse_single("Title: Hello\nContent:\nSpeaker Notes: hi", SlideType::Cover)
        .unwrap_err();

    assert_eq!(error, ParseError::EmptyContent);
}

#[test]
fn parse_deck_splits_on_slide_markers() {
    let text = "SLIDE 1: Cover\nTitle: Acme\nContent: Rockets for everyone\n---\n\
SLIDE 2: Problem\nTitle: Launches are expensive\nContent: - $10M per launch\nSpeaker Notes: Pause here\n---\n\
SLIDE 3: Go-to-Market\nTitle: Distribution\nContent: Direct sales\n";

    let slides = parse_deck(text);

    assert_eq!(slides.len(), 3);
    assert_eq!(slides[0].title, "Acme");
    assert_eq!(slides[0].content, "Rockets for everyone");
    assert_eq!(slides[0].slide_type, SlideType::Cover);
    assert_eq!(slides[1].slide_type, SlideType::Problem);
    assert_eq!(slides[1].content, "- $10M per launch");
    assert_eq!(slides[1].speaker_notes.as_deref(), Some("Pause here"));
    assert_eq!(slides[2].slide_type, SlideType::GoToMarket);
    assert_eq!(
        slides.iter().map(|slide| slide.slide_order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn parse_deck_skips_blocks_without_content() {
    let text = "SLIDE 1: Cover\nTitle: Acme\nContent: Intro\n---\n\
SLIDE 2: Problem\nTitle: Missing body\n---\n\
SLIDE 3: Team\nTitle: Founders\nContent: Two engineers\n";

    let slides = parse_deck(text);

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[1].title, "Founders");
    assert_eq!(slides[1].slide_order, 1);
}

#[test]
fn parse_deck_without_markers_is_empty() {
    assert!(parse_deck("Title: Lonely\nContent: no markers here").is_empty());
}

#[test]
fn normalize_slide_type_maps_free_text_labels() {
    assert_eq!(normalize_slide_type("The Problem"), SlideType::Problem);
    assert_eq!(normalize_slide_type("business_model"), SlideType::BusinessModel);
    assert_eq!(normalize_slide_type("Go to Market"), SlideType::GoToMarket);
    assert_eq!(normalize_slide_type("**Team Slide**"), SlideType::Team);
    assert_eq!(normalize_slide_type("Use of Funds"), SlideType::Ask);
    assert_eq!(normalize_slide_type("Appendix"), SlideType::Cover);
}
