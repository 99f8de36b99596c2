//! Calls real backends. Run with `--ignored` once the keys are in `.env`.
use slidegen_sdk::{
    groq::{GroqModel, GroqModelOptions},
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput,
};
use std::env;

fn env_key(name: &str) -> String {
    dotenvy::dotenv().ok();
    env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn cover_slide_input(model_id: &str) -> LanguageModelInput {
    LanguageModelInput {
        max_tokens: Some(200),
        temperature: Some(0.2),
        ..LanguageModelInput::new(
            model_id,
            "Write a cover slide for Acme Robotics.\nTitle: <title>\nContent: <content>",
        )
    }
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn openai_generates_text() {
    let model = OpenAIChatModel::new(OpenAIChatModelOptions {
        api_key: env_key("OPENAI_API_KEY"),
        ..Default::default()
    });

    let response = model
        .generate(cover_slide_input("gpt-4o-mini"))
        .await
        .expect("openai generate");

    assert!(!response.text.trim().is_empty());
}

#[tokio::test]
#[ignore = "requires GROQ_API_KEY"]
async fn groq_generates_text() {
    let model = GroqModel::new(GroqModelOptions {
        api_key: env_key("GROQ_API_KEY"),
        ..Default::default()
    });

    let response = model
        .generate(cover_slide_input("llama-3.1-8b-instant"))
        .await
        .expect("groq generate");

    assert!(!response.text.trim().is_empty());
}
