use dotenvy::dotenv;
use slidegen_sdk::{
    groq::{GroqModel, GroqModelOptions},
    ollama::{OllamaModel, OllamaModelOptions},
    LanguageModel, LanguageModelInput,
};
use std::{env, time::Duration};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let model: Box<dyn LanguageModel> = match env::var("GROQ_API_KEY") {
        Ok(api_key) => Box::new(GroqModel::new(GroqModelOptions {
            api_key,
            ..Default::default()
        })),
        Err(_) => Box::new(OllamaModel::new(OllamaModelOptions::default())),
    };
    let model_id = if model.provider() == "groq" {
        "llama-3.1-8b-instant"
    } else {
        "llama3.1:8b"
    };

    let response = model
        .generate(LanguageModelInput {
            system_prompt: Some("You write one-line taglines for startups.".to_string()),
            max_tokens: Some(60),
            timeout: Some(Duration::from_secs(30)),
            ..LanguageModelInput::new(model_id, "A company that delivers fresh tea leaves.")
        })
        .await
        .unwrap();

    println!("{response:#?}");
}
