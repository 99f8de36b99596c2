mod common;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use common::{spawn_server, Received};
use serde_json::{json, Value};
use slidegen_sdk::{
    ollama::{OllamaModel, OllamaModelOptions},
    LanguageModel, LanguageModelError, LanguageModelInput, ModelUsage,
};
use std::sync::Arc;

async fn serve(reply: Value, received: Received) -> String {
    async fn generate(
        State((reply, received)): State<(Value, Received)>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        received.lock().unwrap().push(body);
        (StatusCode::OK, Json(reply))
    }

    let router = Router::new()
        .route("/api/generate", post(generate))
        .with_state((reply, received));
    spawn_server(router).await
}

fn local_model(base_url: String) -> OllamaModel {
    OllamaModel::new(OllamaModelOptions {
        base_url: Some(base_url),
        client: None,
    })
}

#[tokio::test]
async fn generate_sends_ollama_request_and_maps_response() {
    let received = Received::default();
    let base_url = serve(
        json!({
            "model": "llama3.1:8b",
            "response": "Title: Team\nContent: Founders",
            "done": true,
            "prompt_eval_count": 20,
            "eval_count": 8
        }),
        Arc::clone(&received),
    )
    .await;
    let model = local_model(base_url);

    let response = model
        .generate(LanguageModelInput {
            system_prompt: Some("Be brief.".to_string()),
            max_tokens: Some(64),
            temperature: Some(0.7),
            ..LanguageModelInput::new("llama3.1:8b", "Team slide")
        })
        .await
        .expect("generate should succeed");

    assert_eq!(model.provider(), "local");
    assert_eq!(response.text, "Title: Team\nContent: Founders");
    assert_eq!(
        response.usage,
        Some(ModelUsage {
            input_tokens: 20,
            output_tokens: 8,
        })
    );
    assert_eq!(
        received.lock().unwrap()[0],
        json!({
            "model": "llama3.1:8b",
            "prompt": "Team slide",
            "system": "Be brief.",
            "stream": false,
            "options": { "temperature": 0.7, "num_predict": 64 }
        })
    );
}

#[tokio::test]
async fn generate_omits_options_when_unset() {
    let received = Received::default();
    let base_url = serve(json!({ "response": "hello", "done": true }), Arc::clone(&received)).await;

    let response = local_model(base_url)
        .generate(LanguageModelInput::new("phi3:mini", "hi"))
        .await
        .expect("generate should succeed");

    assert_eq!(response.text, "hello");
    assert_eq!(response.usage, None);
    assert_eq!(
        received.lock().unwrap()[0],
        json!({ "model": "phi3:mini", "prompt": "hi", "stream": false })
    );
}

#[tokio::test]
async fn generate_fails_on_empty_response() {
    let base_url = serve(json!({ "response": "", "done": true }), Received::default()).await;

    let err = local_model(base_url)
        .generate(LanguageModelInput::new("llama3.1:8b", "hi"))
        .await
        .expect_err("empty response should fail");

    assert!(matches!(err, LanguageModelError::Invariant("local", _)));
}

#[tokio::test]
async fn generate_fails_when_server_is_down() {
    let model = local_model("http://127.0.0.1:9".to_string());

    let err = model
        .generate(LanguageModelInput::new("llama3.1:8b", "hi"))
        .await
        .expect_err("unreachable server should fail");

    match err {
        LanguageModelError::Transport(error) => assert!(error.is_connect()),
        other => panic!("unexpected error variant: {other:?}"),
    }
}
