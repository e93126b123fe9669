//! # AI Provider Tests
//!
//! Exercises the Gemini and OpenAI-compatible providers against a `wiremock` server,
//! and the factory that chooses between them.

use keylessons::errors::PromptError;
use keylessons::providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider};
use keylessons::providers::factory::{
    create_provider, gemini_api_url, ProviderSettings, DEFAULT_GEMINI_MODEL,
};
use serde_json::json;
use std::sync::Once;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-pro:generateContent";

// --- Gemini ---

#[tokio::test]
async fn test_gemini_sends_prompt_and_key() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "What are the lessons?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "<markdown>Be kind</markdown>" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(format!("{}{GEMINI_PATH}", server.uri())).unwrap();

    // --- 2. Act ---
    let result = provider
        .generate("What are the lessons?", "test-key")
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(result, "<markdown>Be kind</markdown>");
}

#[tokio::test]
async fn test_gemini_error_status_is_api_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(format!("{}{GEMINI_PATH}", server.uri())).unwrap();
    let result = provider.generate("prompt", "bad-key").await;

    match result {
        Err(PromptError::AiApi(message)) => {
            assert!(message.contains("400"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("Expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gemini_without_candidates_is_empty_response() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(format!("{}{GEMINI_PATH}", server.uri())).unwrap();
    let result = provider.generate("prompt", "key").await;

    assert!(matches!(result, Err(PromptError::EmptyResponse)));
}

#[tokio::test]
async fn test_gemini_malformed_body_is_deserialization_error() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(format!("{}{GEMINI_PATH}", server.uri())).unwrap();
    let result = provider.generate("prompt", "key").await;

    assert!(matches!(result, Err(PromptError::AiDeserialization(_))));
}

// --- OpenAI-compatible ---

#[tokio::test]
async fn test_local_provider_sends_bearer_token_and_model() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer local-key"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "Summarize" }],
            "model": "llama3",
            "temperature": 0.0,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "<markdown>ok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("llama3".to_string()),
    )
    .unwrap();
    let result = provider.generate("Summarize", "local-key").await.unwrap();

    assert_eq!(result, "<markdown>ok");
}

#[tokio::test]
async fn test_local_provider_without_choices_is_empty_response() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(server.uri(), None).unwrap();
    let result = provider.generate("prompt", "").await;

    assert!(matches!(result, Err(PromptError::EmptyResponse)));
}

// --- Factory ---

#[test]
fn test_factory_defaults_to_gemini() {
    let settings = ProviderSettings::default();
    assert_eq!(settings.model, DEFAULT_GEMINI_MODEL);
    assert!(create_provider(&settings).is_ok());
    assert_eq!(
        gemini_api_url("gemini-1.5-pro"),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
    );
}

#[test]
fn test_factory_requires_url_for_other_models() {
    let settings = ProviderSettings {
        model: "llama3".to_string(),
        api_url: None,
    };
    let result = create_provider(&settings);
    assert!(matches!(result, Err(PromptError::MissingAiProvider(_))));

    let settings = ProviderSettings {
        model: "llama3".to_string(),
        api_url: Some("http://localhost:11434/v1/chat/completions".to_string()),
    };
    assert!(create_provider(&settings).is_ok());
}

#[test]
fn test_factory_rejects_empty_model() {
    let settings = ProviderSettings {
        model: "  ".to_string(),
        api_url: None,
    };
    assert!(matches!(
        create_provider(&settings),
        Err(PromptError::MissingAiProvider(_))
    ));
}

/// The factory-built provider honours an overridden endpoint.
#[tokio::test]
async fn test_factory_gemini_with_url_override() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/custom"))
        .and(query_param("key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "hi" }] } }]
        })))
        .mount(&server)
        .await;

    let provider = create_provider(&ProviderSettings {
        model: "gemini-2.0-flash".to_string(),
        api_url: Some(format!("{}/custom", server.uri())),
    })
    .unwrap();

    assert_eq!(provider.generate("prompt", "k").await.unwrap(), "hi");
}
