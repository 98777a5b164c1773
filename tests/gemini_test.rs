//! Wiremock integration tests for GeminiClient.
#![cfg(feature = "gemini")]

use std::sync::Arc;
use std::time::Duration;

use trendmood::providers::GeminiClient;
use trendmood::{Error, Label, SentimentProvider, Trendmood};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn answer(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_sentiment_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test_key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{
                "text": "Analyze sentiment of: \"great launch\". Reply ONLY with Positive, Negative, or Neutral."
            }]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(" Positive\n")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let raw = client.generate_sentiment("great launch").await.unwrap();
    assert_eq!(raw, "Positive");
}

#[tokio::test]
async fn test_custom_model_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("Negative")))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri())
        .unwrap()
        .model("gemini-2.0-flash");
    assert_eq!(client.classify_raw("awful").await.unwrap(), "Negative");
}

#[tokio::test]
async fn test_quota_error_maps_to_quota_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded(_)), "got {err:?}");
    assert!(err.is_quota());
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"message": "API key not valid"}
        })))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("bad_key", mock_server.uri()).unwrap();
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
}

#[tokio::test]
async fn test_unknown_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri())
        .unwrap()
        .model("gemini-0.1-nope");
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert!(matches!(err, Error::ModelNotFound(ref m) if m == "gemini-0.1-nope"));
}

#[tokio::test]
async fn test_blocked_prompt_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client.generate_sentiment("anything").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }));
    assert!(err.is_transient());
}

/// End to end through the pipeline: the server sees the normalized text once.
#[tokio::test]
async fn test_pipeline_classifies_through_gemini() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{
                "text": "Analyze sentiment of: \"so happy today\". Reply ONLY with Positive, Negative, or Neutral."
            }]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("Positive")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let pipeline = Trendmood::builder()
        .provider(Arc::new(client))
        .build()
        .unwrap();

    assert_eq!(pipeline.classify_text("so happy\ntoday  ").await, Label::Positive);
    assert_eq!(pipeline.classify_text("so happy\ntoday").await, Label::Positive);
}

/// A quota failure surfaces as Neutral after the cooldown.
#[tokio::test]
async fn test_pipeline_falls_back_on_quota() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "quota exceeded"}
        })))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let pipeline = Trendmood::builder()
        .provider(Arc::new(client))
        .classifier(trendmood::ClassifierConfig::new().quota_backoff(Duration::from_millis(10)))
        .build()
        .unwrap();

    assert_eq!(pipeline.classify_text("anything").await, Label::Neutral);
}
