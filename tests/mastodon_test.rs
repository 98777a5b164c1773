//! Wiremock integration tests for MastodonClient.
#![cfg(feature = "mastodon")]

use std::sync::Arc;

use async_trait::async_trait;
use trendmood::providers::MastodonClient;
use trendmood::{Error, ItemSource, Label, Result, SentimentProvider, TrendSource, Trendmood};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn status(id: &str, content: &str, user: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "content": content,
        "created_at": "2024-05-01T12:00:00.000Z",
        "visibility": "public",
        "account": {"id": "1", "username": user, "acct": user}
    })
}

fn client(server: &MockServer) -> MastodonClient {
    MastodonClient::with_base_url("test_token", "test.social", server.uri()).unwrap()
}

#[tokio::test]
async fn test_trending_tags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/trends"))
        .and(query_param("limit", "2"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "rust", "url": "https://test.social/tags/rust", "history": []},
            {"name": "caturday", "url": "https://test.social/tags/caturday", "history": []},
            {"name": "extra", "url": "https://test.social/tags/extra", "history": []}
        ])))
        .mount(&mock_server)
        .await;

    let tags = client(&mock_server).list_trending(2).await.unwrap();
    assert_eq!(tags, ["rust", "caturday"]);
}

#[tokio::test]
async fn test_search_hashtag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .and(query_param("q", "#rust"))
        .and(query_param("type", "statuses"))
        .and(query_param("limit", "2"))
        .and(query_param("resolve", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accounts": [],
            "hashtags": [],
            "statuses": [
                status("1", "<p>love #rust</p>", "ferris"),
                status("2", "<p>borrowck again</p>", "crab")
            ]
        })))
        .mount(&mock_server)
        .await;

    let items = client(&mock_server)
        .fetch_group_items("rust", 2)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "1");
    assert_eq!(items[0].author, "ferris");
    assert_eq!(items[1].content, "<p>borrowck again</p>");
}

#[tokio::test]
async fn test_search_failure_names_group() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .fetch_group_items("rust", 5)
        .await
        .unwrap_err();
    match err {
        Error::Fetch { group, message } => {
            assert_eq!(group, "rust");
            assert!(message.contains("503"), "message: {message}");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_trends_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/trends"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "The access token is invalid"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).list_trending(5).await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
}

#[test]
fn test_source_name_is_instance() {
    let client = MastodonClient::with_base_url("t", "test.social", "http://localhost").unwrap();
    assert_eq!(client.instance(), "test.social");
    assert_eq!(client.source_name().as_deref(), Some("test.social"));
}

struct HappyProvider;

#[async_trait]
impl SentimentProvider for HappyProvider {
    fn name(&self) -> &str {
        "happy"
    }

    async fn classify_raw(&self, _text: &str) -> Result<String> {
        Ok("Positive".to_string())
    }
}

/// Trending analysis against a mocked instance where one tag search fails.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_analyze_trending_drops_failed_tag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/trends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "good"},
            {"name": "broken"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .and(query_param("q", "#good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statuses": [status("10", "sunny", "a")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .and(query_param("q", "#broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let pipeline = Trendmood::builder()
        .provider(Arc::new(HappyProvider))
        .build()
        .unwrap();

    let result = pipeline
        .analyze_trending(&client(&mock_server), 2, 1)
        .await
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].name, "good");
    assert_eq!(result.groups[0].overall_label, Label::Positive);
    assert_eq!(result.meta.requested_groups, 2);
    assert_eq!(result.meta.source.as_deref(), Some("test.social"));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["groups"][0]["items"][0]["sentiment"], "Positive");
}
