//! Google Gemini client for sentiment classification.
//!
//! Uses the `generateContent` endpoint with a one-word answer prompt.
//! See: <https://ai.google.dev/api/generate-content>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{DEFAULT_TIMEOUT, build_client, check_response};
use super::traits::SentimentProvider;
use crate::{Error, Result};

/// Default base URL for the Gemini API
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for classification.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Client for Gemini sentiment classification.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            http: build_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    /// Use a different Gemini model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_client(timeout)?;
        Ok(self)
    }

    /// Ask the model for the sentiment of `text`, returning its raw answer.
    pub async fn generate_sentiment(&self, text: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: sentiment_prompt(text),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_response(response).await.map_err(|e| match e {
            Error::Api { status: 404, .. } => Error::ModelNotFound(self.model.clone()),
            other => other,
        })?;

        let body: GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(Error::EmptyResponse)
    }
}

#[async_trait]
impl SentimentProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn classify_raw(&self, text: &str) -> Result<String> {
        self.generate_sentiment(text).await
    }
}

fn sentiment_prompt(text: &str) -> String {
    format!("Analyze sentiment of: \"{text}\". Reply ONLY with Positive, Negative, or Neutral.")
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}
