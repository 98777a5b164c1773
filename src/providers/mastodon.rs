//! Mastodon client for trending tags and hashtag search.
//!
//! Authenticates with a user access token against a single instance.
//! See: <https://docs.joinmastodon.org/methods/trends/> and
//! <https://docs.joinmastodon.org/methods/search/>.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::http::{DEFAULT_TIMEOUT, build_client, check_response};
use super::traits::{ItemSource, TrendSource};
use crate::types::Item;
use crate::{Error, Result};

/// Instance used when none is configured.
pub const DEFAULT_INSTANCE: &str = "mastodon.social";

/// Client for one Mastodon instance.
#[derive(Clone)]
pub struct MastodonClient {
    token: String,
    instance: String,
    http: Client,
    base_url: String,
}

impl MastodonClient {
    /// Create a client for `instance` (a bare host such as `mastodon.social`).
    pub fn new(token: impl Into<String>, instance: impl Into<String>) -> Result<Self> {
        let instance = instance.into();
        let base_url = format!("https://{instance}");
        Ok(Self {
            token: token.into(),
            instance,
            http: build_client(DEFAULT_TIMEOUT)?,
            base_url,
        })
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        token: impl Into<String>,
        instance: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            token: token.into(),
            instance: instance.into(),
            http: build_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_client(timeout)?;
        Ok(self)
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Currently trending tag names, most trending first.
    pub async fn trending_tags(&self, limit: usize) -> Result<Vec<String>> {
        let url = format!("{}/api/v1/trends", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("limit", limit)])
            .send()
            .await?;
        let tags: Vec<Tag> = check_response(response).await?.json().await?;
        Ok(tags.into_iter().take(limit).map(|t| t.name).collect())
    }

    /// Statuses tagged with `#tag`, in search order.
    pub async fn search_hashtag(&self, tag: &str, limit: usize) -> Result<Vec<Item>> {
        let url = format!("{}/api/v2/search", self.base_url);
        let query = format!("#{tag}");
        let limit = limit.to_string();
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("q", query.as_str()),
                ("type", "statuses"),
                ("limit", limit.as_str()),
                ("resolve", "true"),
            ])
            .send()
            .await?;
        let results: SearchResults = check_response(response).await?.json().await?;
        Ok(results.statuses.into_iter().map(Item::from).collect())
    }
}

#[async_trait]
impl ItemSource for MastodonClient {
    fn name(&self) -> &str {
        "mastodon"
    }

    async fn fetch_group_items(&self, group: &str, limit: usize) -> Result<Vec<Item>> {
        self.search_hashtag(group, limit)
            .await
            .map_err(|e| Error::Fetch {
                group: group.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TrendSource for MastodonClient {
    async fn list_trending(&self, limit: usize) -> Result<Vec<String>> {
        self.trending_tags(limit).await
    }

    fn source_name(&self) -> Option<String> {
        Some(self.instance.clone())
    }
}

#[derive(Deserialize)]
struct Tag {
    name: String,
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    statuses: Vec<Status>,
}

#[derive(Deserialize)]
struct Status {
    id: String,
    #[serde(default)]
    content: String,
    created_at: DateTime<Utc>,
    account: Account,
}

#[derive(Deserialize)]
struct Account {
    username: String,
}

impl From<Status> for Item {
    fn from(status: Status) -> Self {
        Item {
            id: status.id,
            content: status.content,
            author: status.account.username,
            created_at: status.created_at,
        }
    }
}
