//! Text items supplied by an item source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Label;

/// A short text item (e.g. a social-media post).
///
/// Owned by the caller that fetched it; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque identifier assigned by the source.
    pub id: String,
    /// Raw text content, possibly HTML.
    pub content: String,
    /// Author handle.
    pub author: String,
    /// When the item was created at the source.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an item stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            author: author.into(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// An item together with its sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    #[serde(flatten)]
    pub item: Item,
    #[serde(rename = "sentiment")]
    pub label: Label,
}
