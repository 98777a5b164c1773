//! Sentiment label types.
//!
//! Every classification ends in exactly one [`Label`]; there is no
//! "unknown" variant; unrecognised classifier output maps to `Neutral`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sentiment of a single text item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Text expresses a favourable sentiment.
    Positive,
    /// Text expresses an unfavourable sentiment.
    Negative,
    /// Text is neutral, unclear, or could not be classified.
    #[default]
    Neutral,
}

impl Label {
    /// All labels, in distribution order.
    pub const ALL: [Label; 3] = [Label::Positive, Label::Neutral, Label::Negative];

    /// Derive a label from free-form classifier output.
    ///
    /// Case-insensitive substring match: "positive" → `Positive`,
    /// "negative" → `Negative`, anything else → `Neutral`. When both
    /// keywords appear, `Negative` wins.
    pub fn from_response(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("negative") {
            Label::Negative
        } else if lowered.contains("positive") {
            Label::Positive
        } else {
            Label::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
            Label::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
