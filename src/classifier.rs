//! Sentiment classifier with fail-open error policy.
//!
//! [`Classifier`] issues exactly one call to a [`SentimentProvider`] and
//! maps the answer to a [`Label`]. It never returns an error: any
//! transport or parse failure becomes `Neutral`, is logged, and is
//! counted. Quota and rate-limit failures additionally wait out a fixed
//! cooldown before returning, so a caller looping over items does not
//! hammer an exhausted quota.
//!
//! The cooldown is an ordinary `tokio::time::sleep`: it delays only the
//! failing call and is abandoned if that call's future is dropped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::Error;
use crate::providers::SentimentProvider;
use crate::telemetry;
use crate::types::Label;

/// Configuration for classifier failure handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Delay applied after a quota/rate-limit failure. Default: 2s.
    pub quota_backoff: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            quota_backoff: Duration::from_secs(2),
        }
    }
}

impl ClassifierConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cooldown applied after a quota failure.
    pub fn quota_backoff(mut self, delay: Duration) -> Self {
        self.quota_backoff = delay;
        self
    }
}

/// Outcome of one external classification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The provider answered; the label was derived from its response.
    Answered(Label),
    /// The provider failed; the label is the `Neutral` fallback.
    Fallback,
}

impl Classification {
    pub fn label(self) -> Label {
        match self {
            Classification::Answered(label) => label,
            Classification::Fallback => Label::Neutral,
        }
    }
}

/// Adapter from an external sentiment provider to [`Label`]s.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn SentimentProvider>,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(provider: Arc<dyn SentimentProvider>, config: ClassifierConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Classify normalized text. Never fails; see module docs.
    pub async fn classify(&self, text: &str) -> Label {
        self.classify_detailed(text).await.label()
    }

    /// Classify normalized text, reporting whether the label is a fallback.
    pub async fn classify_detailed(&self, text: &str) -> Classification {
        let provider = self.provider.name().to_owned();
        let start = Instant::now();
        let result = self.provider.classify_raw(text).await;
        metrics::histogram!(telemetry::CLASSIFY_DURATION_SECONDS, "provider" => provider.clone())
            .record(start.elapsed().as_secs_f64());

        match result {
            Ok(raw) => {
                metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
                    "provider" => provider,
                    "outcome" => "ok",
                )
                .increment(1);
                Classification::Answered(Label::from_response(&raw))
            }
            Err(e) => {
                metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
                    "provider" => provider.clone(),
                    "outcome" => "fallback",
                )
                .increment(1);
                self.handle_failure(&provider, &e).await;
                Classification::Fallback
            }
        }
    }

    async fn handle_failure(&self, provider: &str, error: &Error) {
        if error.is_quota() {
            let delay = self.config.quota_backoff;
            warn!(
                provider,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "classifier quota exhausted, cooling down"
            );
            metrics::counter!(telemetry::QUOTA_BACKOFFS_TOTAL, "provider" => provider.to_owned())
                .increment(1);
            tokio::time::sleep(delay).await;
        } else {
            warn!(
                provider,
                transient = error.is_transient(),
                error = %error,
                "sentiment classification failed, falling back to neutral"
            );
        }
    }
}
