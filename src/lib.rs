//! Trendmood - rate-limited, cached sentiment aggregation
//!
//! This crate classifies the sentiment of short social-media texts through
//! an external classifier, spending at most a fixed number of classifier
//! calls per second and never paying twice for the same text within the
//! cache lifetime. Items are aggregated per group (a hashtag, a topic) into
//! a label distribution and an overall label, and many groups are processed
//! as one batch in which a failing group is simply left out.
//!
//! # Trending Example
//!
//! ```rust,no_run
//! use trendmood::Trendmood;
//! use trendmood::providers::MastodonClient;
//!
//! #[tokio::main]
//! async fn main() -> trendmood::Result<()> {
//!     let pipeline = Trendmood::builder()
//!         .gemini("your-gemini-key")
//!         .build()?;
//!     let mastodon = MastodonClient::new("your-mastodon-token", "mastodon.social")?;
//!
//!     let result = pipeline.analyze_trending(&mastodon, 5, 10).await?;
//!     for group in &result.groups {
//!         println!("#{}: {}", group.name, group.overall_label);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Single Text Example
//!
//! ```rust,no_run
//! use trendmood::{Label, Trendmood};
//!
//! #[tokio::main]
//! async fn main() -> trendmood::Result<()> {
//!     let pipeline = Trendmood::builder()
//!         .gemini("your-gemini-key")
//!         .build()?;
//!
//!     // Never fails: classifier errors come back as Neutral.
//!     let label: Label = pipeline.classify_text("what a lovely morning").await;
//!     println!("{label}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod limiter;
pub mod pipeline;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, LabelCache};
pub use classifier::{Classification, Classifier, ClassifierConfig};
pub use error::{Error, Result};
pub use limiter::{RateLimitConfig, RateLimiter, RateLimiterSnapshot};
pub use pipeline::{
    BatchConfig, BatchOrchestrator, GroupAggregator, ItemClassifier, PipelineBuilder,
    SentimentPipeline, Trendmood,
};
pub use providers::{ItemSource, SentimentProvider, TrendSource};

// Re-export all types
pub use types::{
    BatchMeta, BatchResult, ClassifiedItem, Distribution, GroupResult, Item, Label, LabelCounts,
};

/// Crate version.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
