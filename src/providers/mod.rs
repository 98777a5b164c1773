//! Collaborator traits and their HTTP implementations.
//!
//! The traits in [`traits`] are all the pipeline depends on. The concrete
//! clients are optional:
//! - [`GeminiClient`] (feature `gemini`): sentiment via Gemini `generateContent`;
//! - [`MastodonClient`] (feature `mastodon`): trending tags and hashtag search.

pub mod traits;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "mastodon")]
pub mod mastodon;

#[cfg(any(feature = "gemini", feature = "mastodon"))]
mod http;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
#[cfg(feature = "mastodon")]
pub use mastodon::MastodonClient;
pub use traits::{ItemSource, SentimentProvider, TrendSource};
