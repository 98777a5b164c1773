//! Caching subsystem.
//!
//! - [`fingerprint`]: text normalization and the content fingerprint used
//!   as cache key.
//! - [`label::LabelCache`]: TTL cache of classifier labels, consulted by
//!   the item classifier before any rate-limited external call.

pub mod fingerprint;
pub mod label;

pub use fingerprint::{MAX_TEXT_CHARS, fingerprint, normalize};
pub use label::{CacheConfig, LabelCache};
