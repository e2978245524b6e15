//! Pronoun lookup for the chat-overlay message renderer.
//!
//! Provides:
//! - `resolver`: memoizing cache that answers immediately and fills itself in the background
//! - `fetch`: the [`PronounFetcher`] seam and its HTTP implementation
//! - `http`: ureq agent construction and URL validation
//! - `error`: typed lookup failures

pub mod error;
pub mod fetch;
pub mod http;
pub mod resolver;

pub use error::PronounError;
pub use fetch::{HttpPronounFetcher, PronounFetcher, display_for_id};
pub use resolver::{CacheState, DEFAULT_WORKERS, PronounLookup, PronounResolver};
