//! Resource fetchers for the inkpage renderer.
//!
//! This crate provides platform-specific implementations of the
//! `ResourceFetcher` trait from inkpage-traits.
//!
//! ## Available Fetchers
//!
//! - [`FilesystemFetcher`]: Reads resources from the local filesystem
//! - [`HttpFetcher`]: Downloads `http://` and `https://` resources
//! - [`FallbackFetcher`]: Tries one fetcher, then another on any failure
//!
//! [`default_fetcher`] wires them in the standard order: filesystem first,
//! network second.

mod fallback;
mod filesystem;
mod http;

pub use fallback::FallbackFetcher;
pub use filesystem::FilesystemFetcher;
pub use http::HttpFetcher;

// Re-export the in-memory fetcher from inkpage-traits for convenience
pub use inkpage_traits::InMemoryFetcher;

use inkpage_traits::ResourceFetcher;
use std::sync::Arc;

/// Lookup through `filesystem` first, falling back to HTTP.
pub fn default_fetcher(filesystem: FilesystemFetcher, user_agent: &str) -> Arc<dyn ResourceFetcher> {
    Arc::new(FallbackFetcher::new(
        Arc::new(filesystem),
        Arc::new(HttpFetcher::new(user_agent)),
    ))
}
