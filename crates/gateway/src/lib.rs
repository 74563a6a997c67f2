//! External metadata gateway: a stateless normalizer over two third-party
//! book search APIs (Open Library and Google Books).
//!
//! No caching, no retries, no merging between providers; the frontend decides
//! whether to fall back to the second provider.

pub mod google_books;
pub mod open_library;

use serde::Serialize;
use thiserror::Error;

/// Search hit limits are clamped to this upper bound regardless of what the
/// caller asks for.
pub const MAX_RESULTS: u32 = 30;

pub(crate) const UNTITLED: &str = "Untitled";
pub(crate) const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Uniform search result shape both providers normalize into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub key: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
}

/// Gateway failure taxonomy.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider answered with a non-success status (maps to HTTP 502).
    #[error("{provider} bad status: {status}")]
    BadStatus { provider: &'static str, status: u16 },

    /// Transport or decode failure (maps to HTTP 500).
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Client over both upstream providers.
///
/// Base URLs are injectable so tests can point at a local server; production
/// uses the public endpoints.
#[derive(Debug, Clone)]
pub struct MetadataGateway {
    http: reqwest::Client,
    open_library_base: String,
    google_books_base: String,
}

impl MetadataGateway {
    pub fn new() -> Self {
        Self::with_bases(
            "https://openlibrary.org".to_owned(),
            "https://www.googleapis.com".to_owned(),
        )
    }

    pub fn with_bases(open_library_base: String, google_books_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            open_library_base,
            google_books_base,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn open_library_base(&self) -> &str {
        &self.open_library_base
    }

    pub(crate) fn google_books_base(&self) -> &str {
        &self.google_books_base
    }
}

impl Default for MetadataGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a requested result count to [`MAX_RESULTS`], applying the
/// provider's default when absent.
pub(crate) fn clamp_limit(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).min(MAX_RESULTS)
}
