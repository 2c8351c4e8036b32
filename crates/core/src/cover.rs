//! Cover acquisition: an ordered chain of image providers keyed by ISBN.

pub mod direct;
pub mod google_books;

use crate::error::FetchError;
use crate::fingerprint::{ISBN_DE_PLACEHOLDER, OPENLIBRARY_PLACEHOLDER};
use crate::http::{Endpoints, HttpClient};

pub use direct::DirectUrlProvider;
pub use google_books::GoogleBooksCoverProvider;

/// One source of cover images.
pub trait CoverProvider: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means the provider has no usable cover for this ISBN,
    /// including when it only serves its placeholder image.
    fn attempt(&self, isbn: &str) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Downloaded cover bytes and the provider that supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub bytes: Vec<u8>,
    pub provider: String,
}

/// Providers tried in order; the first cover found wins.
pub struct CoverChain {
    providers: Vec<Box<dyn CoverProvider>>,
}

impl CoverChain {
    pub fn new(providers: Vec<Box<dyn CoverProvider>>) -> Self {
        Self { providers }
    }

    /// buch.isbn.de, then Open Library, then the Google Books thumbnail.
    pub fn standard(client: &HttpClient, endpoints: &Endpoints) -> Self {
        Self::new(vec![
            Box::new(DirectUrlProvider::new(
                "isbn.de",
                client.clone(),
                endpoints.isbn_de.clone(),
                Some(ISBN_DE_PLACEHOLDER.to_string()),
            )),
            Box::new(DirectUrlProvider::new(
                "openlibrary",
                client.clone(),
                endpoints.openlibrary.clone(),
                Some(OPENLIBRARY_PLACEHOLDER.to_string()),
            )),
            Box::new(GoogleBooksCoverProvider::new(
                client.clone(),
                endpoints.google_books.clone(),
            )),
        ])
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Try each provider in turn. A failing provider is logged and skipped.
    pub fn fetch(&self, isbn: &str) -> Option<CoverImage> {
        for provider in &self.providers {
            match provider.attempt(isbn) {
                Ok(Some(bytes)) => {
                    return Some(CoverImage {
                        bytes,
                        provider: provider.name().to_string(),
                    });
                }
                Ok(None) => tracing::info!("No cover from {} for {}", provider.name(), isbn),
                Err(e) => tracing::warn!("Cover provider {} failed: {}", provider.name(), e),
            }
        }
        None
    }
}
