//! Blocking HTTP plumbing shared by the title search and the cover providers.

use std::time::Duration;

/// Default endpoints. Overridable so the providers can be pointed at a local server.
pub const ISBN_DE_COVER_URL: &str = "https://buch.isbn.de/gross/{isbn}.jpg";
pub const OPENLIBRARY_COVER_URL: &str = "http://covers.openlibrary.org/b/isbn/{isbn}-L.jpg";
pub const GOOGLE_BOOKS_VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Placeholder in cover URL templates.
pub const ISBN_PLACEHOLDER: &str = "{isbn}";

/// Remote endpoints used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Cover URL template for buch.isbn.de; `{isbn}` is substituted.
    pub isbn_de: String,
    /// Cover URL template for Open Library; `{isbn}` is substituted.
    pub openlibrary: String,
    /// Google Books volumes search endpoint (title search and thumbnail lookup).
    pub google_books: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            isbn_de: ISBN_DE_COVER_URL.to_string(),
            openlibrary: OPENLIBRARY_COVER_URL.to_string(),
            google_books: GOOGLE_BOOKS_VOLUMES_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at `base` (a mock server URI), keeping the real paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            isbn_de: format!("{base}/gross/{{isbn}}.jpg"),
            openlibrary: format!("{base}/b/isbn/{{isbn}}-L.jpg"),
            google_books: format!("{base}/books/v1/volumes"),
        }
    }
}

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper around a shared blocking client. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(concat!("epub-covers/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { inner })
    }

    /// Issue a GET and read the whole body. Non-success statuses are not errors.
    pub fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, reqwest::Error> {
        let response = self.inner.get(url).query(query).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Substitute the ISBN into a cover URL template.
pub fn expand_template(template: &str, isbn: &str) -> String {
    template.replace(ISBN_PLACEHOLDER, isbn)
}
