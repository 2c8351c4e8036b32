//! Providers that map an ISBN straight to an image URL.

use crate::cover::CoverProvider;
use crate::error::FetchError;
use crate::fingerprint::{fingerprint, is_placeholder};
use crate::http::{expand_template, HttpClient};

pub struct DirectUrlProvider {
    name: String,
    client: HttpClient,
    url_template: String,
    placeholder: Option<String>,
}

impl DirectUrlProvider {
    /// `url_template` must contain `{isbn}`. `placeholder` is the fingerprint
    /// of the provider's generic "no cover" image, if it has one.
    pub fn new(
        name: impl Into<String>,
        client: HttpClient,
        url_template: impl Into<String>,
        placeholder: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            url_template: url_template.into(),
            placeholder,
        }
    }
}

impl CoverProvider for DirectUrlProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn attempt(&self, isbn: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let url = expand_template(&self.url_template, isbn);
        tracing::info!("Downloading {}", url);

        let response = self.client.get(&url, &[]).map_err(|e| FetchError::Network {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        if let Some(placeholder) = self.placeholder.as_deref() {
            if is_placeholder(&response.body, placeholder) {
                tracing::info!("Generic cover image from {}, skipping", self.name);
                return Ok(None);
            }
        }
        if !response.is_success() {
            tracing::debug!("{} answered HTTP {}", url, response.status);
            return Ok(None);
        }
        tracing::debug!(
            "{} bytes from {} (md5 {})",
            response.body.len(),
            self.name,
            fingerprint(&response.body)
        );
        Ok(Some(response.body))
    }
}
