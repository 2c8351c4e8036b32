//! Google Books thumbnail: search by ISBN, then download the first result's
//! thumbnail link.

use crate::cover::CoverProvider;
use crate::error::FetchError;
use crate::http::HttpClient;
use crate::lookup::google_books::VolumesResponse;

const PROVIDER: &str = "googlebooks";

pub struct GoogleBooksCoverProvider {
    client: HttpClient,
    volumes_url: String,
}

impl GoogleBooksCoverProvider {
    pub fn new(client: HttpClient, volumes_url: impl Into<String>) -> Self {
        Self {
            client,
            volumes_url: volumes_url.into(),
        }
    }
}

impl CoverProvider for GoogleBooksCoverProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn attempt(&self, isbn: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let q = format!("isbn:{isbn}");
        tracing::info!("Searching {} for q={}", self.volumes_url, q);

        let network = |url: &str, e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            detail: e.to_string(),
        };

        let response = self
            .client
            .get(&self.volumes_url, &[("q", q.as_str())])
            .map_err(|e| network(self.volumes_url.as_str(), e))?;
        if !response.is_success() {
            return Ok(None);
        }

        let volumes =
            VolumesResponse::parse(&response.body).map_err(|e| FetchError::InvalidResponse {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;
        let Some(thumbnail) = volumes.first_thumbnail() else {
            return Ok(None);
        };

        tracing::info!("Downloading {}", thumbnail);
        let image = self.client.get(thumbnail, &[]).map_err(|e| network(thumbnail, e))?;
        if !image.is_success() {
            return Ok(None);
        }
        Ok(Some(image.body))
    }
}
