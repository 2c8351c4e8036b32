//! Google Books: title search for an ISBN-13, plus the response model shared
//! with the thumbnail cover provider.

use serde::Deserialize;

use crate::error::LookupError;
use crate::http::HttpClient;
use crate::lookup::{build_search_terms, IsbnResolver, TitleQuery};

const PROVIDER: &str = "googlebooks";

/// Identifier type accepted from search results.
pub const ISBN_13: &str = "ISBN_13";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndustryIdentifier {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl VolumesResponse {
    pub(crate) fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// First `ISBN_13` identifier, scanning items in the order returned.
    pub(crate) fn first_isbn_13(&self) -> Option<&str> {
        self.items
            .iter()
            .flat_map(|item| item.volume_info.industry_identifiers.iter())
            .filter(|id| id.kind == ISBN_13)
            .find_map(|id| id.identifier.as_deref())
    }

    /// Thumbnail link of the first item only.
    pub(crate) fn first_thumbnail(&self) -> Option<&str> {
        self.items
            .first()?
            .volume_info
            .image_links
            .as_ref()?
            .thumbnail
            .as_deref()
    }
}

/// Resolves a title query against the Google Books volumes search.
pub struct GoogleBooksResolver {
    client: HttpClient,
    volumes_url: String,
    api_key: Option<String>,
}

impl GoogleBooksResolver {
    /// An empty key is treated as no key.
    pub fn new(
        client: HttpClient,
        volumes_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            volumes_url: volumes_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

impl IsbnResolver for GoogleBooksResolver {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn attempt(&self, query: &TitleQuery) -> Result<Option<String>, LookupError> {
        let terms = build_search_terms(query);
        let mut params = vec![("q", terms.as_str())];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("key", key));
        }
        tracing::debug!("Title search on {}: q={}", self.volumes_url, terms);

        let response = self
            .client
            .get(&self.volumes_url, &params)
            .map_err(|e| LookupError::Network(e.to_string()))?;
        if !response.is_success() {
            return Err(LookupError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}", response.status),
            });
        }

        let volumes =
            VolumesResponse::parse(&response.body).map_err(|e| LookupError::ProviderError {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;
        Ok(volumes.first_isbn_13().map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn crime_and_punishment() -> TitleQuery {
        TitleQuery {
            title: "Crime and Punishment".into(),
            author: Some("Dostoevsky".into()),
            year: Some("1866".into()),
        }
    }

    async fn attempt_against(
        server: &MockServer,
        api_key: Option<String>,
        query: TitleQuery,
    ) -> Result<Option<String>, LookupError> {
        let url = format!("{}/books/v1/volumes", server.uri());
        tokio::task::spawn_blocking(move || {
            let resolver = GoogleBooksResolver::new(HttpClient::new().unwrap(), url, api_key);
            resolver.attempt(&query)
        })
        .await
        .unwrap()
    }

    #[test]
    fn first_isbn_13_skips_other_identifier_types() {
        let body = json!({
            "items": [
                { "volumeInfo": { "industryIdentifiers": [
                    { "type": "ISBN_10", "identifier": "0140449264" },
                    { "type": "OTHER", "identifier": "UOM:39015" }
                ]}},
                { "volumeInfo": {} },
                { "volumeInfo": { "industryIdentifiers": [
                    { "type": "ISBN_13", "identifier": "9780140449266" }
                ]}}
            ]
        });
        let parsed = VolumesResponse::parse(body.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.first_isbn_13(), Some("9780140449266"));
    }

    #[test]
    fn isbn_13_without_identifier_keeps_scanning() {
        let body = json!({
            "items": [
                { "volumeInfo": { "industryIdentifiers": [{ "type": "ISBN_13" }] } },
                { "volumeInfo": { "industryIdentifiers": [
                    { "type": "ISBN_13", "identifier": "9780140449266" }
                ]}}
            ]
        });
        let parsed = VolumesResponse::parse(body.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.first_isbn_13(), Some("9780140449266"));
    }

    #[test]
    fn response_without_items_has_no_isbn() {
        let parsed = VolumesResponse::parse(br#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert_eq!(parsed.first_isbn_13(), None);
        assert_eq!(parsed.first_thumbnail(), None);
    }

    #[test]
    fn thumbnail_comes_from_first_item_only() {
        let body = json!({
            "items": [
                { "volumeInfo": {} },
                { "volumeInfo": { "imageLinks": { "thumbnail": "http://example.com/t.jpg" } } }
            ]
        });
        let parsed = VolumesResponse::parse(body.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.first_thumbnail(), None);
    }

    #[tokio::test]
    async fn query_includes_title_author_and_year() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("q", "Crime and Punishment Dostoevsky (1866)"))
            .and(query_param_is_missing("key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "volumeInfo": { "industryIdentifiers": [
                    { "type": "ISBN_13", "identifier": "9780140449136" }
                ]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let isbn = attempt_against(&server, None, crime_and_punishment()).await.unwrap();
        assert_eq!(isbn.as_deref(), Some("9780140449136"));
    }

    #[tokio::test]
    async fn api_key_is_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        let isbn = attempt_against(&server, Some("secret".into()), crime_and_punishment())
            .await
            .unwrap();
        assert_eq!(isbn, None);
    }

    #[tokio::test]
    async fn empty_api_key_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param_is_missing("key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let isbn = attempt_against(&server, Some(String::new()), crime_and_punishment())
            .await
            .unwrap();
        assert_eq!(isbn, None);
    }

    #[tokio::test]
    async fn invalid_json_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>quota</html>"))
            .mount(&server)
            .await;

        let err = attempt_against(&server, None, crime_and_punishment()).await.unwrap_err();
        assert!(matches!(err, LookupError::ProviderError { .. }));
    }

    #[tokio::test]
    async fn http_error_status_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = attempt_against(&server, None, crime_and_punishment()).await.unwrap_err();
        assert!(matches!(err, LookupError::ProviderError { .. }));
    }
}
