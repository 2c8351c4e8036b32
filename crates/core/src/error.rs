/// Errors surfaced to callers of the pipeline. Per-stage errors below stay
/// inside the pipeline, which logs them and carries on with the next archive.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(String),

    #[error("No package document (.opf) in archive")]
    MissingPackageDocument,

    #[error("Malformed package document {entry}: {detail}")]
    MalformedPackageDocument { entry: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider {provider} returned error: {message}")]
    ProviderError { provider: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error fetching {url}: {detail}")]
    Network { url: String, detail: String },

    #[error("Provider {provider} returned an unreadable response: {message}")]
    InvalidResponse { provider: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config file {path}: {detail}")]
    Invalid { path: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_surface_as_cover_error() {
        let err = reqwest::blocking::get("not a url").unwrap_err();
        let err: CoverError = err.into();
        assert!(err.to_string().starts_with("HTTP client error"), "{err}");
    }
}
