//! Per-archive orchestration: package metadata → title search → cover chain → `cover.jpg`.
//!
//! Every stage short-circuits: a later resolver or provider only runs after
//! the earlier one reported not-found or failed. Failures stay local to the
//! archive being processed; a run never stops early.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AppConfig;
use crate::cover::CoverChain;
use crate::error::{CoverError, ExtractError};
use crate::hints::{PathHints, SegmentConvention};
use crate::http::{Endpoints, HttpClient};
use crate::lookup::google_books::GoogleBooksResolver;
use crate::lookup::{IsbnResolver, TitleQuery};
use crate::opf::{extract_metadata, ExtractOutcome};
use crate::progress::{ArchiveProgress, ProgressHandler, Stage};
use crate::walk::{cover_path, find_archives};

/// Final state of one archive after a pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ArchiveOutcome {
    /// A cover file was already present; nothing was attempted.
    CoverExists,
    /// The archive disappeared before it could be read.
    MissingArchive,
    /// Neither the package document nor a title search produced an ISBN.
    Unresolved,
    /// An ISBN was found but no provider had a usable cover.
    NoCover { isbn: String },
    Saved {
        isbn: String,
        provider: String,
        path: PathBuf,
    },
    /// The cover was downloaded but could not be written.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub archive: PathBuf,
    #[serde(flatten)]
    pub outcome: ArchiveOutcome,
}

/// Everything that happened during one run, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub archives: Vec<ArchiveReport>,
}

impl RunSummary {
    pub fn record(&mut self, archive: PathBuf, outcome: ArchiveOutcome) {
        self.archives.push(ArchiveReport { archive, outcome });
    }

    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, ArchiveOutcome::Saved { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ArchiveOutcome::CoverExists))
    }

    /// Archives that ended without a cover for any reason other than an existing one.
    pub fn missing(&self) -> usize {
        self.archives.len() - self.saved() - self.skipped()
    }

    fn count(&self, pred: impl Fn(&ArchiveOutcome) -> bool) -> usize {
        self.archives.iter().filter(|r| pred(&r.outcome)).count()
    }
}

enum Resolution {
    Isbn(String),
    Unresolved,
    MissingArchive,
}

pub struct CoverPipeline {
    hints: Box<dyn PathHints>,
    resolvers: Vec<Box<dyn IsbnResolver>>,
    covers: CoverChain,
}

impl CoverPipeline {
    pub fn new(
        hints: Box<dyn PathHints>,
        resolvers: Vec<Box<dyn IsbnResolver>>,
        covers: CoverChain,
    ) -> Self {
        Self {
            hints,
            resolvers,
            covers,
        }
    }

    /// Directory-convention hints, Google Books title search, and the
    /// standard isbn.de → Open Library → Google Books cover chain.
    pub fn standard(client: &HttpClient, endpoints: &Endpoints, api_key: Option<String>) -> Self {
        Self::new(
            Box::new(SegmentConvention::default()),
            vec![Box::new(GoogleBooksResolver::new(
                client.clone(),
                endpoints.google_books.clone(),
                api_key,
            ))],
            CoverChain::standard(client, endpoints),
        )
    }

    /// The standard pipeline with the API key resolved from `config` and an
    /// optional explicit override.
    pub fn from_config(
        config: &AppConfig,
        api_key: Option<&str>,
        endpoints: &Endpoints,
    ) -> Result<Self, CoverError> {
        let client = HttpClient::new()?;
        Ok(Self::standard(&client, endpoints, config.api_key(api_key)))
    }

    /// Process every archive below `root`, one at a time.
    pub fn run(&self, root: &Path, progress: Option<&dyn ProgressHandler>) -> RunSummary {
        let archives = find_archives(root);
        let total = archives.len() as u64;
        tracing::info!("Found {} archive(s) under {}", total, root.display());
        tracing::debug!("Cover providers: {}", self.covers.provider_names().join(", "));

        let mut summary = RunSummary::default();
        for (i, archive) in archives.into_iter().enumerate() {
            let reporter = ArchiveProgress::new(progress, &archive, i as u64 + 1, Some(total));
            let outcome = self.process(&archive, reporter);
            summary.record(archive, outcome);
        }
        summary
    }

    /// Run the full pipeline for a single archive.
    pub fn process_archive(
        &self,
        archive: &Path,
        progress: Option<&dyn ProgressHandler>,
    ) -> ArchiveOutcome {
        self.process(archive, ArchiveProgress::new(progress, archive, 0, None))
    }

    fn process(&self, archive: &Path, progress: ArchiveProgress<'_>) -> ArchiveOutcome {
        let _span = tracing::info_span!("archive", path = %archive.display()).entered();
        progress.emit(Stage::Started);
        let outcome = self.process_inner(archive, progress);
        progress.emit(Stage::Finished(outcome.clone()));
        outcome
    }

    fn process_inner(&self, archive: &Path, progress: ArchiveProgress<'_>) -> ArchiveOutcome {
        let target = cover_path(archive);
        if target.exists() {
            tracing::info!("Cover already exists, skipping download");
            return ArchiveOutcome::CoverExists;
        }

        let isbn = match self.resolve_isbn(archive, progress) {
            Resolution::Isbn(isbn) => isbn,
            Resolution::Unresolved => return ArchiveOutcome::Unresolved,
            Resolution::MissingArchive => return ArchiveOutcome::MissingArchive,
        };

        progress.emit(Stage::FetchingCover(isbn.clone()));
        tracing::info!("Getting cover for ISBN {}", isbn);
        let Some(cover) = self.covers.fetch(&isbn) else {
            tracing::info!("No cover found");
            return ArchiveOutcome::NoCover { isbn };
        };

        match save_cover(&target, &cover.bytes) {
            Ok(()) => {
                tracing::info!("Cover saved to {}", target.display());
                ArchiveOutcome::Saved {
                    isbn,
                    provider: cover.provider,
                    path: target,
                }
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::info!("Cover appeared during download, leaving it in place");
                ArchiveOutcome::CoverExists
            }
            Err(e) => {
                tracing::warn!("Could not write {}: {}", target.display(), e);
                ArchiveOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn resolve_isbn(&self, archive: &Path, progress: ArchiveProgress<'_>) -> Resolution {
        progress.emit(Stage::Extracting);
        let metadata = match extract_metadata(archive) {
            Ok(metadata) => metadata,
            Err(ExtractError::ArchiveNotFound(path)) => {
                tracing::warn!("File not found: {}", path);
                return Resolution::MissingArchive;
            }
            Err(e) => {
                tracing::warn!("No usable package metadata: {}", e);
                return Resolution::Unresolved;
            }
        };

        match metadata.into_outcome() {
            ExtractOutcome::Isbn(isbn) => {
                tracing::info!("Found ISBN {}", isbn);
                Resolution::Isbn(isbn)
            }
            ExtractOutcome::Title(title) => {
                tracing::info!("No ISBN found, trying title: {}", title);
                progress.emit(Stage::SearchingTitle(title.clone()));
                self.search_by_title(archive, title)
            }
            ExtractOutcome::NotFound => {
                tracing::info!("No ISBN or title in package metadata");
                Resolution::Unresolved
            }
        }
    }

    fn search_by_title(&self, archive: &Path, title: String) -> Resolution {
        let dir = archive.parent().unwrap_or(Path::new(""));
        let hints = self.hints.hints(dir);
        let query = TitleQuery {
            title,
            author: hints.author,
            year: hints.year,
        };

        for resolver in &self.resolvers {
            match resolver.attempt(&query) {
                Ok(Some(isbn)) => {
                    tracing::info!("Found ISBN {} via {}", isbn, resolver.name());
                    return Resolution::Isbn(isbn);
                }
                Ok(None) => tracing::info!("No ISBN from {} for title", resolver.name()),
                Err(e) => tracing::warn!("Title search via {} failed: {}", resolver.name(), e),
            }
        }
        Resolution::Unresolved
    }
}

/// Write `bytes` to `path` only if nothing exists there yet. A partially
/// written file is removed.
pub fn save_cover(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}
