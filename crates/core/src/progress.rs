//! Progress reporting trait and events for the per-archive pipeline.

use std::path::{Path, PathBuf};

use crate::pipeline::ArchiveOutcome;

/// Where an archive currently is in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Started,
    Extracting,
    /// No ISBN in the package document; searching by this title.
    SearchingTitle(String),
    /// Trying the cover providers for this ISBN.
    FetchingCover(String),
    Finished(ArchiveOutcome),
}

/// Event emitted while processing one archive.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub archive: PathBuf,
    /// 1-based position of the archive in the run; 0 when processed on its own.
    pub current: u64,
    pub total: Option<u64>,
    pub stage: Stage,
}

/// Trait for receiving progress updates. Implement this to drive a progress
/// bar or a console report.
pub trait ProgressHandler: Send {
    fn on_progress(&self, event: ProgressEvent);
}

/// Binds a handler to one archive so stages can be emitted without repeating
/// the position.
#[derive(Clone, Copy)]
pub(crate) struct ArchiveProgress<'a> {
    handler: Option<&'a dyn ProgressHandler>,
    archive: &'a Path,
    current: u64,
    total: Option<u64>,
}

impl<'a> ArchiveProgress<'a> {
    pub(crate) fn new(
        handler: Option<&'a dyn ProgressHandler>,
        archive: &'a Path,
        current: u64,
        total: Option<u64>,
    ) -> Self {
        Self {
            handler,
            archive,
            current,
            total,
        }
    }

    pub(crate) fn emit(&self, stage: Stage) {
        if let Some(h) = self.handler {
            h.on_progress(ProgressEvent {
                archive: self.archive.to_path_buf(),
                current: self.current,
                total: self.total,
                stage,
            });
        }
    }
}
