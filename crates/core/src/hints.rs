//! Author and year hints derived from where an archive lives on disk.
//!
//! Collections are expected to follow a `<root>/<Author>/<Title (Year)>/book.epub`
//! layout. The convention is not validated; when a path does not follow it
//! the hints are simply wrong or missing, and the title search degrades
//! accordingly.

use std::path::{Path, MAIN_SEPARATOR};

use once_cell::sync::Lazy;
use regex::Regex;

static RE_PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Search hints inferred from an archive's containing directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveHints {
    pub author: Option<String>,
    pub year: Option<String>,
}

/// Strategy for turning a containing directory into search hints.
pub trait PathHints: Send + Sync {
    fn hints(&self, archive_dir: &Path) -> ArchiveHints;
}

/// Positional convention: the author is a fixed segment of the directory
/// path, the year is the first parenthesized group anywhere in it.
///
/// Segments are counted on the raw path string, so for an absolute path the
/// empty string before the leading separator is segment 0. With the default
/// index of 2, `/books/Dostoevsky/Crime and Punishment (1866)` yields the
/// author `Dostoevsky`.
#[derive(Debug, Clone)]
pub struct SegmentConvention {
    pub author_segment: usize,
}

impl SegmentConvention {
    pub const DEFAULT_AUTHOR_SEGMENT: usize = 2;

    pub fn new(author_segment: usize) -> Self {
        Self { author_segment }
    }
}

impl Default for SegmentConvention {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AUTHOR_SEGMENT)
    }
}

impl PathHints for SegmentConvention {
    fn hints(&self, archive_dir: &Path) -> ArchiveHints {
        let dir = archive_dir.to_string_lossy();

        let author = dir
            .split(MAIN_SEPARATOR)
            .nth(self.author_segment)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let year = RE_PARENTHESIZED
            .captures(&dir)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());

        ArchiveHints { author, year }
    }
}

/// Ignores the path entirely. For collections with no directory convention.
#[derive(Debug, Clone, Default)]
pub struct NoHints;

impl PathHints for NoHints {
    fn hints(&self, _archive_dir: &Path) -> ArchiveHints {
        ArchiveHints::default()
    }
}
