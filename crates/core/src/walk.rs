//! Recursive discovery of EPUB archives and their sidecar cover paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Archives are recognized by this file name suffix (case-sensitive).
pub const ARCHIVE_EXTENSION: &str = ".epub";

/// Name of the cover image written next to each archive.
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// All archives below `root`, in a stable file-name order. Unreadable
/// directories are logged and skipped.
pub fn find_archives(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(ARCHIVE_EXTENSION))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// The cover file shared by every archive in the same directory.
pub fn cover_path(archive: &Path) -> PathBuf {
    archive
        .parent()
        .unwrap_or(Path::new("."))
        .join(COVER_FILE_NAME)
}
