//! Package document reader: ZIP → `.opf` entry → ISBN and title.
//!
//! Only two fields matter here, so the document is scanned with a small
//! event loop instead of being parsed into a full package model. Element and
//! attribute names are matched by their *qualified* form (`dc:identifier`,
//! `opf:scheme`), which is how the metadata sections of EPUB2 packages are
//! written in practice.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;

use crate::error::ExtractError;
use crate::isbn;

/// Extension identifying the package document inside the archive.
pub const PACKAGE_EXTENSION: &str = ".opf";

/// Largest package document that will be read (4 MB).
pub const MAX_PACKAGE_DOCUMENT_BYTES: u64 = 4 * 1024 * 1024;

/// The two values the cover pipeline reads from a package document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Normalized ISBN from the first `dc:identifier` with `opf:scheme="ISBN"`.
    pub isbn: Option<String>,
    /// Text of the first non-empty `dc:title`.
    pub title: Option<String>,
}

/// What the metadata stage hands to the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Isbn(String),
    /// No ISBN, but a title that can be searched for.
    Title(String),
    NotFound,
}

impl PackageMetadata {
    /// An ISBN always wins over the title.
    pub fn into_outcome(self) -> ExtractOutcome {
        match (self.isbn, self.title) {
            (Some(isbn), _) => ExtractOutcome::Isbn(isbn),
            (None, Some(title)) => ExtractOutcome::Title(title),
            (None, None) => ExtractOutcome::NotFound,
        }
    }
}

/// Open the archive at `path` and read its package metadata.
pub fn extract_metadata(path: &Path) -> Result<PackageMetadata, ExtractError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExtractError::ArchiveNotFound(path.display().to_string()),
        _ => ExtractError::Io(e),
    })?;
    read_package_metadata(BufReader::new(file))
}

/// Read package metadata from any seekable ZIP source.
pub fn read_package_metadata<R: Read + Seek>(input: R) -> Result<PackageMetadata, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(input).map_err(|e| ExtractError::InvalidArchive(e.to_string()))?;

    let entry = find_package_entry(&archive).ok_or(ExtractError::MissingPackageDocument)?;
    tracing::debug!("Package document: {}", entry);

    let content = read_entry_string(&mut archive, &entry)?;
    parse_package_document(&content)
        .map_err(|detail| ExtractError::MalformedPackageDocument { entry, detail })
}

fn find_package_entry<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Option<String> {
    archive
        .file_names()
        .find(|name| name.ends_with(PACKAGE_EXTENSION))
        .map(String::from)
}

fn read_entry_string<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractError> {
    let malformed = |detail: String| ExtractError::MalformedPackageDocument {
        entry: name.to_string(),
        detail,
    };
    let file = archive.by_name(name).map_err(|e| malformed(e.to_string()))?;
    check_entry_size(file.size())
        .map_err(|size| malformed(format!("Declared size {size} bytes exceeds limit")))?;

    // The header size is not trusted; the read itself is capped as well.
    let mut bytes = Vec::new();
    file.take(MAX_PACKAGE_DOCUMENT_BYTES + 1).read_to_end(&mut bytes)?;
    check_entry_size(bytes.len() as u64)
        .map_err(|size| malformed(format!("Content exceeds {size} bytes")))?;
    String::from_utf8(bytes).map_err(|e| malformed(format!("Invalid UTF-8: {e}")))
}

fn check_entry_size(size: u64) -> Result<(), u64> {
    if size > MAX_PACKAGE_DOCUMENT_BYTES {
        Err(size)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Isbn,
    Title,
}

impl Field {
    fn tag(self) -> &'static [u8] {
        match self {
            Field::Isbn => b"dc:identifier",
            Field::Title => b"dc:title",
        }
    }
}

/// Scan a package document for the ISBN identifier and the title.
pub fn parse_package_document(content: &str) -> Result<PackageMetadata, String> {
    let mut reader = XmlReader::from_str(content);
    let mut buf = Vec::new();

    let mut metadata = PackageMetadata::default();
    let mut capturing: Option<Field> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if capturing.is_none() => match e.name().as_ref() {
                b"dc:identifier" if metadata.isbn.is_none() && has_isbn_scheme(e) => {
                    capturing = Some(Field::Isbn);
                    current_text.clear();
                }
                b"dc:title" if metadata.title.is_none() => {
                    capturing = Some(Field::Title);
                    current_text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if capturing.is_some() {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    current_text.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if capturing.is_some() {
                    current_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(ref e)) => {
                if let Some(field) = capturing {
                    if e.name().as_ref() == field.tag() {
                        let text = current_text.trim();
                        if !text.is_empty() {
                            match field {
                                Field::Isbn => metadata.isbn = Some(isbn::normalize(text)),
                                Field::Title => metadata.title = Some(text.to_string()),
                            }
                        }
                        capturing = None;
                        current_text.clear();
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(metadata)
}

fn has_isbn_scheme(e: &BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"opf:scheme" && attr.value.as_ref() == b"ISBN")
}
