//! Fixture builders shared by unit tests.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Wrap `metadata` in a minimal EPUB2 package document.
pub fn opf_with_metadata(metadata: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    {metadata}
  </metadata>
  <manifest/>
  <spine/>
</package>"#
    )
}

/// Build an in-memory EPUB holding a single package document at `opf_path`.
pub fn epub_bytes(opf_path: &str, opf: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file(opf_path, deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Write an EPUB with the given `<metadata>` children to `dir/name`, creating `dir`.
pub fn write_epub(dir: &Path, name: &str, metadata: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, epub_bytes("OEBPS/content.opf", &opf_with_metadata(metadata))).unwrap();
    path
}

/// A single stored `content.opf` entry whose local and central headers claim
/// `declared_size` uncompressed bytes, whatever the real content length is.
pub fn epub_with_declared_size(opf: &str, declared_size: u32) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.start_file("content.opf", stored).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();
    let mut bytes = zip.finish().unwrap().into_inner();

    let patch = |bytes: &mut Vec<u8>, signature: &[u8; 4], size_offset: usize| {
        let start = bytes
            .windows(4)
            .position(|w| w == signature)
            .expect("header signature");
        bytes[start + size_offset..start + size_offset + 4]
            .copy_from_slice(&declared_size.to_le_bytes());
    };
    patch(&mut bytes, b"PK\x03\x04", 22);
    patch(&mut bytes, b"PK\x01\x02", 24);
    bytes
}
