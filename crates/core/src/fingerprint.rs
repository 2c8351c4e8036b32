//! Content fingerprints for recognizing placeholder ("no cover") images.
//!
//! Providers answer 200 with a generic filler image when they have no cover,
//! so the bytes themselves are the only signal. Fingerprints are lowercase
//! hex MD5 digests.

/// Filler image served by buch.isbn.de.
pub const ISBN_DE_PLACEHOLDER: &str = "f81b2d84d8a69ba9e8bf1f50c806faab";

/// Filler image served by covers.openlibrary.org.
pub const OPENLIBRARY_PLACEHOLDER: &str = "0d23d0b62908b75e89014ac3f864484e";

pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

pub fn is_placeholder(bytes: &[u8], placeholder: &str) -> bool {
    fingerprint(bytes) == placeholder
}
