//! ISBN normalization. Values are catalog strings, not validated numbers.

/// URI prefix some publishers put in front of the identifier value.
pub const URN_PREFIX: &str = "urn:isbn:";

/// Strip a leading `urn:isbn:` and surrounding whitespace. Checksums and
/// hyphenation are left untouched.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(URN_PREFIX)
        .unwrap_or(trimmed)
        .to_string()
}
