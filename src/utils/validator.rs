//! # Identifier Validation
//!
//! User identifiers become directory names under the image root, so only a
//! conservative character set is accepted.

use std::sync::LazyLock;

use regex::Regex;

/// A single path segment: 1 to 64 ASCII letters, digits, `-` or `_`.
pub static PATH_SEGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("path segment regex is valid")
});

/// Returns whether `value` can be used verbatim as a directory name.
///
/// # Examples
///
/// - `u1` ✓ Valid
/// - `3f2a9c1e-7d4b-4e8a-9f00-0c1d2e3f4a5b` ✓ Valid
/// - `../etc` ✗ Invalid
/// - empty string ✗ Invalid
pub fn is_safe_path_segment(value: &str) -> bool {
    PATH_SEGMENT_REGEX.is_match(value)
}

/// Returns the extension of the uploaded file's name, with a leading dot,
/// when it is 1 to 10 ASCII alphanumerics. Any directory part of the client
/// supplied name is ignored.
pub fn original_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;

    let valid = !stem.is_empty()
        && (1..=10).contains(&ext.len())
        && ext.bytes().all(|b| b.is_ascii_alphanumeric());
    valid.then(|| format!(".{ext}"))
}
