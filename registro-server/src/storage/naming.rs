//! Storage file names for uploaded avatars

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters not allowed in the stem of a stored file name
static UNSAFE_STEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("invalid stem regex"));

/// Stem used when nothing of the original name survives
const FALLBACK_STEM: &str = "avatar";

/// Derive the on-disk name for an upload.
///
/// Directory components of the client name are dropped, every character of
/// the stem outside `[a-zA-Z0-9_-]` becomes `_`, the extension is
/// lower-cased, and the whole thing is prefixed with `<token>_`.
///
/// # Example
/// ```
/// use registro_server::storage::storage_name;
///
/// assert_eq!(storage_name("foo photo.png", 1700000000000), "1700000000000_foo_photo.png");
/// assert_eq!(storage_name("C:\\pics\\Me.JPG", 5), "5_Me.jpg");
/// ```
pub fn storage_name(original: &str, token: i64) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let (stem, ext) = split_extension(base);

    let stem = UNSAFE_STEM_RE.replace_all(stem, "_");
    let stem = if stem.is_empty() { FALLBACK_STEM } else { &*stem };

    let ext: String = ext
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if ext.is_empty() {
        format!("{}_{}", token, stem)
    } else {
        format!("{}_{}.{}", token, stem, ext)
    }
}

/// Split `name` at its last dot. A leading dot (hidden file) is part of the
/// stem, not an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}
