//! Package path utilities: resolving references and splitting fragments.
//!
//! Paths inside a package are `/`-separated and relative to the package
//! root (e.g. `OEBPS/text/chapter1.xhtml`). References found in a document
//! are resolved against that document's path.

use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::config::PACKAGE_BASE_URL;

#[allow(clippy::expect_used)] // Static URL that is guaranteed to be valid
static PACKAGE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(PACKAGE_BASE_URL).expect("valid package base URL"));

/// Check whether a reference points outside the package.
///
/// That is an absolute URL (has a scheme) or a network-path reference
/// (starts with `//`).
///
/// # Examples
/// ```
/// use epubcheck_overlay::path::is_remote;
///
/// assert!(is_remote("https://example.org/audio.mp3"));
/// assert!(is_remote("//example.org/audio.mp3"));
/// assert!(!is_remote("audio/chapter1.mp3"));
/// assert!(!is_remote("#sec1"));
/// ```
pub fn is_remote(reference: &str) -> bool {
    let reference = reference.trim();
    reference.starts_with("//") || Url::parse(reference).is_ok()
}

/// Split a reference into its path part and optional fragment.
///
/// The fragment is everything after the first `#`. `None` means the
/// reference has no `#` at all; `Some("")` means it ends with a bare `#`.
///
/// # Examples
/// ```
/// use epubcheck_overlay::path::split_fragment;
///
/// assert_eq!(split_fragment("ch1.xhtml#p1"), ("ch1.xhtml", Some("p1")));
/// assert_eq!(split_fragment("ch1.xhtml#"), ("ch1.xhtml", Some("")));
/// assert_eq!(split_fragment("ch1.xhtml"), ("ch1.xhtml", None));
/// ```
pub fn split_fragment(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (reference, None),
    }
}

/// Get the fragment identifier of a reference, if it has a `#`.
pub fn fragment(reference: &str) -> Option<&str> {
    split_fragment(reference).1
}

/// Strip the fragment from a reference.
pub fn without_fragment(reference: &str) -> &str {
    split_fragment(reference).0
}

/// Resolve a reference relative to the path of the document containing it.
///
/// Remote references are returned unchanged. For relative references the path
/// part is resolved with dot-segment removal, percent-decoded and NFC
/// normalized; `..` segments cannot climb above the package root. The
/// fragment, if any, is re-attached exactly as written.
///
/// # Arguments
/// * `base` - Package-relative path of the referencing document
/// * `reference` - Raw reference as found in the attribute
///
/// # Returns
/// Package-relative target path, with `#fragment` if one was present
///
/// # Examples
/// ```
/// use epubcheck_overlay::path::resolve_relative_reference;
///
/// assert_eq!(
///     resolve_relative_reference("OEBPS/mo/ch1.smil", "../text/ch1.xhtml#p1"),
///     "OEBPS/text/ch1.xhtml#p1"
/// );
/// assert_eq!(
///     resolve_relative_reference("OEBPS/mo/ch1.smil", "#par1"),
///     "OEBPS/mo/ch1.smil#par1"
/// );
/// ```
pub fn resolve_relative_reference(base: &str, reference: &str) -> String {
    if is_remote(reference) {
        return reference.to_string();
    }

    let (path_part, fragment) = split_fragment(reference);
    let mut resolved = resolve_path(base, path_part.trim())
        .unwrap_or_else(|| normalize_package_path(&join_naive(base, path_part.trim())));

    if let Some(fragment) = fragment {
        resolved.push('#');
        resolved.push_str(fragment);
    }
    resolved
}

/// Resolve a fragment-free path against a base document path.
fn resolve_path(base: &str, path: &str) -> Option<String> {
    let base_url = PACKAGE_BASE.join(base).ok()?;
    let target = base_url.join(path).ok()?;

    let mut resolved = normalize_package_path(&percent_decode(
        target.path().trim_start_matches('/'),
    ));
    if let Some(query) = target.query() {
        resolved.push('?');
        resolved.push_str(query);
    }
    Some(resolved)
}

/// Fallback used only when URL resolution fails: plain directory join.
fn join_naive(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    match base.rfind('/') {
        Some(pos) => format!("{}/{}", &base[..pos], path),
        None => path.to_string(),
    }
}

/// Normalize a package path to Unicode NFC.
///
/// File names in a package are compared after NFC normalization, so a
/// decomposed `é` in a reference still matches a precomposed file name.
pub fn normalize_package_path(path: &str) -> String {
    path.nfc().collect()
}

/// Decode `%XX` escapes segment by segment.
///
/// A segment whose escapes do not decode to UTF-8 is kept as written.
fn percent_decode(path: &str) -> String {
    path.split('/')
        .map(|segment| match urlencoding::decode(segment) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sibling() {
        assert_eq!(
            resolve_relative_reference("OEBPS/chapter1.smil", "chapter1.xhtml#sec1"),
            "OEBPS/chapter1.xhtml#sec1"
        );
    }

    #[test]
    fn test_resolve_at_package_root() {
        assert_eq!(
            resolve_relative_reference("chapter1.smil", "chapter1.xhtml"),
            "chapter1.xhtml"
        );
    }

    #[test]
    fn test_resolve_parent_directory() {
        assert_eq!(
            resolve_relative_reference("OEBPS/mo/chapter1.smil", "../audio/ch1.mp3"),
            "OEBPS/audio/ch1.mp3"
        );
    }

    #[test]
    fn test_resolve_dot_segments() {
        assert_eq!(
            resolve_relative_reference("OEBPS/mo/chapter1.smil", "./x/../ch1.xhtml#p"),
            "OEBPS/mo/ch1.xhtml#p"
        );
    }

    #[test]
    fn test_resolve_clamps_above_root() {
        assert_eq!(
            resolve_relative_reference("chapter1.smil", "../../chapter1.xhtml"),
            "chapter1.xhtml"
        );
    }

    #[test]
    fn test_resolve_keeps_empty_fragment() {
        assert_eq!(
            resolve_relative_reference("chapter1.smil", "chapter1.xhtml#"),
            "chapter1.xhtml#"
        );
    }

    #[test]
    fn test_resolve_keeps_fragment_verbatim() {
        assert_eq!(
            resolve_relative_reference("chapter1.smil", "chapter1.xhtml# "),
            "chapter1.xhtml# "
        );
    }

    #[test]
    fn test_resolve_fragment_only() {
        assert_eq!(
            resolve_relative_reference("OEBPS/chapter1.smil", "#par1"),
            "OEBPS/chapter1.smil#par1"
        );
    }

    #[test]
    fn test_resolve_empty_reference_is_document() {
        assert_eq!(
            resolve_relative_reference("OEBPS/chapter1.smil", ""),
            "OEBPS/chapter1.smil"
        );
    }

    #[test]
    fn test_resolve_percent_encoded() {
        assert_eq!(
            resolve_relative_reference("OEBPS/chapter1.smil", "my%20chapter.xhtml#p1"),
            "OEBPS/my chapter.xhtml#p1"
        );
    }

    #[test]
    fn test_resolve_space_in_path() {
        assert_eq!(
            resolve_relative_reference("OEBPS/chapter1.smil", "my chapter.xhtml"),
            "OEBPS/my chapter.xhtml"
        );
    }

    #[test]
    fn test_resolve_normalizes_to_nfc() {
        // "e" followed by a combining acute accent
        let decomposed = "caf\u{0065}\u{0301}.xhtml#p1";
        assert_eq!(
            resolve_relative_reference("chapter1.smil", decomposed),
            "caf\u{00e9}.xhtml#p1"
        );
    }

    #[test]
    fn test_resolve_remote_unchanged() {
        let remote = "https://example.org/audio/ch1.mp3";
        assert_eq!(resolve_relative_reference("chapter1.smil", remote), remote);
    }

    #[test]
    fn test_resolve_network_path_unchanged() {
        let reference = "//example.org/x.xhtml#p";
        assert!(is_remote(reference));
        assert_eq!(resolve_relative_reference("mo/a.smil", reference), reference);
    }

    #[test]
    fn test_resolve_keeps_escapes_that_are_not_utf8() {
        assert_eq!(
            resolve_relative_reference("mo/a.smil", "../audio/a%FF.mp3"),
            "audio/a%FF.mp3"
        );
        assert_eq!(
            resolve_relative_reference("mo/a.smil", "../audio/a%FF/b%20c.mp3"),
            "audio/a%FF/b c.mp3"
        );
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("a.xhtml#b#c"), ("a.xhtml", Some("b#c")));
        assert_eq!(split_fragment("#"), ("", Some("")));
    }

    #[test]
    fn test_fragment_and_without_fragment() {
        assert_eq!(fragment("a.xhtml#sec"), Some("sec"));
        assert_eq!(fragment("a.xhtml"), None);
        assert_eq!(without_fragment("a.xhtml#sec"), "a.xhtml");
    }

    #[test]
    fn test_percent_decode_malformed() {
        assert_eq!(percent_decode("a%2"), "a%2");
        assert_eq!(percent_decode("a%zz"), "a%zz");
        assert_eq!(percent_decode("a%41"), "aA");
        assert_eq!(percent_decode("%"), "%");
    }

    #[test]
    fn test_percent_decode_utf8() {
        assert_eq!(percent_decode("caf%C3%A9"), "caf\u{00e9}");
    }
}
