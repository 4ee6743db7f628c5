//! Configuration constants for the overlay checker.
//!
//! Namespace URIs, vocabulary URIs and resource limits used throughout the
//! crate. The vocabulary tables built from these live in [`crate::vocab`].

/// EPUB Operations Structure namespace (`epub:` prefix).
///
/// Carries the `epub:prefix`, `epub:type` and `epub:textref` attributes.
pub const OPS_NAMESPACE: &str = "http://www.idpf.org/2007/ops";

/// URI of the EPUB Structural Semantics Vocabulary.
///
/// This is the default vocabulary for unprefixed `epub:type` values.
pub const STRUCTURE_VOCAB_URI: &str = "http://www.idpf.org/epub/vocab/structure/#";

/// The only XML version media overlays may declare.
pub const SUPPORTED_XML_VERSION: &str = "1.0";

/// Audio media types that a media overlay may reference without a fallback.
pub const BLESSED_AUDIO_TYPES: &[&str] = &["audio/mpeg", "audio/mp4"];

/// Media type of EPUB content documents.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Media type of media overlay documents.
pub const SMIL_MEDIA_TYPE: &str = "application/smil+xml";

/// Maximum document size in bytes (10 MB).
///
/// Overlays for a long audiobook chapter stay well below 1 MB; anything
/// beyond this limit is rejected before parsing.
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Base URL used to resolve package-relative references.
///
/// Only the path component of resolved URLs is ever used.
pub const PACKAGE_BASE_URL: &str = "epub-package://root/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reasonable() {
        assert!(MAX_DOCUMENT_SIZE >= 1024 * 1024, "Should allow at least 1MB");
        assert!(
            MAX_DOCUMENT_SIZE <= 100 * 1024 * 1024,
            "Should not allow 100MB+"
        );
        assert!(PACKAGE_BASE_URL.ends_with('/'));
        assert!(!BLESSED_AUDIO_TYPES.is_empty());
    }

    #[test]
    fn test_base_url_is_valid() {
        let base = url::Url::parse(PACKAGE_BASE_URL).unwrap();
        assert_eq!(base.path(), "/");
    }
}
