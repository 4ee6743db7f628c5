//! Package-level information: the resource manifest and audio media types.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::BLESSED_AUDIO_TYPES;
use crate::error::{OverlayError, Result};

/// One resource declared in the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Package-root relative path.
    pub href: String,
    /// Declared media type.
    #[serde(rename = "media-type")]
    pub media_type: String,
}

/// The resources of a package, loaded from a YAML manifest file.
///
/// ```yaml
/// resources:
///   - href: text/chapter1.xhtml
///     media-type: application/xhtml+xml
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Declared resources in manifest order.
    #[serde(default)]
    pub resources: Vec<ManifestItem>,
}

impl PackageManifest {
    /// Load a manifest from a YAML file.
    ///
    /// # Errors
    /// Returns `ReadFile` if the file cannot be read and `Manifest` if it
    /// is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| OverlayError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_yaml(&text)?;
        tracing::debug!(
            path = %path.display(),
            resources = manifest.resources.len(),
            "Loaded package manifest"
        );
        Ok(manifest)
    }

    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    /// Returns `Manifest` if the text is not a valid manifest.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Resources whose media type satisfies a predicate.
    pub fn resources_of_type<'a>(
        &'a self,
        predicate: impl Fn(&str) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ManifestItem> + 'a {
        self.resources
            .iter()
            .filter(move |item| predicate(&item.media_type))
    }
}

/// Check whether an audio media type is a core media type that reading
/// systems must support.
///
/// Parameters such as `; codecs=...` are ignored and the comparison is
/// case-insensitive.
///
/// # Examples
/// ```
/// use epubcheck_overlay::package::is_blessed_audio_type;
///
/// assert!(is_blessed_audio_type("audio/mpeg"));
/// assert!(is_blessed_audio_type("audio/MP4; codecs=mp4a.40.2"));
/// assert!(!is_blessed_audio_type("audio/ogg"));
/// ```
pub fn is_blessed_audio_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    BLESSED_AUDIO_TYPES
        .iter()
        .any(|blessed| blessed.eq_ignore_ascii_case(essence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const MANIFEST: &str = r#"
resources:
  - href: text/chapter1.xhtml
    media-type: application/xhtml+xml
  - href: audio/chapter1.mp3
    media-type: audio/mpeg
"#;

    #[test]
    fn test_from_yaml() {
        let manifest = PackageManifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(
            manifest.resources,
            vec![
                ManifestItem {
                    href: "text/chapter1.xhtml".to_string(),
                    media_type: "application/xhtml+xml".to_string(),
                },
                ManifestItem {
                    href: "audio/chapter1.mp3".to_string(),
                    media_type: "audio/mpeg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = PackageManifest::from_yaml("{}").unwrap();
        assert!(manifest.resources.is_empty());
    }

    #[test]
    fn test_invalid_manifest() {
        let result = PackageManifest::from_yaml("resources:\n  - href: only-href\n");
        assert!(matches!(result, Err(OverlayError::Manifest(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = PackageManifest::load(file.path()).unwrap();
        assert_eq!(manifest.resources.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = PackageManifest::load(Path::new("/nonexistent/manifest.yaml"));
        assert!(matches!(result, Err(OverlayError::ReadFile { .. })));
    }

    #[test]
    fn test_resources_of_type() {
        let manifest = PackageManifest::from_yaml(MANIFEST).unwrap();
        let audio: Vec<_> = manifest
            .resources_of_type(|t| t.starts_with("audio/"))
            .map(|item| item.href.as_str())
            .collect();
        assert_eq!(audio, vec!["audio/chapter1.mp3"]);
    }

    #[test]
    fn test_blessed_audio_types() {
        assert!(is_blessed_audio_type("audio/mpeg"));
        assert!(is_blessed_audio_type("audio/mp4"));
        assert!(!is_blessed_audio_type("audio/ogg"));
        assert!(!is_blessed_audio_type(""));
    }
}
