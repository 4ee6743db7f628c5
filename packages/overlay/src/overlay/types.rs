//! Types for media overlay checking.

use std::fmt;

use crate::report::Report;
use crate::xref::ReferenceLedger;

/// Elements of a media overlay document that carry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayElement {
    /// `<smil>`, the document element.
    Smil,
    /// `<body>`.
    Body,
    /// `<seq>`, a sequence of time containers.
    Seq,
    /// `<par>`, a parallel text/audio pair.
    Par,
    /// `<text>`, pointing at a content document fragment.
    Text,
    /// `<audio>`, pointing at an audio clip.
    Audio,
    /// Anything else. No checks apply.
    Other,
}

impl OverlayElement {
    /// Classify an element by its local name.
    ///
    /// # Examples
    /// ```
    /// use epubcheck_overlay::overlay::OverlayElement;
    ///
    /// assert_eq!(OverlayElement::from_name("par"), OverlayElement::Par);
    /// assert_eq!(OverlayElement::from_name("head"), OverlayElement::Other);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "smil" => OverlayElement::Smil,
            "body" => OverlayElement::Body,
            "seq" => OverlayElement::Seq,
            "par" => OverlayElement::Par,
            "text" => OverlayElement::Text,
            "audio" => OverlayElement::Audio,
            _ => OverlayElement::Other,
        }
    }

    /// Check whether this is a time container (`body`, `seq` or `par`).
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            OverlayElement::Body | OverlayElement::Seq | OverlayElement::Par
        )
    }
}

/// Per-document settings shared with the overlay handler.
///
/// Owned by the validation session and borrowed by each handler. The
/// cross-reference ledger is optional: without it no reference is
/// registered or validated.
pub struct ValidationContext<'a> {
    /// Package-relative path of the document being checked.
    pub path: String,

    /// Sink for diagnostics.
    pub report: &'a dyn Report,

    /// Ledger for references, when cross-document checks are enabled.
    pub xref: Option<&'a dyn ReferenceLedger>,
}

impl<'a> ValidationContext<'a> {
    /// Create a context without cross-reference checking.
    #[must_use]
    pub fn new(path: impl Into<String>, report: &'a dyn Report) -> Self {
        Self {
            path: path.into(),
            report,
            xref: None,
        }
    }

    /// Enable cross-reference checking with a ledger.
    #[must_use]
    pub fn with_xref(mut self, xref: &'a dyn ReferenceLedger) -> Self {
        self.xref = Some(xref);
        self
    }

    /// Check whether references are registered in this run.
    #[must_use]
    pub fn xref_enabled(&self) -> bool {
        self.xref.is_some()
    }
}

impl fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("path", &self.path)
            .field("xref_enabled", &self.xref_enabled())
            .finish()
    }
}
