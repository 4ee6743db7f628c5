//! Cross-reference ledger.
//!
//! Handlers register every reference they encounter while a document is
//! checked. Once all documents have been processed, [`XRefChecker::check_references`]
//! verifies that each reference resolves to a known resource and, for
//! hyperlinks, to an element id inside it.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::path::{is_remote, normalize_package_path, split_fragment, without_fragment};
use crate::report::{MessageId, Report};
use crate::types::{Reference, ReferenceKind};
use crate::xml::collect_ids;

/// The ledger interface used by document handlers.
///
/// Implementations are shared between documents checked in parallel, so
/// both methods take `&self`.
pub trait ReferenceLedger: Send + Sync {
    /// Record a reference for deferred resolution.
    fn register_reference(&self, reference: Reference);

    /// Declared media type of the resource a target points to.
    ///
    /// The fragment of `target`, if any, is ignored. Returns `None` when
    /// the resource is not (yet) known.
    fn mime_type(&self, target: &str) -> Option<String>;
}

#[derive(Debug, Default)]
struct Resources {
    /// Media type per package path.
    media_types: HashMap<String, String>,
    /// Element ids per indexed content document.
    ids: HashMap<String, HashSet<String>>,
}

impl Resources {
    fn contains(&self, path: &str) -> bool {
        self.media_types.contains_key(path) || self.ids.contains_key(path)
    }
}

/// In-memory [`ReferenceLedger`] for one validation session.
#[derive(Debug, Default)]
pub struct XRefChecker {
    resources: RwLock<Resources>,
    references: Mutex<Vec<Reference>>,
}

impl XRefChecker {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a package resource and its media type.
    pub fn register_resource(&self, href: &str, media_type: &str) {
        let path = normalize_package_path(without_fragment(href));
        tracing::trace!(path = %path, media_type, "Registered resource");
        self.write_resources()
            .media_types
            .insert(path, media_type.to_string());
    }

    /// Index the element ids of a content document.
    ///
    /// # Errors
    /// Returns `XmlParse` if the document is not well-formed.
    pub fn index_content_document(&self, href: &str, xml: &str) -> crate::error::Result<()> {
        let doc = roxmltree::Document::parse(xml)?;
        let ids: HashSet<String> = collect_ids(&doc).map(str::to_string).collect();
        let path = normalize_package_path(without_fragment(href));
        tracing::debug!(path = %path, ids = ids.len(), "Indexed content document");
        self.write_resources().ids.insert(path, ids);
        Ok(())
    }

    /// Snapshot of all references registered so far, in registration order.
    #[must_use]
    pub fn references(&self) -> Vec<Reference> {
        self.lock_references().clone()
    }

    /// Resolve every registered reference.
    ///
    /// Remote references are skipped. A target resource that is neither
    /// declared nor indexed yields RSC-007. A hyperlink fragment that does
    /// not match an id in an indexed document yields RSC-012. Audio
    /// fragments are media fragments, not ids, and are not checked.
    pub fn check_references(&self, report: &dyn Report) {
        let resources = self.read_resources();
        let references = self.lock_references();

        for reference in references.iter() {
            if is_remote(&reference.target) {
                continue;
            }

            let (path, fragment) = split_fragment(&reference.target);
            if !resources.contains(path) {
                report.message(MessageId::Rsc007, &reference.source, &[path]);
                continue;
            }

            if reference.kind != ReferenceKind::Hyperlink {
                continue;
            }
            let Some(fragment) = fragment.map(str::trim).filter(|f| !f.is_empty()) else {
                continue;
            };
            if let Some(ids) = resources.ids.get(path) {
                if !ids.contains(fragment) {
                    report.message(MessageId::Rsc012, &reference.source, &[reference.target.as_str()]);
                }
            }
        }

        tracing::debug!(references = references.len(), "Checked cross-references");
    }

    fn read_resources(&self) -> RwLockReadGuard<'_, Resources> {
        self.resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_resources(&self) -> RwLockWriteGuard<'_, Resources> {
        self.resources
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_references(&self) -> MutexGuard<'_, Vec<Reference>> {
        self.references
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReferenceLedger for XRefChecker {
    fn register_reference(&self, reference: Reference) {
        tracing::trace!(
            source = %reference.source,
            target = %reference.target,
            kind = reference.kind.as_str(),
            "Registered reference"
        );
        self.lock_references().push(reference);
    }

    fn mime_type(&self, target: &str) -> Option<String> {
        let path = without_fragment(target);
        self.read_resources().media_types.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReport;
    use crate::types::Location;
    use pretty_assertions::assert_eq;

    fn hyperlink(target: &str) -> Reference {
        Reference::new(
            Location::new("ch1.smil", 4, 7),
            target,
            ReferenceKind::Hyperlink,
        )
    }

    fn audio(target: &str) -> Reference {
        Reference::new(Location::new("ch1.smil", 5, 7), target, ReferenceKind::Audio)
    }

    fn ledger() -> XRefChecker {
        let xref = XRefChecker::new();
        xref.register_resource("text/ch1.xhtml", "application/xhtml+xml");
        xref.register_resource("audio/ch1.mp3", "audio/mpeg");
        xref.index_content_document(
            "text/ch1.xhtml",
            r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><p id="p1"/><p id="p2"/></body></html>"#,
        )
        .unwrap();
        xref
    }

    fn ids(report: &CollectingReport) -> Vec<MessageId> {
        report.messages().into_iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_mime_type_ignores_fragment() {
        let xref = ledger();
        assert_eq!(xref.mime_type("audio/ch1.mp3"), Some("audio/mpeg".to_string()));
        assert_eq!(
            xref.mime_type("audio/ch1.mp3#t=10"),
            Some("audio/mpeg".to_string())
        );
        assert_eq!(xref.mime_type("audio/missing.mp3"), None);
    }

    #[test]
    fn test_references_keep_registration_order() {
        let xref = XRefChecker::new();
        xref.register_reference(hyperlink("a.xhtml#x"));
        xref.register_reference(audio("a.mp3"));
        let targets: Vec<_> = xref.references().into_iter().map(|r| r.target).collect();
        assert_eq!(targets, vec!["a.xhtml#x", "a.mp3"]);
    }

    #[test]
    fn test_valid_references() {
        let xref = ledger();
        xref.register_reference(hyperlink("text/ch1.xhtml#p1"));
        xref.register_reference(audio("audio/ch1.mp3#t=0,5"));
        xref.register_reference(hyperlink("https://example.org/page#x"));
        xref.register_reference(hyperlink("//example.org/page#x"));

        let report = CollectingReport::new();
        xref.check_references(&report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_missing_resource() {
        let xref = ledger();
        xref.register_reference(hyperlink("text/missing.xhtml#p1"));
        xref.register_reference(audio("audio/missing.mp3"));

        let report = CollectingReport::new();
        xref.check_references(&report);
        assert_eq!(ids(&report), vec![MessageId::Rsc007, MessageId::Rsc007]);
        assert_eq!(report.messages()[0].args, vec!["text/missing.xhtml"]);
    }

    #[test]
    fn test_missing_fragment_target() {
        let xref = ledger();
        xref.register_reference(hyperlink("text/ch1.xhtml#nope"));

        let report = CollectingReport::new();
        xref.check_references(&report);
        assert_eq!(ids(&report), vec![MessageId::Rsc012]);
        assert_eq!(report.messages()[0].location, Location::new("ch1.smil", 4, 7));
    }

    #[test]
    fn test_fragment_not_checked_in_unindexed_document() {
        let xref = XRefChecker::new();
        xref.register_resource("text/ch2.xhtml", "application/xhtml+xml");
        xref.register_reference(hyperlink("text/ch2.xhtml#anything"));

        let report = CollectingReport::new();
        xref.check_references(&report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_malformed_fragments_are_left_to_the_handler() {
        let xref = ledger();
        xref.register_reference(hyperlink("text/ch1.xhtml"));
        xref.register_reference(hyperlink("text/ch1.xhtml#"));

        let report = CollectingReport::new();
        xref.check_references(&report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_index_rejects_malformed_xml() {
        let xref = XRefChecker::new();
        assert!(xref.index_content_document("bad.xhtml", "<html><body></html>").is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        let xref = ledger();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let xref = &xref;
                scope.spawn(move || {
                    xref.register_reference(hyperlink(&format!("text/ch1.xhtml#p{i}")));
                });
            }
        });
        assert_eq!(xref.references().len(), 4);
    }
}
