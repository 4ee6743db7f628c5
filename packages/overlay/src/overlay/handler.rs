//! The media overlay document handler.
//!
//! [`OverlayHandler`] receives element-start events for one SMIL document
//! and decides, per element, which checks to run:
//!
//! | Element | Checks |
//! |---|---|
//! | `smil` (document element) | resolve `epub:prefix` |
//! | `body`, `seq`, `par` | `epub:textref` as hyperlink, `epub:type` as property list |
//! | `text` | `src` as hyperlink |
//! | `audio` | `src` as audio |
//!
//! All other elements and events are ignored.

use super::types::{OverlayElement, ValidationContext};
use crate::config::{OPS_NAMESPACE, SUPPORTED_XML_VERSION};
use crate::package::is_blessed_audio_type;
use crate::path::{fragment, resolve_relative_reference};
use crate::report::MessageId;
use crate::types::{Location, Reference, ReferenceKind};
use crate::vocab::{parse_prefix_declaration, parse_property_list, VocabMap, OVERLAY_VOCABS};
use crate::xml::{XmlElement, XmlHandler, XmlParser};
use crate::xref::ReferenceLedger;

/// Checks a single media overlay document.
///
/// A handler is created per document and must not be reused for another
/// one: it keeps the document's prefix mapping and whether the XML
/// version was already checked.
#[derive(Debug)]
pub struct OverlayHandler<'a> {
    context: &'a ValidationContext<'a>,
    vocabs: VocabMap,
    checked_unsupported_xml_version: bool,
}

impl<'a> OverlayHandler<'a> {
    /// Create a handler for the document described by `context`.
    #[must_use]
    pub fn new(context: &'a ValidationContext<'a>) -> Self {
        Self {
            context,
            vocabs: OVERLAY_VOCABS.reserved.clone(),
            checked_unsupported_xml_version: false,
        }
    }

    /// The prefix mapping currently in effect.
    #[must_use]
    pub fn vocabs(&self) -> &VocabMap {
        &self.vocabs
    }

    fn check_xml_version(&self, version: Option<&str>, location: &Location) {
        if let Some(version) = version {
            if version != SUPPORTED_XML_VERSION {
                self.context
                    .report
                    .message(MessageId::Htm001, location, &[version]);
            }
        }
    }

    fn process_global_attrs(&self, element: &XmlElement<'_, '_>, location: &Location) {
        self.process_ref(
            element.attribute_ns(OPS_NAMESPACE, "textref"),
            ReferenceKind::Hyperlink,
            location,
        );
        parse_property_list(
            element.attribute_ns(OPS_NAMESPACE, "type"),
            &self.vocabs,
            self.context.report,
            location,
        );
    }

    /// Validate a reference and hand it to the ledger.
    ///
    /// Registration does not depend on the outcome of validation.
    fn process_ref(&self, reference: Option<&str>, kind: ReferenceKind, location: &Location) {
        let Some(reference) = reference else {
            return;
        };
        let Some(xref) = self.context.xref else {
            return;
        };

        let target = resolve_relative_reference(&self.context.path, reference);
        self.validate_ref(xref, &target, kind, location);
        xref.register_reference(Reference::new(location.clone(), target, kind));
    }

    fn validate_ref(
        &self,
        xref: &dyn ReferenceLedger,
        target: &str,
        kind: ReferenceKind,
        location: &Location,
    ) {
        let report = self.context.report;
        match kind {
            ReferenceKind::Audio => {
                if let Some(mime_type) = xref.mime_type(target) {
                    if !is_blessed_audio_type(&mime_type) {
                        report.message(MessageId::Med005, location, &[target, &mime_type]);
                    }
                }
            }
            ReferenceKind::Hyperlink => match fragment(target) {
                None => report.message(MessageId::Med014, location, &[target]),
                Some(fragment) if fragment.trim().is_empty() => {
                    report.message(MessageId::Med015, location, &[target]);
                }
                Some(_) => {}
            },
        }
    }
}

impl XmlHandler for OverlayHandler<'_> {
    fn start_element(&mut self, parser: &XmlParser<'_>, element: &XmlElement<'_, '_>) {
        let location = parser.location(element);

        if !self.checked_unsupported_xml_version {
            self.checked_unsupported_xml_version = true;
            self.check_xml_version(parser.xml_version(), &location);
        }

        match OverlayElement::from_name(element.name()) {
            OverlayElement::Smil => {
                // Only the document element declares prefixes.
                if element.node().parent().is_some_and(|p| p.is_root()) {
                    self.vocabs = parse_prefix_declaration(
                        element.attribute_ns(OPS_NAMESPACE, "prefix"),
                        &OVERLAY_VOCABS,
                        self.context.report,
                        &location,
                    );
                }
            }
            kind if kind.is_container() => {
                self.process_global_attrs(element, &location);
            }
            OverlayElement::Text => {
                self.process_ref(element.attribute("src"), ReferenceKind::Hyperlink, &location);
            }
            OverlayElement::Audio => {
                // No epub:textref or epub:type checks on audio.
                self.process_ref(element.attribute("src"), ReferenceKind::Audio, &location);
            }
            _ => {}
        }
    }
}
