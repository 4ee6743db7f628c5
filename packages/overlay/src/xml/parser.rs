//! Event-driven XML parsing.
//!
//! [`XmlParser`] parses a document once and then replays it to an
//! [`XmlHandler`] as a stream of callbacks in document order, the way a
//! SAX parser would. Handlers only see one node at a time together with
//! its position, so they cannot depend on what comes later in the file.

use roxmltree::{Document, Node, ParsingOptions};

use super::utils::{declared_xml_version, get_attribute, get_attribute_ns, get_tag_name};
use crate::config::MAX_DOCUMENT_SIZE;
use crate::error::{OverlayError, Result};
use crate::types::Location;

/// An element as seen by a handler, with its position in the source.
#[derive(Debug, Clone, Copy)]
pub struct XmlElement<'a, 'input> {
    node: Node<'a, 'input>,
    line: u32,
    column: u32,
}

impl<'a, 'input> XmlElement<'a, 'input> {
    /// Local name of the element.
    #[must_use]
    pub fn name(&self) -> &'a str {
        get_tag_name(self.node)
    }

    /// Value of an attribute in no namespace.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        get_attribute(self.node, name)
    }

    /// Value of a namespace-qualified attribute.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&'a str> {
        get_attribute_ns(self.node, namespace, name)
    }

    /// 1-based line of the element's start tag.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the element's start tag.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Underlying DOM node.
    #[must_use]
    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }
}

/// Callbacks invoked while an [`XmlParser`] replays a document.
///
/// Only `start_element` is required; the other events default to no-ops.
pub trait XmlHandler {
    /// An element start tag.
    fn start_element(&mut self, parser: &XmlParser<'_>, element: &XmlElement<'_, '_>);

    /// An element end tag.
    fn end_element(&mut self, _parser: &XmlParser<'_>, _element: &XmlElement<'_, '_>) {}

    /// Character data that is not whitespace-only.
    fn characters(&mut self, _parser: &XmlParser<'_>, _text: &str) {}

    /// Whitespace-only character data.
    fn ignorable_whitespace(&mut self, _parser: &XmlParser<'_>, _text: &str) {}

    /// A processing instruction.
    fn processing_instruction(&mut self, _parser: &XmlParser<'_>, _target: &str, _data: Option<&str>) {}
}

/// A parsed document that can drive [`XmlHandler`]s.
pub struct XmlParser<'input> {
    path: String,
    document: Document<'input>,
    xml_version: Option<&'input str>,
}

impl<'input> XmlParser<'input> {
    /// Parse a document.
    ///
    /// # Arguments
    /// * `path` - Package-relative path of the document, used in locations
    /// * `source` - Document text
    ///
    /// # Errors
    /// Returns `DocumentTooLarge` above [`MAX_DOCUMENT_SIZE`] and `XmlParse`
    /// if the text is not well-formed XML.
    pub fn parse(path: impl Into<String>, source: &'input str) -> Result<Self> {
        let path = path.into();
        if source.len() > MAX_DOCUMENT_SIZE {
            return Err(OverlayError::DocumentTooLarge {
                path,
                size: source.len(),
                max: MAX_DOCUMENT_SIZE,
            });
        }

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(source, options)?;
        tracing::trace!(path = %path, "Parsed XML document");

        Ok(Self {
            path,
            document,
            xml_version: declared_xml_version(source),
        })
    }

    /// Version from the XML declaration, if one is present.
    #[must_use]
    pub fn xml_version(&self) -> Option<&str> {
        self.xml_version
    }

    /// The parsed document tree.
    #[must_use]
    pub fn document(&self) -> &Document<'input> {
        &self.document
    }

    /// Location of an element in this document.
    #[must_use]
    pub fn location(&self, element: &XmlElement<'_, '_>) -> Location {
        Location::new(self.path.as_str(), element.line, element.column)
    }

    /// Replay the document to a handler in document order.
    pub fn run<H: XmlHandler + ?Sized>(&self, handler: &mut H) {
        self.visit_children(self.document.root(), handler);
    }

    fn visit_children<'a, H: XmlHandler + ?Sized>(
        &'a self,
        node: Node<'a, 'input>,
        handler: &mut H,
    ) {
        for child in node.children() {
            if child.is_element() {
                let element = self.element(child);
                handler.start_element(self, &element);
                self.visit_children(child, handler);
                handler.end_element(self, &element);
            } else if child.is_text() {
                let text = child.text().unwrap_or_default();
                if text.trim().is_empty() {
                    handler.ignorable_whitespace(self, text);
                } else {
                    handler.characters(self, text);
                }
            } else if let Some(pi) = child.pi() {
                handler.processing_instruction(self, pi.target, pi.value);
            }
        }
    }

    fn element<'a>(&'a self, node: Node<'a, 'input>) -> XmlElement<'a, 'input> {
        let pos = self.document.text_pos_at(node.range().start);
        XmlElement {
            node,
            line: pos.row,
            column: pos.col,
        }
    }
}
