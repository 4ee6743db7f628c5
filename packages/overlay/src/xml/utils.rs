//! XML utility functions for navigating and extracting data from DOM trees.

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

/// The `xml:` namespace, for `xml:id`.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XML declaration version pattern, e.g. `<?xml version="1.1"?>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static XML_VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml\s+version\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});

/// Get the tag name without namespace prefix.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Local tag name (e.g., "par" for `<smil:par>`)
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use epubcheck_overlay::xml::get_tag_name;
///
/// let xml = r#"<smil><body/></smil>"#;
/// let doc = Document::parse(xml).unwrap();
/// let body = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(body), "body");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get an attribute value that is not in any namespace.
///
/// # Arguments
/// * `node` - Node to get attribute from
/// * `name` - Attribute name
///
/// # Returns
/// Attribute value, or `None` if not found
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Get a namespace-qualified attribute value.
///
/// # Arguments
/// * `node` - Node to get attribute from
/// * `namespace` - Namespace URI of the attribute
/// * `name` - Local attribute name
///
/// # Returns
/// Attribute value, or `None` if not found
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use epubcheck_overlay::xml::get_attribute_ns;
///
/// let xml = r#"<par xmlns:epub="http://www.idpf.org/2007/ops" epub:type="note"/>"#;
/// let doc = Document::parse(xml).unwrap();
/// let par = doc.root_element();
/// assert_eq!(get_attribute_ns(par, "http://www.idpf.org/2007/ops", "type"), Some("note"));
/// assert_eq!(get_attribute_ns(par, "http://example.org/", "type"), None);
/// ```
pub fn get_attribute_ns<'a>(node: Node<'a, '_>, namespace: &str, name: &str) -> Option<&'a str> {
    node.attribute((namespace, name))
}

/// Get the version declared in the XML declaration, if there is one.
///
/// # Arguments
/// * `source` - Raw document text
///
/// # Returns
/// The declared version string, or `None` without a declaration
///
/// # Examples
/// ```
/// use epubcheck_overlay::xml::declared_xml_version;
///
/// assert_eq!(declared_xml_version(r#"<?xml version="1.1"?><smil/>"#), Some("1.1"));
/// assert_eq!(declared_xml_version("<smil/>"), None);
/// ```
pub fn declared_xml_version(source: &str) -> Option<&str> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    XML_VERSION_PATTERN
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collect every `id` attribute value in a document.
///
/// Used to index content documents so that fragment identifiers pointing
/// into them can be verified.
pub fn collect_ids<'a>(doc: &'a roxmltree::Document<'_>) -> impl Iterator<Item = &'a str> {
    doc.descendants()
        .filter(|n| n.is_element())
        .filter_map(|n| n.attribute("id").or_else(|| n.attribute((XML_NAMESPACE, "id"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name() {
        let xml = r#"<smil><body/></smil>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "smil");
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<s:smil xmlns:s="http://www.w3.org/ns/SMIL"><s:body/></s:smil>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "smil");
    }

    #[test]
    fn test_get_attribute() {
        let xml = r#"<audio src="ch1.mp3"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(get_attribute(root, "src"), Some("ch1.mp3"));
        assert_eq!(get_attribute(root, "missing"), None);
    }

    #[test]
    fn test_get_attribute_ns_ignores_unqualified() {
        let xml = r#"<seq xmlns:epub="http://www.idpf.org/2007/ops" type="chapter"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(
            get_attribute_ns(root, "http://www.idpf.org/2007/ops", "type"),
            None
        );
    }

    #[test]
    fn test_declared_xml_version() {
        assert_eq!(
            declared_xml_version("<?xml version='1.0' encoding='UTF-8'?><smil/>"),
            Some("1.0")
        );
        assert_eq!(
            declared_xml_version("\u{feff}<?xml version=\"1.1\"?><smil/>"),
            Some("1.1")
        );
        assert_eq!(declared_xml_version("<smil/>"), None);
    }

    #[test]
    fn test_collect_ids() {
        let xml = r#"<html><body><p id="p1"/><span id="s1"/><div/></body></html>"#;
        let doc = Document::parse(xml).unwrap();
        let ids: Vec<_> = collect_ids(&doc).collect();
        assert_eq!(ids, vec!["p1", "s1"]);
    }
}
