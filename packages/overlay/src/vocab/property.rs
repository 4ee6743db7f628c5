//! Validation of property lists such as `epub:type`.

use super::types::{PropertyStatus, VocabMap};
use crate::report::{MessageId, Report};
use crate::types::Location;

/// A property that resolved against a mapped vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Prefix as written, empty for the default vocabulary.
    pub prefix: String,
    /// Local property name.
    pub name: String,
    /// URI of the vocabulary the prefix maps to.
    pub vocab_uri: String,
    /// Whether the vocabulary marks the property deprecated.
    pub deprecated: bool,
}

/// Validate a whitespace-separated property list.
///
/// Each token is `name` (default vocabulary) or `prefix:name`. Tokens are
/// checked independently:
/// - empty prefix or empty name: OPF-026
/// - prefix not in `vocabs`: OPF-028
/// - name not in the vocabulary: OPF-027
/// - name deprecated in the vocabulary: OPF-086
///
/// # Arguments
/// * `value` - Attribute value, or `None` when the attribute is absent
/// * `vocabs` - Prefix mapping in effect for the document
/// * `report` - Diagnostic sink
/// * `location` - Location of the element carrying the list
///
/// # Returns
/// The properties that resolved, including deprecated ones.
pub fn parse_property_list(
    value: Option<&str>,
    vocabs: &VocabMap,
    report: &dyn Report,
    location: &Location,
) -> Vec<Property> {
    let Some(value) = value else {
        return Vec::new();
    };

    let mut properties = Vec::new();
    for token in value.split_ascii_whitespace() {
        let (prefix, name) = token.split_once(':').unwrap_or(("", token));
        if name.is_empty() || (prefix.is_empty() && token.contains(':')) {
            report.message(MessageId::Opf026, location, &[token]);
            continue;
        }

        let Some(vocab) = vocabs.get(prefix) else {
            report.message(MessageId::Opf028, location, &[prefix]);
            continue;
        };

        let deprecated = match vocab.lookup(name) {
            PropertyStatus::Known => false,
            PropertyStatus::Deprecated => {
                report.message(MessageId::Opf086, location, &[token]);
                true
            }
            PropertyStatus::Unknown => {
                report.message(MessageId::Opf027, location, &[token]);
                continue;
            }
        };

        properties.push(Property {
            prefix: prefix.to_string(),
            name: name.to_string(),
            vocab_uri: vocab.uri().to_string(),
            deprecated,
        });
    }

    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STRUCTURE_VOCAB_URI;
    use crate::report::CollectingReport;
    use crate::vocab::{Vocab, OVERLAY_VOCABS};
    use pretty_assertions::assert_eq;

    fn check(value: &str, vocabs: &VocabMap) -> (Vec<Property>, Vec<MessageId>) {
        let report = CollectingReport::new();
        let location = Location::new("ch1.smil", 5, 9);
        let properties = parse_property_list(Some(value), vocabs, &report, &location);
        let ids = report.messages().into_iter().map(|m| m.id).collect();
        (properties, ids)
    }

    #[test]
    fn test_known_property() {
        let (properties, ids) = check("page-list", &OVERLAY_VOCABS.reserved);
        assert!(ids.is_empty());
        assert_eq!(
            properties,
            vec![Property {
                prefix: String::new(),
                name: "page-list".to_string(),
                vocab_uri: STRUCTURE_VOCAB_URI.to_string(),
                deprecated: false,
            }]
        );
    }

    #[test]
    fn test_unknown_property() {
        let (properties, ids) = check("bogus-token", &OVERLAY_VOCABS.reserved);
        assert_eq!(ids, vec![MessageId::Opf027]);
        assert!(properties.is_empty());
    }

    #[test]
    fn test_deprecated_property() {
        let (properties, ids) = check("sidebar", &OVERLAY_VOCABS.reserved);
        assert_eq!(ids, vec![MessageId::Opf086]);
        assert_eq!(properties.len(), 1);
        assert!(properties[0].deprecated);
    }

    #[test]
    fn test_undeclared_prefix() {
        let (_, ids) = check("my:thing", &OVERLAY_VOCABS.reserved);
        assert_eq!(ids, vec![MessageId::Opf028]);
    }

    #[test]
    fn test_malformed_tokens() {
        let (_, ids) = check(":chapter my:", &OVERLAY_VOCABS.reserved);
        assert_eq!(ids, vec![MessageId::Opf026, MessageId::Opf026]);
    }

    #[test]
    fn test_declared_prefix_accepts_any_name() {
        let mut vocabs = OVERLAY_VOCABS.reserved.clone();
        vocabs.insert("my", Vocab::unchecked("http://example.org/my#"));

        let (properties, ids) = check("my:anything chapter", &vocabs);
        assert!(ids.is_empty());
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].vocab_uri, "http://example.org/my#");
    }

    #[test]
    fn test_tokens_are_checked_independently() {
        let (properties, ids) = check("chapter bogus x:y toc", &OVERLAY_VOCABS.reserved);
        assert_eq!(ids, vec![MessageId::Opf027, MessageId::Opf028]);
        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["chapter", "toc"]);
    }

    #[test]
    fn test_absent_value() {
        let report = CollectingReport::new();
        let location = Location::new("ch1.smil", 1, 1);
        let properties =
            parse_property_list(None, &OVERLAY_VOCABS.reserved, &report, &location);
        assert!(properties.is_empty());
        assert!(report.is_empty());
    }
}
