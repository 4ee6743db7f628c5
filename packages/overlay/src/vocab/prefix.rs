//! Parsing of `prefix` attribute declarations.
//!
//! A declaration is a whitespace-separated list of `prefix: URI` pairs,
//! e.g. `prefix="my: http://example.org/my# other: http://example.org/o#"`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::types::{Vocab, VocabConfig, VocabMap};
use crate::report::{MessageId, Report};
use crate::types::Location;

/// NCName production, minus the XML name characters nobody uses.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NCNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}._\-]*$").expect("valid regex"));

/// Build the vocabulary map for a document from its prefix declaration.
///
/// The result always starts from `config.reserved`. Each well-formed,
/// permitted mapping in `value` is added on top of it. Problems are reported
/// at `location` and the offending mapping is skipped, so a bad declaration
/// never prevents the document from being checked.
///
/// # Arguments
/// * `value` - Attribute value, or `None` when the attribute is absent
/// * `config` - Reserved, known and default vocabularies for the document type
/// * `report` - Diagnostic sink
/// * `location` - Location of the declaring element
///
/// # Returns
/// The effective prefix-to-vocabulary mapping.
///
/// # Examples
/// ```
/// use epubcheck_overlay::report::CollectingReport;
/// use epubcheck_overlay::types::Location;
/// use epubcheck_overlay::vocab::{parse_prefix_declaration, OVERLAY_VOCABS};
///
/// let report = CollectingReport::new();
/// let location = Location::new("ch1.smil", 1, 1);
/// let vocabs = parse_prefix_declaration(
///     Some("my: http://example.org/my#"),
///     &OVERLAY_VOCABS,
///     &report,
///     &location,
/// );
/// assert!(vocabs.contains_prefix("my"));
/// assert!(report.is_empty());
/// ```
pub fn parse_prefix_declaration(
    value: Option<&str>,
    config: &VocabConfig,
    report: &dyn Report,
    location: &Location,
) -> VocabMap {
    let mut vocabs = config.reserved.clone();
    let Some(value) = value else {
        return vocabs;
    };

    for (prefix, uri) in parse_mappings(value, report, location) {
        if prefix == "_" {
            report.message(MessageId::Opf007a, location, &[]);
            continue;
        }

        if let Some(reserved) = config.reserved.get(prefix) {
            if reserved.uri() != uri {
                report.message(MessageId::Opf007, location, &[prefix]);
            }
            continue;
        }

        if config.defaults.contains(uri) {
            report.message(MessageId::Opf007b, location, &[prefix, uri]);
        }

        let vocab = config
            .known
            .get(uri)
            .or_else(|| config.reserved.find_by_uri(uri))
            .cloned()
            .unwrap_or_else(|| Vocab::unchecked(uri));
        tracing::trace!(prefix, uri, "Mapped vocabulary prefix");
        vocabs.insert(prefix, vocab);
    }

    vocabs
}

/// Split a declaration into syntactically valid `(prefix, uri)` pairs.
///
/// Duplicates keep the first mapping.
fn parse_mappings<'v>(
    value: &'v str,
    report: &dyn Report,
    location: &Location,
) -> Vec<(&'v str, &'v str)> {
    let mut mappings = Vec::new();
    let mut seen = HashSet::new();
    let mut tokens = value.split_ascii_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let Some(prefix) = token.strip_suffix(':') else {
            report.message(MessageId::Opf004, location, &[token]);
            // The URI of the malformed pair.
            tokens.next_if(|next| !next.ends_with(':'));
            continue;
        };
        let Some(uri) = tokens.next() else {
            report.message(MessageId::Opf004, location, &[token]);
            break;
        };

        if !NCNAME_PATTERN.is_match(prefix) {
            report.message(MessageId::Opf004c, location, &[prefix]);
            continue;
        }
        if Url::parse(uri).is_err() {
            report.message(MessageId::Opf006, location, &[prefix, uri]);
            continue;
        }
        if !seen.insert(prefix) {
            report.message(MessageId::Opf005, location, &[prefix]);
            continue;
        }

        mappings.push((prefix, uri));
    }

    mappings
}
