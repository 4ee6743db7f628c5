//! Types for property vocabularies and prefix mappings.

use std::collections::{HashMap, HashSet};

/// How a property name relates to a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStatus {
    /// The property is defined.
    Known,
    /// The property is defined but deprecated.
    Deprecated,
    /// The vocabulary does not define the property.
    Unknown,
}

/// A vocabulary with a closed, enumerated set of properties.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumVocab {
    uri: &'static str,
    properties: HashSet<&'static str>,
    deprecated: HashSet<&'static str>,
}

impl EnumVocab {
    /// Create a vocabulary from its current and deprecated property names.
    #[must_use]
    pub fn new(
        uri: &'static str,
        properties: &[&'static str],
        deprecated: &[&'static str],
    ) -> Self {
        Self {
            uri,
            properties: properties.iter().copied().collect(),
            deprecated: deprecated.iter().copied().collect(),
        }
    }

    /// Namespace URI of the vocabulary.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Look up a property by its local name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> PropertyStatus {
        if self.properties.contains(name) {
            PropertyStatus::Known
        } else if self.deprecated.contains(name) {
            PropertyStatus::Deprecated
        } else {
            PropertyStatus::Unknown
        }
    }
}

/// A property vocabulary.
///
/// `Enum` vocabularies are built once into static tables and shared by
/// reference. `Unchecked` vocabularies come from author prefix declarations
/// for URIs we know nothing about, so any property name is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vocab {
    /// Closed vocabulary with a known property set.
    Enum(&'static EnumVocab),
    /// Open vocabulary identified only by its URI.
    Unchecked { uri: String },
}

impl Vocab {
    /// Create an open vocabulary for a URI.
    #[must_use]
    pub fn unchecked(uri: impl Into<String>) -> Self {
        Vocab::Unchecked { uri: uri.into() }
    }

    /// Namespace URI of the vocabulary.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Vocab::Enum(vocab) => vocab.uri(),
            Vocab::Unchecked { uri } => uri,
        }
    }

    /// Look up a property by its local name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> PropertyStatus {
        match self {
            Vocab::Enum(vocab) => vocab.lookup(name),
            Vocab::Unchecked { .. } => PropertyStatus::Known,
        }
    }
}

/// Mapping from prefix to vocabulary for one document.
///
/// The empty prefix maps the default vocabulary used by unprefixed
/// property names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabMap {
    vocabs: HashMap<String, Vocab>,
}

impl VocabMap {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a prefix to a vocabulary, replacing any existing mapping.
    pub fn insert(&mut self, prefix: impl Into<String>, vocab: Vocab) {
        self.vocabs.insert(prefix.into(), vocab);
    }

    /// Get the vocabulary mapped to a prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&Vocab> {
        self.vocabs.get(prefix)
    }

    /// Check whether a prefix is mapped.
    #[must_use]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.vocabs.contains_key(prefix)
    }

    /// Find a vocabulary by URI.
    #[must_use]
    pub fn find_by_uri(&self, uri: &str) -> Option<&Vocab> {
        self.vocabs.values().find(|v| v.uri() == uri)
    }

    /// Number of mapped prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vocabs.len()
    }

    /// Check whether no prefix is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocabs.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, Vocab)> for VocabMap {
    fn from_iter<I: IntoIterator<Item = (P, Vocab)>>(iter: I) -> Self {
        Self {
            vocabs: iter.into_iter().map(|(p, v)| (p.into(), v)).collect(),
        }
    }
}

/// Static vocabulary configuration for one document type.
#[derive(Debug)]
pub struct VocabConfig {
    /// Prefixes that are always mapped and cannot be overridden.
    pub reserved: VocabMap,
    /// Recognized vocabularies by URI, used when an author maps them.
    pub known: HashMap<&'static str, Vocab>,
    /// URIs that are in effect without being declared.
    pub defaults: HashSet<&'static str>,
}
