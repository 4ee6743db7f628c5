//! Core data types shared by the checker: locations and references.

use std::fmt;

use serde::Serialize;

/// Position of a diagnostic inside a package resource.
///
/// Line and column are 1-based, matching what editors display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// Package-relative path of the resource.
    pub path: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Location {
    /// Create a location at a line and column.
    #[must_use]
    pub fn new(path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// Kind of a cross-document reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Link to a location in a content document (`text@src`, `epub:textref`).
    Hyperlink,
    /// Link to an audio clip (`audio@src`).
    Audio,
}

impl ReferenceKind {
    /// Get the lowercase name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Hyperlink => "hyperlink",
            ReferenceKind::Audio => "audio",
        }
    }
}

/// A reference from a media overlay to another package resource.
///
/// Handed to the ledger as soon as it is found; the overlay handler keeps
/// no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Where the reference was found.
    pub source: Location,
    /// Resolved, package-relative target (with fragment if one was given).
    pub target: String,
    /// What kind of resource the reference points to.
    pub kind: ReferenceKind,
}

impl Reference {
    /// Create a new reference.
    #[must_use]
    pub fn new(source: Location, target: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            source,
            target: target.into(),
            kind,
        }
    }
}
