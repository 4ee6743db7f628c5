//! Diagnostic messages and the report sink they are written to.
//!
//! Message identifiers follow the EPUBCheck naming scheme so results can be
//! compared with other EPUB tooling. Localized message text is not produced
//! here; [`MessageId::summary`] gives a short English description for CLI
//! output only.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

use crate::types::Location;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The publication cannot be read reliably.
    Fatal,
    /// A conformance violation.
    Error,
    /// Likely a problem, but not a violation.
    Warning,
}

impl Severity {
    /// Get the uppercase label used in text output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

/// Identifier of a diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageId {
    /// XML version other than 1.0.
    #[serde(rename = "HTM-001")]
    Htm001,
    /// Audio reference to a non-core media type.
    #[serde(rename = "MED-005")]
    Med005,
    /// Text reference without a fragment identifier.
    #[serde(rename = "MED-014")]
    Med014,
    /// Text reference with an empty fragment identifier.
    #[serde(rename = "MED-015")]
    Med015,
    /// Malformed prefix declaration.
    #[serde(rename = "OPF-004")]
    Opf004,
    /// Prefix is not a valid NCName.
    #[serde(rename = "OPF-004c")]
    Opf004c,
    /// Prefix declared more than once.
    #[serde(rename = "OPF-005")]
    Opf005,
    /// Prefix mapped to an invalid URI.
    #[serde(rename = "OPF-006")]
    Opf006,
    /// Reserved prefix redeclared.
    #[serde(rename = "OPF-007")]
    Opf007,
    /// The `_` prefix is declared.
    #[serde(rename = "OPF-007a")]
    Opf007a,
    /// Default vocabulary mapped to a prefix.
    #[serde(rename = "OPF-007b")]
    Opf007b,
    /// Malformed property value.
    #[serde(rename = "OPF-026")]
    Opf026,
    /// Undefined property.
    #[serde(rename = "OPF-027")]
    Opf027,
    /// Undeclared prefix.
    #[serde(rename = "OPF-028")]
    Opf028,
    /// Deprecated property.
    #[serde(rename = "OPF-086")]
    Opf086,
    /// Referenced resource is missing from the package.
    #[serde(rename = "RSC-007")]
    Rsc007,
    /// Fragment identifier is not defined in the target.
    #[serde(rename = "RSC-012")]
    Rsc012,
    /// Document could not be parsed.
    #[serde(rename = "RSC-016")]
    Rsc016,
}

impl MessageId {
    /// Get the EPUBCheck-style code, e.g. `MED-014`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            MessageId::Htm001 => "HTM-001",
            MessageId::Med005 => "MED-005",
            MessageId::Med014 => "MED-014",
            MessageId::Med015 => "MED-015",
            MessageId::Opf004 => "OPF-004",
            MessageId::Opf004c => "OPF-004c",
            MessageId::Opf005 => "OPF-005",
            MessageId::Opf006 => "OPF-006",
            MessageId::Opf007 => "OPF-007",
            MessageId::Opf007a => "OPF-007a",
            MessageId::Opf007b => "OPF-007b",
            MessageId::Opf026 => "OPF-026",
            MessageId::Opf027 => "OPF-027",
            MessageId::Opf028 => "OPF-028",
            MessageId::Opf086 => "OPF-086",
            MessageId::Rsc007 => "RSC-007",
            MessageId::Rsc012 => "RSC-012",
            MessageId::Rsc016 => "RSC-016",
        }
    }

    /// Get the default severity of this message kind.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            MessageId::Rsc016 => Severity::Fatal,
            MessageId::Opf007 | MessageId::Opf007b | MessageId::Opf086 => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short English description, used by the CLI.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            MessageId::Htm001 => "Unsupported XML version",
            MessageId::Med005 => "Media overlay audio file must be a core audio type",
            MessageId::Med014 => "Media overlay text reference must include a fragment identifier",
            MessageId::Med015 => "Media overlay text reference has an empty fragment identifier",
            MessageId::Opf004 => "Invalid prefix declaration",
            MessageId::Opf004c => "Invalid prefix name",
            MessageId::Opf005 => "Prefix is declared more than once",
            MessageId::Opf006 => "Prefix is mapped to an invalid URI",
            MessageId::Opf007 => "Re-declaration of reserved prefix",
            MessageId::Opf007a => "The '_' prefix is reserved",
            MessageId::Opf007b => "Default vocabulary should not be mapped to a prefix",
            MessageId::Opf026 => "Malformed property value",
            MessageId::Opf027 => "Undefined property",
            MessageId::Opf028 => "Undeclared prefix",
            MessageId::Opf086 => "Deprecated property",
            MessageId::Rsc007 => "Referenced resource could not be found",
            MessageId::Rsc012 => "Fragment identifier is not defined",
            MessageId::Rsc016 => "Fatal error while parsing document",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// What kind of problem was found.
    pub id: MessageId,
    /// Severity of the problem.
    pub severity: Severity,
    /// Where it was found.
    pub location: Location,
    /// Contextual arguments (offending values, prefixes, media types).
    pub args: Vec<String>,
}

impl Message {
    /// Create a message with the default severity of its kind.
    #[must_use]
    pub fn new(id: MessageId, location: Location, args: &[&str]) -> Self {
        Self {
            id,
            severity: id.severity(),
            location,
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): {}: {}",
            self.severity.as_str(),
            self.id,
            self.location,
            self.id.summary()
        )?;
        if !self.args.is_empty() {
            write!(f, " ({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Sink for diagnostics.
///
/// Implementations must accept messages from several threads at once, and
/// reporting never fails.
pub trait Report: Send + Sync {
    /// Report a message at a location with contextual arguments.
    fn message(&self, id: MessageId, location: &Location, args: &[&str]);
}

/// Report that keeps every message in memory.
///
/// Messages are neither deduplicated nor reordered.
#[derive(Debug, Default)]
pub struct CollectingReport {
    messages: Mutex<Vec<Message>>,
}

impl CollectingReport {
    /// Create a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all messages reported so far.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    /// Take ownership of the collected messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count messages of a given kind.
    #[must_use]
    pub fn count(&self, id: MessageId) -> usize {
        self.lock().iter().filter(|m| m.id == id).count()
    }

    /// Count messages at or above error severity.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|m| m.severity <= Severity::Error)
            .count()
    }

    /// Check whether nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        // A panic while holding the lock cannot leave a Vec half-pushed.
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Report for CollectingReport {
    fn message(&self, id: MessageId, location: &Location, args: &[&str]) {
        tracing::debug!(
            id = %id,
            location = %location,
            args = ?args,
            "Reported message"
        );
        self.lock().push(Message::new(id, location.clone(), args));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_display_with_args() {
        let msg = Message::new(
            MessageId::Med005,
            Location::new("chapter1.smil", 7, 3),
            &["audio/ch1.ogg", "audio/ogg"],
        );
        assert_eq!(
            msg.to_string(),
            "ERROR(MED-005): chapter1.smil:7:3: Media overlay audio file must be a core audio type (audio/ch1.ogg, audio/ogg)"
        );
    }

    #[test]
    fn test_message_display_without_args() {
        let msg = Message::new(MessageId::Med014, Location::new("a.smil", 1, 1), &[]);
        assert!(msg.to_string().ends_with("fragment identifier"));
    }

    #[test]
    fn test_severity_defaults() {
        assert_eq!(MessageId::Rsc016.severity(), Severity::Fatal);
        assert_eq!(MessageId::Opf027.severity(), Severity::Error);
        assert_eq!(MessageId::Opf086.severity(), Severity::Warning);
        assert_eq!(MessageId::Opf007.severity(), Severity::Warning);
    }

    #[test]
    fn test_collecting_report_keeps_duplicates() {
        let report = CollectingReport::new();
        let loc = Location::new("a.smil", 2, 4);
        report.message(MessageId::Med014, &loc, &[]);
        report.message(MessageId::Med014, &loc, &[]);

        assert_eq!(report.count(MessageId::Med014), 2);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.messages().len(), 2);
    }

    #[test]
    fn test_collecting_report_warnings_are_not_errors() {
        let report = CollectingReport::new();
        report.message(MessageId::Opf086, &Location::new("a.smil", 1, 1), &["annoref"]);
        assert_eq!(report.error_count(), 0);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_collecting_report_shared_across_threads() {
        let report = CollectingReport::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let report = &report;
                scope.spawn(move || {
                    let loc = Location::new(format!("doc{i}.smil"), 1, 1);
                    report.message(MessageId::Med015, &loc, &[]);
                });
            }
        });
        assert_eq!(report.count(MessageId::Med015), 4);
    }

    #[test]
    fn test_message_serializes_code() {
        let msg = Message::new(MessageId::Opf004c, Location::new("a.smil", 1, 2), &["1bad"]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], "OPF-004c");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["args"][0], "1bad");
    }
}
