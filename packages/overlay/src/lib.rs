//! EPUB media overlay checker - Validate SMIL media overlay documents.
//!
//! This crate checks EPUB Media Overlay documents while they are parsed:
//! prefix declarations and `epub:type` property lists are validated against
//! their vocabularies, and every text and audio reference is checked and
//! registered with a cross-reference ledger that is resolved once all
//! documents have been seen.
//!
//! # Example
//!
//! ```
//! use epubcheck_overlay::{check_overlay, CollectingReport, MessageId, ValidationContext, XRefChecker};
//!
//! let report = CollectingReport::new();
//! let xref = XRefChecker::new();
//! let context = ValidationContext::new("mo/ch1.smil", &report).with_xref(&xref);
//!
//! let xml = r#"<smil xmlns="http://www.w3.org/ns/SMIL" version="3.0">
//!   <body><par><text src="../text/ch1.xhtml"/></par></body>
//! </smil>"#;
//! check_overlay(xml, &context).unwrap();
//!
//! assert_eq!(report.count(MessageId::Med014), 1);
//! assert_eq!(xref.references()[0].target, "text/ch1.xhtml");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants
//! - [`error`]: Error types and Result alias
//! - [`types`]: Locations and references
//! - [`report`]: Message kinds and the diagnostic sink
//! - [`path`]: Reference resolution within a package
//! - [`xml`]: XML utilities and the event-driven parser
//! - [`vocab`]: Property vocabularies, prefix declarations and property lists
//! - [`xref`]: Cross-reference ledger
//! - [`package`]: Resource manifest and core audio types
//! - [`overlay`]: The media overlay document handler
//! - [`checker`]: Validation sessions over many documents
//! - [`cli`]: Command-line interface

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod overlay;
pub mod package;
pub mod path;
pub mod report;
pub mod types;
pub mod vocab;
pub mod xml;
pub mod xref;

// Re-export main functions
pub use checker::{check_overlay, ValidationSession};

// Re-export commonly used items
pub use error::{OverlayError, Result};
pub use overlay::{OverlayElement, OverlayHandler, ValidationContext};
pub use package::PackageManifest;
pub use report::{CollectingReport, Message, MessageId, Report, Severity};
pub use types::{Location, Reference, ReferenceKind};
pub use xref::{ReferenceLedger, XRefChecker};
