//! Validation sessions: checking overlay documents and resolving references.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::XHTML_MEDIA_TYPE;
use crate::error::{OverlayError, Result};
use crate::overlay::{OverlayHandler, ValidationContext};
use crate::package::PackageManifest;
use crate::report::{CollectingReport, Message, MessageId, Report};
use crate::types::Location;
use crate::xml::XmlParser;
use crate::xref::XRefChecker;

/// Check one media overlay document.
///
/// # Arguments
/// * `source` - Document text
/// * `context` - Path, report and optional ledger for the document
///
/// # Errors
/// Returns `XmlParse` if the document is not well-formed and
/// `DocumentTooLarge` above the size limit. Content problems are reported
/// to the context's report, not returned.
///
/// # Examples
/// ```
/// use epubcheck_overlay::checker::check_overlay;
/// use epubcheck_overlay::overlay::ValidationContext;
/// use epubcheck_overlay::report::{CollectingReport, MessageId};
///
/// let report = CollectingReport::new();
/// let context = ValidationContext::new("ch1.smil", &report);
/// let xml = r#"<smil xmlns:epub="http://www.idpf.org/2007/ops"><body epub:type="bogus"/></smil>"#;
/// check_overlay(xml, &context).unwrap();
/// assert_eq!(report.count(MessageId::Opf027), 1);
/// ```
pub fn check_overlay(source: &str, context: &ValidationContext<'_>) -> Result<()> {
    let parser = XmlParser::parse(context.path.as_str(), source)?;
    let mut handler = OverlayHandler::new(context);
    parser.run(&mut handler);
    Ok(())
}

/// Checks a set of overlay documents from one package.
///
/// Documents are read relative to `root` and may be checked in parallel.
/// All of them report into one shared [`CollectingReport`], and, when a
/// manifest was loaded, register references with one shared
/// [`XRefChecker`] that is resolved by [`finish`](Self::finish).
#[derive(Debug)]
pub struct ValidationSession {
    root: PathBuf,
    report: CollectingReport,
    xref: Option<XRefChecker>,
}

impl ValidationSession {
    /// Create a session without cross-reference checking.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report: CollectingReport::new(),
            xref: None,
        }
    }

    /// Enable cross-reference checking against a package manifest.
    ///
    /// Every resource is declared to the ledger. XHTML content documents
    /// are read from the package root and their ids indexed; documents
    /// that cannot be read or parsed are skipped with a warning, so
    /// fragments pointing into them are not verified.
    #[must_use]
    pub fn with_manifest(mut self, manifest: &PackageManifest) -> Self {
        let xref = XRefChecker::new();
        for item in &manifest.resources {
            xref.register_resource(&item.href, &item.media_type);
        }

        let indexed = manifest
            .resources_of_type(|t| t == XHTML_MEDIA_TYPE)
            .collect::<Vec<_>>()
            .par_iter()
            .filter(|item| {
                let path = self.root.join(&item.href);
                let result = read_document(&path)
                    .and_then(|xml| xref.index_content_document(&item.href, &xml));
                if let Err(e) = &result {
                    tracing::warn!(href = %item.href, error = %e, "Skipping content document");
                }
                result.is_ok()
            })
            .count();
        tracing::debug!(
            resources = manifest.resources.len(),
            indexed,
            "Enabled cross-reference checking"
        );

        self.xref = Some(xref);
        self
    }

    /// The report all documents write to.
    #[must_use]
    pub fn report(&self) -> &CollectingReport {
        &self.report
    }

    /// The cross-reference ledger, when enabled.
    #[must_use]
    pub fn xref(&self) -> Option<&XRefChecker> {
        self.xref.as_ref()
    }

    /// Check one document from its source text.
    ///
    /// A document that is not well-formed XML gets a fatal RSC-016 message
    /// instead of an error, so the remaining documents can still be checked.
    ///
    /// # Errors
    /// Returns `DocumentTooLarge` above the size limit.
    pub fn check_source(&self, path: &str, source: &str) -> Result<()> {
        let mut context = ValidationContext::new(path, &self.report);
        if let Some(xref) = &self.xref {
            context = context.with_xref(xref);
        }

        match check_overlay(source, &context) {
            Err(OverlayError::XmlParse(e)) => {
                tracing::warn!(path, error = %e, "Failed to parse media overlay");
                let pos = e.pos();
                let location = Location::new(path, pos.row, pos.col);
                self.report
                    .message(MessageId::Rsc016, &location, &[&e.to_string()]);
                Ok(())
            }
            result => result,
        }
    }

    /// Read and check one document.
    ///
    /// # Arguments
    /// * `path` - Package-relative path of the document
    ///
    /// # Errors
    /// Returns `ReadFile` if the document cannot be read, or any error from
    /// [`check_source`](Self::check_source).
    pub fn check_document(&self, path: &str) -> Result<()> {
        let source = read_document(&self.root.join(path))?;
        tracing::debug!(path, "Checking media overlay");
        self.check_source(path, &source)
    }

    /// Read and check documents in parallel.
    ///
    /// # Returns
    /// The errors of documents that could not be checked, in input order.
    pub fn check_documents(&self, paths: &[String]) -> Vec<OverlayError> {
        paths
            .par_iter()
            .filter_map(|path| self.check_document(path).err())
            .collect()
    }

    /// Resolve registered references and return every message.
    ///
    /// Messages are sorted by location; messages at the same location keep
    /// the order in which they were reported.
    #[must_use]
    pub fn finish(self) -> Vec<Message> {
        if let Some(xref) = &self.xref {
            xref.check_references(&self.report);
        }

        let mut messages = self.report.into_messages();
        messages.sort_by(|a, b| a.location.cmp(&b.location));
        messages
    }
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| OverlayError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
