//! Media overlay (SMIL) document checks.
//!
//! An [`OverlayHandler`] is driven by an [`XmlParser`](crate::xml::XmlParser)
//! over one overlay document. It validates prefix declarations, property
//! lists and references, and registers references with the cross-reference
//! ledger from its [`ValidationContext`].

mod handler;
mod types;

pub use handler::OverlayHandler;
pub use types::{OverlayElement, ValidationContext};
