//! Property vocabularies for `epub:type` and `epub:prefix`.
//!
//! A document's prefix declaration is parsed once into a [`VocabMap`],
//! which is then used to validate every property list in the document.

mod prefix;
mod property;
mod structure;
mod types;

pub use prefix::parse_prefix_declaration;
pub use property::{parse_property_list, Property};
pub use structure::{OVERLAY_VOCABS, STRUCTURE_VOCAB};
pub use types::{EnumVocab, PropertyStatus, Vocab, VocabConfig, VocabMap};
