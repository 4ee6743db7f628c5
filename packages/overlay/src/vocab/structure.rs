//! The EPUB Structural Semantics Vocabulary and the overlay vocabulary tables.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::types::{EnumVocab, Vocab, VocabConfig, VocabMap};
use crate::config::STRUCTURE_VOCAB_URI;

/// Properties of the structure vocabulary.
const STRUCTURE_PROPERTIES: &[&str] = &[
    "abstract",
    "acknowledgments",
    "afterword",
    "answer",
    "answers",
    "appendix",
    "assessment",
    "assessments",
    "backlink",
    "backmatter",
    "balloon",
    "biblioentry",
    "bibliography",
    "biblioref",
    "bodymatter",
    "bridgehead",
    "chapter",
    "colophon",
    "concluding-sentence",
    "conclusion",
    "contributors",
    "copyright-page",
    "cover",
    "covertitle",
    "credit",
    "credits",
    "dedication",
    "division",
    "endnote",
    "endnotes",
    "epigraph",
    "epilogue",
    "errata",
    "example",
    "explanation",
    "feedback",
    "figure",
    "fill-in-the-blank-problem",
    "footnote",
    "footnotes",
    "foreword",
    "frontmatter",
    "fulltitle",
    "general-problem",
    "glossary",
    "glossdef",
    "glossref",
    "glossterm",
    "halftitle",
    "halftitlepage",
    "imprimatur",
    "imprint",
    "index",
    "index-editor-note",
    "index-entry",
    "index-entry-list",
    "index-group",
    "index-headnotes",
    "index-legend",
    "index-locator",
    "index-locator-list",
    "index-locator-range",
    "index-term",
    "index-term-categories",
    "index-term-category",
    "index-xref-preferred",
    "index-xref-related",
    "introduction",
    "keyword",
    "keywords",
    "label",
    "landmarks",
    "learning-objective",
    "learning-objectives",
    "learning-outcome",
    "learning-outcomes",
    "learning-resource",
    "learning-resources",
    "learning-standard",
    "learning-standards",
    "list",
    "list-item",
    "loa",
    "loi",
    "lot",
    "lov",
    "match-problem",
    "multiple-choice-problem",
    "noteref",
    "notice",
    "ordinal",
    "other-credits",
    "page-list",
    "pagebreak",
    "panel",
    "panel-group",
    "part",
    "practice",
    "practices",
    "preamble",
    "preface",
    "prologue",
    "pullquote",
    "qna",
    "question",
    "referrer",
    "revision-history",
    "seriespage",
    "sound-area",
    "subtitle",
    "table",
    "table-cell",
    "table-row",
    "text-area",
    "tip",
    "title",
    "titlepage",
    "toc",
    "toc-brief",
    "topic-sentence",
    "true-false-problem",
    "volume",
];

/// Properties that are still recognized but deprecated.
const STRUCTURE_DEPRECATED: &[&str] = &[
    "annoref",
    "annotation",
    "help",
    "marginalia",
    "note",
    "rearnote",
    "rearnotes",
    "sidebar",
    "subchapter",
    "warning",
];

/// The structure vocabulary, the default vocabulary of `epub:type`.
pub static STRUCTURE_VOCAB: LazyLock<EnumVocab> = LazyLock::new(|| {
    EnumVocab::new(
        STRUCTURE_VOCAB_URI,
        STRUCTURE_PROPERTIES,
        STRUCTURE_DEPRECATED,
    )
});

/// Vocabulary configuration for media overlay documents.
///
/// Reserved: the empty prefix maps the structure vocabulary. No other
/// vocabularies are known, and the structure vocabulary is the only
/// default.
pub static OVERLAY_VOCABS: LazyLock<VocabConfig> = LazyLock::new(|| VocabConfig {
    reserved: VocabMap::from_iter([("", Vocab::Enum(LazyLock::force(&STRUCTURE_VOCAB)))]),
    known: HashMap::new(),
    defaults: HashSet::from([STRUCTURE_VOCAB_URI]),
});
