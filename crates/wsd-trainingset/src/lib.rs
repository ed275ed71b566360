//! Build word-sense-disambiguation training sets from raw text.
//!
//! Extraction walks tagged sentences and files a context window around
//! every common-noun occurrence of a lexicon noun into that noun's
//! unlabelled corpus. Bootstrapping then grows each sense's seed words from
//! the samples that only one sense explains, and labels the corpus with the
//! final sets.

pub mod bootstrap;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod frequency;
pub mod layout;
pub mod pipeline;
pub mod vocab;

pub use bootstrap::{
    Bootstrapper, Convergence, LabelCounts, PassOutcome, ScoreReport, Verdict, best_index,
    filter_duplicates, score,
};
pub use config::Settings;
pub use corpus::{Corpus, LoadMode, Sample};
pub use error::PipelineError;
pub use extract::{ExtractionReport, Extractor, WindowConfig, collect_window, window_bounds};
pub use frequency::{Coverage, WordFrequency, rank_words, top_words};
pub use layout::OutputLayout;
pub use pipeline::{
    LabelSummary, NounOutcome, NounReport, bootstrap_nouns, extract_corpus, select_focus,
};
pub use vocab::{LabelledSet, Vocabulary, build_vocabulary};
