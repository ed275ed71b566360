//! Text front end for WSD training-set preparation.
//!
//! Three pieces, usable independently:
//! 1. [`tokenize`] scans raw text into typed [`Token`]s using Unicode-aware
//!    character classes. Whitespace runs collapse to one `" "` token;
//!    characters outside every class are dropped.
//! 2. [`is_undesirable`] flags function words and symbol noise that carry no
//!    sense evidence in a context window.
//! 3. The [`Tagger`] trait turns a document into tagged [`Sentence`]s. The
//!    crate ships [`SlashTagger`] for pre-tagged corpora and [`RuleTagger`],
//!    a rule-based baseline that needs no model files.
//!
//! # Example
//! ```rust
//! use wsd_text::{RuleTagger, Tagger, tokenize};
//! use wsd_types::TokenKind;
//!
//! let tokens = tokenize("Fish swim  upstream.");
//! assert_eq!(tokens[1].kind(), TokenKind::Space);
//! assert_eq!(tokens.last().unwrap().kind(), TokenKind::FullStop);
//!
//! # fn main() -> anyhow::Result<()> {
//! let sentences = RuleTagger.tag("The bank was steep. We fished there.")?;
//! assert_eq!(sentences.len(), 2);
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wsd-text --example tag -- <file>`.

mod tagger;
mod tokenizer;
mod undesirables;

pub use tagger::{RuleTagger, SlashTagger, Tagger};
pub use tokenizer::{CharClass, classify, surface_kind, tokenize};
pub use undesirables::is_undesirable;

pub use wsd_types::{PosTag, Sentence, TaggedToken, Token, TokenKind};
