//! Shared types for turning text into WSD training material.
//!
//! A [`Token`] is a surface string plus the character class it was scanned
//! as ([`TokenKind`]). Tagging backends attach a Penn part-of-speech
//! ([`PosTag`]) to each token, producing [`TaggedToken`]s grouped into
//! [`Sentence`]s. Everything here is backend-agnostic: the tag vocabulary of
//! an external tagger enters through exactly one conversion,
//! [`PosTag::from_penn`], which never fails.
//!
//! ```rust
//! use wsd_types::{PosTag, Token, TokenKind};
//!
//! let tok = Token::new("banks", TokenKind::Word);
//! assert!(tok.is_textual());
//! assert_eq!(PosTag::from_penn("NNS"), PosTag::Nns);
//! assert!(PosTag::from_penn("nns").is_common_noun());
//! assert_eq!(PosTag::from_penn("XYZ"), PosTag::Unknown);
//! ```

use std::fmt;

/// Character class a token was scanned as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Run of letters.
    Word,
    /// Run of digits.
    Number,
    /// Sentence-terminal full stop (`.` and its Unicode variants).
    FullStop,
    /// Other punctuation mark (`! ? , : ;`).
    Punctuation,
    Hyphen,
    SingleQuote,
    DoubleQuote,
    /// A collapsed run of whitespace, always emitted as a single `" "`.
    Space,
    /// Brackets, operators and other allowed symbols.
    Special,
}

/// One scanned unit of text. Never empty.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /// Build a token. Callers guarantee `text` is non-empty.
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        let text = text.into();
        debug_assert!(!text.is_empty(), "tokens are never empty");
        Self { text, kind }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_full_stop(&self) -> bool {
        self.kind == TokenKind::FullStop || self.text == "."
    }

    /// True for tokens usable as context words: at least one letter and no
    /// digits, commas or periods.
    pub fn is_textual(&self) -> bool {
        is_textual(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Same rule as [`Token::is_textual`], on a bare string.
pub fn is_textual(text: &str) -> bool {
    let mut has_letter = false;
    for c in text.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            return false;
        }
        if c.is_alphabetic() {
            has_letter = true;
        }
    }
    has_letter
}

/// Penn Treebank part-of-speech tags, plus collapsed punctuation classes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PosTag {
    Cc,
    Cd,
    Dt,
    Ex,
    Fw,
    In,
    Jj,
    Jjr,
    Jjs,
    Ls,
    Md,
    Nn,
    Nns,
    Nnp,
    Nnps,
    Pdt,
    Pos,
    Prp,
    PrpS,
    Rb,
    Rbr,
    Rbs,
    Rp,
    Sym,
    To,
    Uh,
    Vb,
    Vbd,
    Vbg,
    Vbn,
    Vbp,
    Vbz,
    Wdt,
    Wp,
    WpS,
    Wrb,
    /// Opening bracket (`-LRB-`, `-LSB-`, `-LCB-`).
    LeftBracket,
    /// Closing bracket (`-RRB-`, `-RSB-`, `-RCB-`).
    RightBracket,
    /// Sentence and clause punctuation.
    Punct,
    /// Quote marks of any kind.
    Quote,
    /// Anything the converter does not recognise.
    Unknown,
}

impl PosTag {
    /// Convert a tag from a Penn-style tagger. Case-insensitive; unknown
    /// input maps to [`PosTag::Unknown`].
    pub fn from_penn(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cc" => PosTag::Cc,
            "cd" => PosTag::Cd,
            "dt" => PosTag::Dt,
            "ex" => PosTag::Ex,
            "fw" => PosTag::Fw,
            "in" => PosTag::In,
            "jj" => PosTag::Jj,
            "jjr" => PosTag::Jjr,
            "jjs" => PosTag::Jjs,
            "ls" => PosTag::Ls,
            "md" => PosTag::Md,
            "nn" => PosTag::Nn,
            "nns" => PosTag::Nns,
            "nnp" => PosTag::Nnp,
            "nnps" => PosTag::Nnps,
            "pdt" => PosTag::Pdt,
            "pos" => PosTag::Pos,
            "prp" => PosTag::Prp,
            "prp$" | "prps" => PosTag::PrpS,
            "rb" => PosTag::Rb,
            "rbr" => PosTag::Rbr,
            "rbs" => PosTag::Rbs,
            "rp" => PosTag::Rp,
            "sym" => PosTag::Sym,
            "to" => PosTag::To,
            "uh" | "intj" => PosTag::Uh,
            "vb" => PosTag::Vb,
            "vbd" => PosTag::Vbd,
            "vbg" => PosTag::Vbg,
            "vbn" => PosTag::Vbn,
            "vbp" => PosTag::Vbp,
            "vbz" => PosTag::Vbz,
            "wdt" => PosTag::Wdt,
            "wp" => PosTag::Wp,
            "wp$" | "wps" => PosTag::WpS,
            "wrb" => PosTag::Wrb,
            "-lrb-" | "lrb" | "-lsb-" | "lsb" | "-lcb-" | "lcb" => PosTag::LeftBracket,
            "-rrb-" | "rrb" | "-rsb-" | "rsb" | "-rcb-" | "rcb" => PosTag::RightBracket,
            "." | "," | ":" | ";" | "!" | "?" | "-" | "hyph" | "#" | "$" | "pun" => PosTag::Punct,
            "``" | "''" | "`" | "'" | "\"" | "sqt" | "eqt" => PosTag::Quote,
            _ => PosTag::Unknown,
        }
    }

    /// Canonical Penn spelling.
    pub fn as_penn(self) -> &'static str {
        match self {
            PosTag::Cc => "CC",
            PosTag::Cd => "CD",
            PosTag::Dt => "DT",
            PosTag::Ex => "EX",
            PosTag::Fw => "FW",
            PosTag::In => "IN",
            PosTag::Jj => "JJ",
            PosTag::Jjr => "JJR",
            PosTag::Jjs => "JJS",
            PosTag::Ls => "LS",
            PosTag::Md => "MD",
            PosTag::Nn => "NN",
            PosTag::Nns => "NNS",
            PosTag::Nnp => "NNP",
            PosTag::Nnps => "NNPS",
            PosTag::Pdt => "PDT",
            PosTag::Pos => "POS",
            PosTag::Prp => "PRP",
            PosTag::PrpS => "PRP$",
            PosTag::Rb => "RB",
            PosTag::Rbr => "RBR",
            PosTag::Rbs => "RBS",
            PosTag::Rp => "RP",
            PosTag::Sym => "SYM",
            PosTag::To => "TO",
            PosTag::Uh => "UH",
            PosTag::Vb => "VB",
            PosTag::Vbd => "VBD",
            PosTag::Vbg => "VBG",
            PosTag::Vbn => "VBN",
            PosTag::Vbp => "VBP",
            PosTag::Vbz => "VBZ",
            PosTag::Wdt => "WDT",
            PosTag::Wp => "WP",
            PosTag::WpS => "WP$",
            PosTag::Wrb => "WRB",
            PosTag::LeftBracket => "-LRB-",
            PosTag::RightBracket => "-RRB-",
            PosTag::Punct => ".",
            PosTag::Quote => "''",
            PosTag::Unknown => "UNK",
        }
    }

    /// `NN` or `NNS`.
    pub fn is_common_noun(self) -> bool {
        matches!(self, PosTag::Nn | PosTag::Nns)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_penn())
    }
}

/// A token with the part of speech assigned by a tagging backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(token: Token, tag: PosTag) -> Self {
        Self { token, tag }
    }

    pub fn text(&self) -> &str {
        self.token.text()
    }
}

/// Ordered tokens of one sentence. Boundaries come from the tagger and are
/// never re-split downstream.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sentence {
    pub tokens: Vec<TaggedToken>,
}

impl Sentence {
    pub fn new(tokens: Vec<TaggedToken>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
