//! Tagging backends: text in, tagged sentences out.

use anyhow::{Context, Result};
use wsd_types::{PosTag, Sentence, TaggedToken, Token, TokenKind};

use crate::tokenizer::{surface_kind, tokenize};

/// Sentence detection plus part-of-speech tagging for one document.
///
/// An `Err` fails that document only; callers log it and move on.
pub trait Tagger {
    fn tag(&self, text: &str) -> Result<Vec<Sentence>>;
}

impl<T: Tagger + ?Sized> Tagger for &T {
    fn tag(&self, text: &str) -> Result<Vec<Sentence>> {
        (**self).tag(text)
    }
}

impl<T: Tagger + ?Sized> Tagger for Box<T> {
    fn tag(&self, text: &str) -> Result<Vec<Sentence>> {
        (**self).tag(text)
    }
}

/// Reads corpora that are already tagged: one sentence per line, items
/// written `surface/TAG` and separated by whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlashTagger;

impl Tagger for SlashTagger {
    fn tag(&self, text: &str) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut tokens = Vec::new();
            for item in line.split_whitespace() {
                let (surface, tag) = item
                    .rsplit_once('/')
                    .filter(|(surface, tag)| !surface.is_empty() && !tag.is_empty())
                    .with_context(|| {
                        format!("line {}: expected surface/TAG, got {item:?}", lineno + 1)
                    })?;
                tokens.push(TaggedToken::new(
                    Token::new(surface, surface_kind(surface)),
                    PosTag::from_penn(tag),
                ));
            }
            sentences.push(Sentence::new(tokens));
        }
        Ok(sentences)
    }
}

/// Model-free baseline: tokenizes, splits sentences on terminal punctuation
/// and tags by token kind, closed-class lists and suffixes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleTagger;

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Result<Vec<Sentence>> {
        let tokens: Vec<Token> = tokenize(text)
            .into_iter()
            .filter(|t| t.kind() != TokenKind::Space)
            .collect();

        let mut sentences = Vec::new();
        let mut current: Vec<TaggedToken> = Vec::new();
        for (idx, token) in tokens.iter().enumerate() {
            let terminal = ends_sentence(&tokens, idx);
            let tag = tag_token(token, current.is_empty());
            current.push(TaggedToken::new(token.clone(), tag));
            if terminal {
                sentences.push(Sentence::new(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            sentences.push(Sentence::new(current));
        }
        Ok(sentences)
    }
}

fn ends_sentence(tokens: &[Token], idx: usize) -> bool {
    let token = &tokens[idx];
    match token.kind() {
        TokenKind::FullStop => {
            // "2.5" scans as number, stop, number.
            let prev_number = idx > 0 && tokens[idx - 1].kind() == TokenKind::Number;
            let next_number = tokens
                .get(idx + 1)
                .is_some_and(|t| t.kind() == TokenKind::Number);
            !(prev_number && next_number)
        }
        TokenKind::Punctuation => matches!(token.text(), "!" | "?"),
        _ => false,
    }
}

fn tag_token(token: &Token, sentence_start: bool) -> PosTag {
    match token.kind() {
        TokenKind::Word => tag_word(token.text(), sentence_start),
        TokenKind::Number => PosTag::Cd,
        TokenKind::FullStop | TokenKind::Punctuation | TokenKind::Hyphen => PosTag::Punct,
        TokenKind::SingleQuote | TokenKind::DoubleQuote => PosTag::Quote,
        TokenKind::Special => match token.text() {
            "(" | "[" | "{" => PosTag::LeftBracket,
            ")" | "]" | "}" => PosTag::RightBracket,
            _ => PosTag::Sym,
        },
        TokenKind::Space => PosTag::Unknown,
    }
}

fn tag_word(word: &str, sentence_start: bool) -> PosTag {
    let lower = word.to_lowercase();
    if let Some(tag) = closed_class(&lower) {
        return tag;
    }

    let capitalised = word.chars().next().is_some_and(char::is_uppercase);
    if capitalised && !sentence_start {
        return PosTag::Nnp;
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        PosTag::Rb
    } else if len > 5 && lower.ends_with("ing") {
        PosTag::Vbg
    } else if len > 4 && lower.ends_with("ed") {
        PosTag::Vbd
    } else if len > 3
        && lower.ends_with('s')
        && !(lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is"))
    {
        PosTag::Nns
    } else {
        PosTag::Nn
    }
}

fn closed_class(lower: &str) -> Option<PosTag> {
    let tag = match lower {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "every" | "each" | "some"
        | "any" | "no" | "another" | "all" | "both" | "either" | "neither" => PosTag::Dt,
        "of" | "in" | "on" | "at" | "by" | "for" | "from" | "with" | "about" | "into" | "over"
        | "under" | "after" | "before" | "between" | "through" | "during" | "without"
        | "within" | "against" | "among" | "upon" | "toward" | "towards" | "across"
        | "behind" | "beyond" | "near" | "since" | "until" | "via" | "than" | "like" | "as"
        | "because" | "although" | "though" | "while" | "whereas" | "if" | "unless"
        | "whether" => PosTag::In,
        "and" | "or" | "but" | "nor" | "yet" | "so" => PosTag::Cc,
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" | "myself" | "yourself" | "himself" | "herself" | "itself" | "ourselves"
        | "themselves" => PosTag::Prp,
        "my" | "your" | "his" | "its" | "our" | "their" => PosTag::PrpS,
        "can" | "could" | "may" | "might" | "must" | "shall" | "should" | "will" | "would" => {
            PosTag::Md
        }
        "to" => PosTag::To,
        "is" | "has" | "does" => PosTag::Vbz,
        "are" | "am" | "have" | "do" => PosTag::Vbp,
        "was" | "were" | "had" | "did" => PosTag::Vbd,
        "be" => PosTag::Vb,
        "been" | "done" => PosTag::Vbn,
        "being" | "having" | "doing" => PosTag::Vbg,
        "which" => PosTag::Wdt,
        "who" | "whom" | "what" => PosTag::Wp,
        "whose" => PosTag::WpS,
        "how" | "where" | "when" | "why" => PosTag::Wrb,
        "not" | "very" | "also" | "too" | "just" | "there" | "here" => PosTag::Rb,
        _ => return None,
    };
    Some(tag)
}
