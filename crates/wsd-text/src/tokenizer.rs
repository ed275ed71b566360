use wsd_types::{Token, TokenKind};

/// Character classes recognised by the scanner, in precedence order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CharClass {
    Space,
    FullStop,
    Hyphen,
    SingleQuote,
    DoubleQuote,
    Special,
    Punctuation,
    Digit,
    Letter,
}

impl CharClass {
    fn kind(self) -> TokenKind {
        match self {
            CharClass::Space => TokenKind::Space,
            CharClass::FullStop => TokenKind::FullStop,
            CharClass::Hyphen => TokenKind::Hyphen,
            CharClass::SingleQuote => TokenKind::SingleQuote,
            CharClass::DoubleQuote => TokenKind::DoubleQuote,
            CharClass::Special => TokenKind::Special,
            CharClass::Punctuation => TokenKind::Punctuation,
            CharClass::Digit => TokenKind::Number,
            CharClass::Letter => TokenKind::Word,
        }
    }

    /// Digits and letters group into runs; everything else is one char per token.
    fn groups(self) -> bool {
        matches!(self, CharClass::Digit | CharClass::Letter)
    }
}

const EXTRA_SPACE: &[char] = &[
    '\u{0008}', '\u{200b}', '\u{2408}', '\u{2420}', '\u{303f}', '\u{feff}',
];

const FULL_STOPS: &[char] = &[
    '.', '\u{06d4}', '\u{0701}', '\u{0702}', '\u{fe12}', '\u{fe52}', '\u{ff0e}', '\u{ff61}',
];

const HYPHENS: &[char] = &['-', '\u{207b}', '\u{208b}', '\u{fe63}', '\u{ff0d}'];

const SINGLE_QUOTES: &[char] = &[
    '\'', '\u{02bc}', '\u{055a}', '\u{07f4}', '\u{07f5}', '\u{2018}', '\u{2019}', '\u{201a}',
    '\u{201b}', '\u{275b}', '\u{275c}', '\u{ff07}',
];

const DOUBLE_QUOTES: &[char] = &[
    '"', '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}', '\u{201e}', '\u{201f}', '\u{2039}',
    '\u{203a}', '\u{275d}', '\u{2760}', '\u{276e}', '\u{276f}',
];

const SPECIALS: &[char] = &[
    '_', '%', '$', '#', '@', '^', '&', '*', '(', ')', '[', '{', ']', '}', '<', '>', '/', '\\',
    '=', '+', '|',
];

const PUNCTUATION: &[char] = &['!', '?', ',', ':', ';'];

/// Classify one character, or `None` if the scanner drops it.
pub fn classify(c: char) -> Option<CharClass> {
    if c.is_whitespace() || EXTRA_SPACE.contains(&c) {
        Some(CharClass::Space)
    } else if FULL_STOPS.contains(&c) {
        Some(CharClass::FullStop)
    } else if HYPHENS.contains(&c) {
        Some(CharClass::Hyphen)
    } else if SINGLE_QUOTES.contains(&c) {
        Some(CharClass::SingleQuote)
    } else if DOUBLE_QUOTES.contains(&c) {
        Some(CharClass::DoubleQuote)
    } else if SPECIALS.contains(&c) {
        Some(CharClass::Special)
    } else if PUNCTUATION.contains(&c) {
        Some(CharClass::Punctuation)
    } else if c.is_ascii_digit() {
        Some(CharClass::Digit)
    } else if c.is_alphabetic() {
        Some(CharClass::Letter)
    } else {
        None
    }
}

/// Split `text` into tokens, left to right.
///
/// Output is deterministic and never contains an empty token. Empty input
/// yields an empty vector.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let Some(class) = classify(c) else {
            continue;
        };

        if class == CharClass::Space {
            while chars
                .next_if(|&(_, next)| classify(next) == Some(CharClass::Space))
                .is_some()
            {}
            tokens.push(Token::new(" ", TokenKind::Space));
        } else if class.groups() {
            let mut end = start + c.len_utf8();
            while let Some((idx, next)) = chars.next_if(|&(_, next)| classify(next) == Some(class))
            {
                end = idx + next.len_utf8();
            }
            tokens.push(Token::new(&text[start..end], class.kind()));
        } else {
            tokens.push(Token::new(c.to_string(), class.kind()));
        }
    }

    tokens
}

/// Best-effort kind for a surface string produced by an external tagger.
pub fn surface_kind(surface: &str) -> TokenKind {
    let mut chars = surface.chars();
    match (chars.next(), chars.next()) {
        (None, _) => TokenKind::Special,
        (Some(c), None) => classify(c)
            .map(CharClass::kind)
            .unwrap_or(TokenKind::Special),
        _ if surface.chars().all(|c| c.is_ascii_digit()) => TokenKind::Number,
        _ if surface.chars().any(char::is_alphabetic) => TokenKind::Word,
        _ => TokenKind::Special,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn groups_letters_and_digits() {
        let tokens = tokenize("river42bank");
        assert_eq!(texts(&tokens), vec!["river", "42", "bank"]);
        assert_eq!(tokens[0].kind(), TokenKind::Word);
        assert_eq!(tokens[1].kind(), TokenKind::Number);
    }

    #[test]
    fn collapses_whitespace_runs() {
        let tokens = tokenize("a \t\n\u{200b} b");
        assert_eq!(texts(&tokens), vec!["a", " ", "b"]);
    }

    #[test]
    fn emits_single_char_tokens_for_symbols() {
        let tokens = tokenize("(x)--\"y\".");
        assert_eq!(texts(&tokens), vec!["(", "x", ")", "-", "-", "\"", "y", "\"", "."]);
        assert_eq!(tokens[3].kind(), TokenKind::Hyphen);
        assert_eq!(tokens[5].kind(), TokenKind::DoubleQuote);
        assert_eq!(tokens[8].kind(), TokenKind::FullStop);
    }

    #[test]
    fn unicode_letters_and_quotes() {
        let tokens = tokenize("caf\u{e9} \u{2019}s");
        assert_eq!(texts(&tokens), vec!["caf\u{e9}", " ", "\u{2019}", "s"]);
        assert_eq!(tokens[2].kind(), TokenKind::SingleQuote);
    }

    #[test]
    fn drops_unrecognised_characters_without_stopping() {
        let tokens = tokenize("ab\u{1f600}cd~e");
        assert_eq!(texts(&tokens), vec!["ab", "cd", "e"]);
    }

    #[test]
    fn rejoining_preserves_non_space_characters() {
        let inputs = [
            "The bank's loan (2.5%) was\u{a0}approved \u{2014} finally!",
            "end\u{3002} \u{ff0e}stop\u{06d4}\u{ff61}",
            "\u{201c}quoted\u{201d} \u{2018}single\u{2019} \u{00ab}guillemets\u{00bb} \"plain\"",
            " \t\n\u{200b}\u{feff} ",
            "\u{1f600}~`\u{2014}\u{00a9}",
            "abc123def4.5e6 x9y",
            "caf\u{e9}-\u{2212}42\u{fe63}na\u{ef}ve",
            "",
        ];
        for input in inputs {
            let rejoined: String = tokenize(input)
                .iter()
                .filter(|t| t.kind() != TokenKind::Space)
                .map(Token::text)
                .collect();
            let expected: String = input
                .chars()
                .filter(|c| matches!(classify(*c), Some(class) if class != CharClass::Space))
                .collect();
            assert_eq!(rejoined, expected, "input {input:?}");
        }
    }

    #[test]
    fn whitespace_only_and_dropped_only_inputs() {
        assert_eq!(texts(&tokenize(" \t\n\u{200b}\u{feff} ")), vec![" "]);
        assert!(tokenize("\u{1f600}~`\u{2014}\u{00a9}").is_empty());
    }

    #[test]
    fn no_token_is_empty() {
        for t in tokenize(" , x  9 .\u{ff0e}") {
            assert!(!t.text().is_empty());
        }
    }

    #[test]
    fn surface_kinds() {
        assert_eq!(surface_kind("bank"), TokenKind::Word);
        assert_eq!(surface_kind("1999"), TokenKind::Number);
        assert_eq!(surface_kind("."), TokenKind::FullStop);
        assert_eq!(surface_kind("n't"), TokenKind::Word);
        assert_eq!(surface_kind("-LRB-"), TokenKind::Word);
        assert_eq!(surface_kind("..."), TokenKind::Special);
    }
}
