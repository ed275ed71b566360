//! Words and symbols excluded from context windows.
//!
//! High-frequency function words and stray symbols say nothing about which
//! sense a noun is used in. Entries are lower case; callers case-fold first.

use std::collections::HashSet;
use std::sync::LazyLock;

static UNDESIRABLE: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    WORDS.iter().chain(SYMBOLS.iter()).copied().collect()
});

const WORDS: &[&str] = &[
    // articles
    "the", "a", "an",
    // single letters ("c" kept for the language)
    "not", "b", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
    // auxiliaries
    "be", "is", "am", "are", "was", "were", "being", "been", "do", "did", "doing", "done",
    "does", "have", "had", "having", "has",
    // conjunctions
    "after", "although", "and", "as", "because", "before", "both", "but", "either", "even",
    "though", "for", "how", "however", "neither", "nor", "now", "once", "only", "or",
    "provided", "rather", "than", "since", "so", "that", "till", "unless", "until", "when",
    "whenever", "where", "whereas", "wherever", "whether", "while", "yet",
    // determiners
    "my", "his", "her", "our", "your", "its", "their", "what", "whose", "which", "these",
    "some", "all", "another", "any", "each", "enough", "every", "few", "fewer", "less",
    "little", "many", "more", "most", "much", "no", "other", "several",
    // modals
    "can", "can't", "could", "couldn't", "may", "might", "mightn't", "must", "mustn't",
    "shall", "shan't", "should", "shouldn't", "will", "won't", "would", "wouldn't", "ought",
    "oughtn't", "dare", "daren't", "need", "needn't",
    // prepositions
    "aboard", "about", "above", "across", "against", "along", "amid", "among", "anti",
    "around", "at", "behind", "below", "beneath", "beside", "besides", "between", "beyond",
    "by", "concerning", "considering", "despite", "down", "during", "except", "excepting",
    "excluding", "following", "from", "in", "inside", "into", "like", "minus", "near", "of",
    "off", "on", "onto", "opposite", "outside", "over", "past", "per", "plus", "regarding",
    "round", "save", "through", "to", "toward", "towards", "under", "underneath", "unlike",
    "up", "upon", "versus", "via", "with", "within", "without", "out", "away",
    // pronouns
    "none", "everything", "anybody", "anyone", "anything", "nothing", "one", "somebody",
    "someone", "something", "others", "you", "yours", "yourself", "yourselves", "me", "them",
    "they", "she", "he", "him", "us", "we", "it", "whatever", "whichever", "who", "whoever",
    "whom", "whomever", "herself", "himself", "itself", "myself", "everybody", "everyone",
    "hers", "mine", "nobody", "ours", "ourselves", "theirs", "themselves", "this", "those",
    "why",
    // clitics
    "n't", "''", "`",
];

const SYMBOLS: &[&str] = &[
    ".", "\u{06d4}", "\u{0701}", "\u{0702}", "\u{fe12}", "\u{fe52}", "\u{ff0e}", "\u{ff61}",
    "!", "?", ",", ":", ";", "_", "%", "$", "#", "@", "^", "&", "*", "(", ")", "[", "{", "]",
    "}", "<", ">", "/", "\\", "=", "+", "|", "\"", "'", "\u{02bc}", "\u{055a}", "\u{07f4}",
    "\u{07f5}", "\u{2019}", "\u{ff07}", "\u{2018}", "\u{201a}", "\u{201b}", "\u{275b}",
    "\u{275c}", "\u{201c}", "\u{201d}", "\u{201e}", "\u{201f}", "\u{2039}", "\u{203a}",
    "\u{275d}", "\u{276e}", "\u{2760}", "\u{276f}", "-", "\u{207b}", "\u{208b}", "\u{fe63}",
    "\u{ff0d}", " ",
];

/// True if `word` (already case-folded) should never appear in a window.
pub fn is_undesirable(word: &str) -> bool {
    UNDESIRABLE.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_function_words_and_symbols() {
        for w in ["the", "of", "would", "themselves", "(", "\u{201c}", "-"] {
            assert!(is_undesirable(w), "{w} should be undesirable");
        }
    }

    #[test]
    fn keeps_content_words() {
        for w in ["river", "money", "c", "shore", "bank"] {
            assert!(!is_undesirable(w), "{w} should be kept");
        }
    }

    #[test]
    fn expects_case_folded_input() {
        assert!(!is_undesirable("The"));
    }
}
