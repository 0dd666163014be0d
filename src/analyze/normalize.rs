//! Text normalization for the statistical path.
//!
//! Pipeline (each step total, never fails):
//! 1. lowercase
//! 2. strip URL-like substrings (`http…`, `www…`)
//! 3. strip e-mail-like substrings (anything around an `@`)
//! 4. strip digit runs of length >= 3
//! 5. collapse whitespace
//! 6. tokenize; keep purely alphabetic tokens longer than one char
//! 7. drop English stopwords
//! 8. stem (Snowball English)
//!
//! Step 4 is lossy: phone numbers, OTPs and amounts never reach the model.
//! The rule scorer reads them from the raw text instead.
//!
//! Only ASCII tokens go through stopword removal and stemming. Tokens in other
//! scripts (e.g. Devanagari) pass through untouched, so the model sees Hindi
//! text almost verbatim while the rule lexicon only knows transliterations.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\S+").expect("url regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").expect("email regex"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").expect("digit-run regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// English stopwords (NLTK list, apostrophe-free forms; tokenization splits on `'`).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Deterministic raw text → space-joined stemmed tokens.
pub struct Normalizer {
    stemmer: Stemmer,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stemmer", &"snowball-english")
            .finish()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalized form, tokens joined by single spaces. Empty output is valid.
    pub fn normalize(&self, raw: &str) -> String {
        self.tokens(raw).join(" ")
    }

    /// Same pipeline, returning the token sequence.
    pub fn tokens(&self, raw: &str) -> Vec<String> {
        let text = raw.to_lowercase();
        let text = URL_RE.replace_all(&text, "");
        let text = EMAIL_RE.replace_all(&text, "");
        let text = DIGITS_RE.replace_all(&text, "");
        let text = WS_RE.replace_all(text.trim(), " ");

        text.split(is_token_break)
            .filter(|t| is_word(t))
            .filter(|t| !is_stopword(t))
            .map(|t| self.stem(t))
            .collect()
    }

    fn stem(&self, token: &str) -> String {
        if token.is_ascii() {
            self.stemmer.stem(token).into_owned()
        } else {
            token.to_string()
        }
    }
}

/// Hyphen does not break: `claim-now` stays one token and is then dropped
/// as non-alphabetic.
fn is_token_break(c: char) -> bool {
    c.is_whitespace()
        || (c.is_ascii_punctuation() && c != '-')
        || matches!(
            c,
            '।' | '॥' | '“' | '”' | '‘' | '’' | '…' | '–' | '—' | '₹' | '€' | '£' | '¡' | '¿'
        )
}

/// Purely alphabetic and longer than one character. Devanagari signs
/// (virama, nukta) count as letters.
fn is_word(token: &str) -> bool {
    let mut n = 0usize;
    for c in token.chars() {
        if !(c.is_alphabetic() || is_devanagari_sign(c)) {
            return false;
        }
        n += 1;
    }
    n > 1
}

fn is_devanagari_sign(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c) && !c.is_numeric()
}

fn is_stopword(token: &str) -> bool {
    token.is_ascii() && STOPWORD_SET.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        Normalizer::new().normalize(s)
    }

    #[test]
    fn lowercases_and_stems() {
        assert_eq!(norm("Claims CALLING cards"), "claim call card");
    }

    #[test]
    fn drops_stopwords_and_single_letters() {
        assert_eq!(norm("this is the card x"), "card");
    }

    #[test]
    fn strips_urls_emails_and_digit_runs() {
        assert_eq!(
            norm("call 5551234 or mail me@example.com via www.example.com http://t.co/x"),
            "call mail via"
        );
    }

    #[test]
    fn short_digit_runs_split_tokens_but_never_survive() {
        // runs shorter than 3 stay in the text but never form a word token
        assert_eq!(norm("reply in 24h or 12 hours"), "repli hour");
    }

    #[test]
    fn degenerate_inputs_give_empty_output() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   \t\n"), "");
        assert_eq!(norm("12345 !!! 987"), "");
        assert_eq!(norm("to be or not to be"), "");
    }

    #[test]
    fn contraction_fragments_are_stopwords() {
        assert_eq!(norm("You've won"), "");
    }

    #[test]
    fn hyphenated_tokens_are_dropped_whole() {
        assert_eq!(norm("Click claim-now for a check-in"), "click");
        assert_eq!(norm("well - known"), "well known");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(norm("  claim \n\n  card\t"), "claim card");
    }

    #[test]
    fn devanagari_passes_through_unstemmed() {
        assert_eq!(norm("बधाई हो आपने जीते"), "बधाई हो आपने जीते");
        assert_eq!(norm("तुरंत संपर्क करें।"), "तुरंत संपर्क करें");
        assert_eq!(norm("१२३४ रुपये"), "रुपये");
    }

    #[test]
    fn normalization_is_deterministic() {
        let n = Normalizer::new();
        let s = "URGENT! Your account is locked, verify at http://x.io now";
        assert_eq!(n.normalize(s), n.normalize(s));
    }
}
