//! Rule-based scorer: heuristic spam likelihood from keyword / pattern counts.
//!
//! Features are extracted from the lowercased RAW text, never from the
//! normalized form: punctuation, digits and URLs are exactly what carries signal
//! here. The scorer is stateless and never fails; empty input yields all-zero
//! counts and `(not-spam, 0.0)`.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::lexicon::Lexicon;
use super::scoring::{is_spam_score, spam_score};
use crate::verdict::Verdict;

static BUILTIN_SCORER: Lazy<RuleScorer> = Lazy::new(|| {
    RuleScorer::from_lexicon(Lexicon::builtin()).expect("built-in lexicon compiles")
});

/// Named counters produced from the raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub spam_keyword_count: usize,
    pub suspicious_pattern_count: usize,
    pub high_confidence_matches: usize,
    pub urgency_count: usize,
    pub money_count: usize,
    pub action_count: usize,
    /// Characters in the raw text.
    pub text_length: usize,
    /// Whitespace-separated words in the raw text.
    pub word_count: usize,
}

/// Compiled lexicon. Cheap to share (`&RuleScorer` across threads).
#[derive(Debug, Clone)]
pub struct RuleScorer {
    lexicon: Lexicon,
    suspicious: Vec<Regex>,
    high_confidence: Vec<Regex>,
}

impl Default for RuleScorer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleScorer {
    /// Scorer over the built-in lexicon (compiled once per process).
    pub fn builtin() -> Self {
        BUILTIN_SCORER.clone()
    }

    pub fn from_lexicon(lexicon: Lexicon) -> anyhow::Result<Self> {
        let suspicious = lexicon
            .suspicious_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| anyhow::anyhow!("suspicious pattern `{}`: {}", p, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let high_confidence = lexicon
            .high_confidence_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| anyhow::anyhow!("high-confidence pattern `{}`: {}", p, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            lexicon,
            suspicious,
            high_confidence,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Extract the feature counters from raw text.
    pub fn score(&self, raw: &str) -> FeatureSet {
        let text = raw.to_lowercase();
        let lex = &self.lexicon;

        FeatureSet {
            spam_keyword_count: lex
                .spam_keywords
                .iter()
                .map(|k| text.matches(k.as_str()).count())
                .sum(),
            suspicious_pattern_count: self
                .suspicious
                .iter()
                .map(|re| re.find_iter(&text).count())
                .sum(),
            high_confidence_matches: self
                .high_confidence
                .iter()
                .filter(|re| re.is_match(&text))
                .count(),
            urgency_count: count_present(&text, &lex.urgency_words),
            money_count: count_present(&text, &lex.money_words),
            action_count: count_present(&text, &lex.action_words),
            text_length: raw.chars().count(),
            word_count: raw.split_whitespace().count(),
        }
    }

    /// Rule verdict: `confidence` is the clamped score itself.
    pub fn predict(&self, raw: &str) -> Verdict {
        Self::verdict_for(&self.score(raw))
    }

    pub fn verdict_for(features: &FeatureSet) -> Verdict {
        let score = spam_score(features);
        Verdict::new(is_spam_score(score), score)
    }
}

/// Number of vocabulary entries that occur at least once.
fn count_present(text: &str, words: &[String]) -> usize {
    words.iter().filter(|w| text.contains(w.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_not_spam_with_zero_confidence() {
        let s = RuleScorer::builtin();
        assert_eq!(s.score(""), FeatureSet::default());
        assert_eq!(s.predict(""), Verdict::not_spam(0.0));
    }

    #[test]
    fn counts_follow_raw_text() {
        let f = RuleScorer::builtin().score("FREE cash!! Call now");
        assert_eq!(f.spam_keyword_count, 3); // free, cash, call now
        assert_eq!(f.suspicious_pattern_count, 1); // "!!"
        assert_eq!(f.high_confidence_matches, 0);
        assert_eq!(f.urgency_count, 0);
        assert_eq!(f.money_count, 2); // free, cash
        assert_eq!(f.action_count, 1); // call
        assert_eq!(f.text_length, 20);
        assert_eq!(f.word_count, 4);
    }

    #[test]
    fn keyword_occurrences_are_summed() {
        let f = RuleScorer::builtin().score("cash cash cash");
        assert_eq!(f.spam_keyword_count, 3);
        // vocabulary words count once regardless of repetitions
        assert_eq!(f.money_count, 1);
    }

    #[test]
    fn template_match_alone_decides() {
        let v = RuleScorer::builtin()
            .predict("Your account was suspended, verify and click to restore access");
        assert!(v.is_spam);
        assert!(v.confidence >= 0.9);
    }

    #[test]
    fn template_matching_ignores_case() {
        let f = RuleScorer::builtin().score("GIFT CARDS needed URGENTLY, SEND CODES");
        assert_eq!(f.high_confidence_matches, 1);
    }

    #[test]
    fn bad_custom_regex_is_rejected() {
        let lex = Lexicon {
            spam_keywords: vec![],
            suspicious_patterns: vec!["(unclosed".into()],
            high_confidence_patterns: vec![],
            urgency_words: vec![],
            money_words: vec![],
            action_words: vec![],
        };
        assert!(RuleScorer::from_lexicon(lex).is_err());
    }

    #[test]
    fn custom_lexicon_changes_vocabulary() {
        let lex = Lexicon {
            spam_keywords: vec!["bitcoin".into()],
            suspicious_patterns: vec![],
            high_confidence_patterns: vec![r"double.*bitcoin".into()],
            urgency_words: vec![],
            money_words: vec![],
            action_words: vec![],
        };
        let s = RuleScorer::from_lexicon(lex).unwrap();
        let f = s.score("Double your Bitcoin today");
        assert_eq!(f.spam_keyword_count, 1);
        assert_eq!(f.high_confidence_matches, 1);
        assert!(s.predict("free cash click now").confidence == 0.0);
    }
}
