//! # Rule Lexicon
//!
//! Vocabulary and regex templates consumed by the rule scorer:
//! - `spam_keywords`: phrases counted by occurrence (substring, non-overlapping);
//!   a phrase listed twice counts twice
//! - `suspicious_patterns`: regexes counted by match
//! - `high_confidence_patterns`: end-to-end scam templates, counted once each
//! - `urgency_words` / `money_words` / `action_words`: counted once per word present
//!
//! The built-in lexicon is embedded from `config/lexicon.json`. A custom file can
//! replace it; on any read/parse error we keep the built-in one.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{info, warn};

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../../config/lexicon.json");
    serde_json::from_str::<Lexicon>(raw).expect("valid built-in lexicon")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub spam_keywords: Vec<String>,
    pub suspicious_patterns: Vec<String>,
    pub high_confidence_patterns: Vec<String>,
    #[serde(default)]
    pub urgency_words: Vec<String>,
    #[serde(default)]
    pub money_words: Vec<String>,
    #[serde(default)]
    pub action_words: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        let mut lex: Lexicon = serde_json::from_str(&data)?;
        lex.sanitize();
        Ok(lex)
    }

    /// Custom lexicon if `path` is given and loads, built-in otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load_from_file(path) {
            Ok(lex) => {
                info!(
                    path = %path.display(),
                    keywords = lex.spam_keywords.len(),
                    templates = lex.high_confidence_patterns.len(),
                    "custom rule lexicon loaded"
                );
                lex
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "rule lexicon unusable, using built-in");
                Self::builtin()
            }
        }
    }

    /// Lowercase word lists (matching runs on lowercased text) and drop blanks.
    fn sanitize(&mut self) {
        for list in [
            &mut self.spam_keywords,
            &mut self.urgency_words,
            &mut self.money_words,
            &mut self.action_words,
        ] {
            list.retain(|w| !w.trim().is_empty());
            for w in list.iter_mut() {
                *w = w.to_lowercase();
            }
        }
        self.suspicious_patterns.retain(|p| !p.trim().is_empty());
        self.high_confidence_patterns.retain(|p| !p.trim().is_empty());
    }
}
