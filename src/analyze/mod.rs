// src/analyze/mod.rs
//! Text analysis: normalization for the statistical model and the
//! rule-based scorer with its lexicon.

pub mod lexicon;
pub mod normalize;
pub mod rules;
pub mod scoring;

pub use crate::analyze::lexicon::Lexicon;
pub use crate::analyze::normalize::Normalizer;
pub use crate::analyze::rules::{FeatureSet, RuleScorer};
pub use crate::analyze::scoring::{is_spam_score, spam_score, SPAM_THRESHOLD};
