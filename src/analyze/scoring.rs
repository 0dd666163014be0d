//! Additive spam score over a rule `FeatureSet`.
//!
//! | feature                  | contribution                |
//! |--------------------------|-----------------------------|
//! | high_confidence_matches  | 0.9 × count (uncapped)      |
//! | spam_keyword_count       | min(0.3, count × 0.05)      |
//! | suspicious_pattern_count | min(0.3, count × 0.1)       |
//! | urgency_count            | min(0.2, count × 0.05)      |
//! | money_count              | min(0.2, count × 0.03)      |
//! | action_count             | min(0.2, count × 0.03)      |
//!
//! The sum is clamped to 1.0; spam iff score > 0.3. `text_length` and
//! `word_count` carry no weight.

use super::rules::FeatureSet;

pub const SPAM_THRESHOLD: f64 = 0.3;

const HIGH_CONFIDENCE_WEIGHT: f64 = 0.9;

/// Compute the clamped rule score in `[0,1]`.
pub fn spam_score(f: &FeatureSet) -> f64 {
    let mut score = 0.0f64;

    if f.high_confidence_matches > 0 {
        score += HIGH_CONFIDENCE_WEIGHT * f.high_confidence_matches as f64;
    }
    score += capped(f.spam_keyword_count, 0.05, 0.3);
    score += capped(f.suspicious_pattern_count, 0.1, 0.3);
    score += capped(f.urgency_count, 0.05, 0.2);
    score += capped(f.money_count, 0.03, 0.2);
    score += capped(f.action_count, 0.03, 0.2);

    score.min(1.0)
}

pub fn is_spam_score(score: f64) -> bool {
    score > SPAM_THRESHOLD
}

fn capped(count: usize, per_hit: f64, cap: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        (count as f64 * per_hit).min(cap)
    }
}
