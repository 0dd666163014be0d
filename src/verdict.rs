//! The `(is_spam, confidence)` pair every scorer produces.
//!
//! Both sub-scorers (statistical, rule-based) and the arbitration step speak
//! the same `Verdict` type, so the combined output is indistinguishable in shape
//! from either input.

use serde::{Deserialize, Serialize};

/// Human-facing label, serialized as `spam` / `not_spam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Spam,
    NotSpam,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::NotSpam => "not_spam",
        }
    }
}

/// A scorer's answer. `confidence` lives in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_spam: bool,
    pub confidence: f64,
}

impl Verdict {
    pub fn new(is_spam: bool, confidence: f64) -> Self {
        debug_assert!(
            in_unit_range(confidence),
            "verdict confidence outside [0,1]: {confidence}"
        );
        Self {
            is_spam,
            confidence,
        }
    }

    pub fn spam(confidence: f64) -> Self {
        Self::new(true, confidence)
    }

    pub fn not_spam(confidence: f64) -> Self {
        Self::new(false, confidence)
    }

    pub fn label(&self) -> Label {
        if self.is_spam {
            Label::Spam
        } else {
            Label::NotSpam
        }
    }

    /// True when the confidence is finite and inside `[0,1]`.
    pub fn is_well_formed(&self) -> bool {
        in_unit_range(self.confidence)
    }
}

pub(crate) fn in_unit_range(x: f64) -> bool {
    x.is_finite() && (0.0..=1.0).contains(&x)
}

/// Clamp into `[0,1]`; NaN collapses to 0.
pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
