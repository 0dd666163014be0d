//! # Arbitration
//! Pure, ordered policy combining the statistical and rule verdicts.
//! No I/O, no state: the same pair of inputs always yields the same output.
//!
//! Policy (first match wins):
//! 1. statistical unavailable → rule verdict unchanged
//! 2. labels agree → that label, max of the two confidences
//! 3. disagree, rule confidence > 0.4 → rule label, rule confidence + 0.15 (capped at 1)
//! 4. disagree, statistical confidence > 0.95 → statistical verdict unchanged
//! 5. otherwise → rule verdict unchanged
//!
//! The table leans on the rule engine, which encodes precise scam templates;
//! only a near-certain statistical call overrides a weak rule call.

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

pub const RULE_TRUST_THRESHOLD: f64 = 0.4;
pub const RULE_TRUST_BOOST: f64 = 0.15;
pub const STAT_OVERRIDE_THRESHOLD: f64 = 0.95;

/// Which branch of the policy produced the combined verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    RuleOnly,
    Agree,
    DisagreeRuleWins,
    DisagreeStatWins,
    DisagreeDefaultRule,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::RuleOnly => "rule_only",
            Outcome::Agree => "agree",
            Outcome::DisagreeRuleWins => "disagree_rule_wins",
            Outcome::DisagreeStatWins => "disagree_stat_wins",
            Outcome::DisagreeDefaultRule => "disagree_default_rule",
        }
    }

    /// Select the branch. Only looks at labels and confidences.
    pub fn select(stat: Option<&Verdict>, rule: &Verdict) -> Self {
        let Some(stat) = stat else {
            return Outcome::RuleOnly;
        };
        if stat.is_spam == rule.is_spam {
            Outcome::Agree
        } else if rule.confidence > RULE_TRUST_THRESHOLD {
            Outcome::DisagreeRuleWins
        } else if stat.confidence > STAT_OVERRIDE_THRESHOLD {
            Outcome::DisagreeStatWins
        } else {
            Outcome::DisagreeDefaultRule
        }
    }
}

/// Combined result plus the branch taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arbitration {
    pub outcome: Outcome,
    pub verdict: Verdict,
}

/// Combine the two signals. `stat == None` means the model was unavailable.
pub fn arbitrate(stat: Option<Verdict>, rule: Verdict) -> Arbitration {
    let outcome = Outcome::select(stat.as_ref(), &rule);
    let verdict = match (outcome, stat) {
        (Outcome::Agree, Some(stat)) => {
            Verdict::new(stat.is_spam, stat.confidence.max(rule.confidence))
        }
        (Outcome::DisagreeRuleWins, _) => {
            Verdict::new(rule.is_spam, (rule.confidence + RULE_TRUST_BOOST).min(1.0))
        }
        (Outcome::DisagreeStatWins, Some(stat)) => stat,
        _ => rule,
    };
    Arbitration { outcome, verdict }
}
