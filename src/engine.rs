//! # Classification Engine
//! The service object callers hold: normalizer + rule scorer + statistical
//! adapter, created once at startup and shared by reference.
//!
//! `classify` is a pure function of the input text and the currently loaded
//! model; it never fails. A missing or broken model degrades to rule-only mode.

use metrics::describe_counter;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::analyze::{FeatureSet, Lexicon, Normalizer, RuleScorer};
use crate::arbitration::{arbitrate, Outcome};
use crate::config::GuardConfig;
use crate::model::{ArtifactLoader, ModelHandle, SharedModel, StatisticalAdapter};
use crate::verdict::{clamp01, Label, Verdict};

/// Whether the statistical signal took part in a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Hybrid,
    RuleOnly,
}

/// Full breakdown of one classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: Label,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub capability: Capability,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistical: Option<Verdict>,
    pub rule: Verdict,
    pub features: FeatureSet,
    pub normalized: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// Running without a model: rule-only, still serving.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: HealthStatus,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub rule_detector_loaded: bool,
}

#[derive(Debug, Clone)]
pub struct SpamClassifier {
    normalizer: Arc<Normalizer>,
    rules: RuleScorer,
    statistical: StatisticalAdapter,
}

impl Default for SpamClassifier {
    fn default() -> Self {
        Self::rule_only()
    }
}

impl SpamClassifier {
    pub fn new(rules: RuleScorer, model: ModelHandle) -> Self {
        Self {
            normalizer: Arc::new(Normalizer::new()),
            rules,
            statistical: StatisticalAdapter::new(model),
        }
    }

    /// Built-in rules, no model.
    pub fn rule_only() -> Self {
        Self::new(RuleScorer::builtin(), ModelHandle::empty())
    }

    /// Built-in rules plus the given model.
    pub fn with_model(model: SharedModel) -> Self {
        Self::new(RuleScorer::builtin(), ModelHandle::new(Some(model)))
    }

    /// Startup path: lexicon (with built-in fallback) and the first loadable
    /// artifact from the configured priority list.
    pub fn from_config(cfg: &GuardConfig) -> Self {
        let lexicon = Lexicon::load_or_builtin(cfg.rules.lexicon_path.as_deref());
        let rules = RuleScorer::from_lexicon(lexicon).unwrap_or_else(|e| {
            warn!(error = %e, "custom rule lexicon does not compile, using built-in");
            RuleScorer::builtin()
        });

        let loader = ArtifactLoader::new(cfg.model.paths.iter().cloned());
        let model: Option<SharedModel> = loader.load().map(|l| l.artifact as SharedModel);
        let classifier = Self::new(rules, ModelHandle::new(model));

        let health = classifier.health();
        info!(
            status = ?health.status,
            model = health.model_name.as_deref().unwrap_or("-"),
            "spam classifier ready"
        );
        classifier
    }

    pub fn model_handle(&self) -> &ModelHandle {
        self.statistical.handle()
    }

    pub fn rules(&self) -> &RuleScorer {
        &self.rules
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Combined `(is_spam, confidence)` for `raw`.
    pub fn classify(&self, raw: &str) -> Verdict {
        self.classify_detailed(raw).verdict
    }

    /// Classification with both sub-verdicts, the arbitration branch and features.
    pub fn classify_detailed(&self, raw: &str) -> Classification {
        let features = self.rules.score(raw);
        let rule = checked(RuleScorer::verdict_for(&features), "rule");

        // Blank input never reaches the model.
        let (normalized, statistical) = if raw.trim().is_empty() {
            (String::new(), None)
        } else {
            let normalized = self.normalizer.normalize(raw);
            let stat = self
                .statistical
                .predict(&normalized)
                .map(|v| checked(v, "statistical"));
            (normalized, stat)
        };

        let arb = arbitrate(statistical, rule);
        let verdict = checked(arb.verdict, "arbitration");
        let capability = if statistical.is_some() {
            Capability::Hybrid
        } else {
            Capability::RuleOnly
        };

        debug!(
            id = %anon_id(raw),
            outcome = arb.outcome.as_str(),
            is_spam = verdict.is_spam,
            confidence = verdict.confidence,
            ?capability,
            "classified"
        );
        ensure_metrics_described();
        metrics::counter!(
            "spam_guard_classifications_total",
            "outcome" => arb.outcome.as_str(),
            "label" => verdict.label().as_str()
        )
        .increment(1);

        Classification {
            label: verdict.label(),
            verdict,
            capability,
            outcome: arb.outcome,
            statistical,
            rule,
            features,
            normalized,
        }
    }

    /// Reduced capability is reported as `degraded`, never as an error.
    pub fn health(&self) -> Health {
        let model = self.model_handle().current();
        Health {
            status: if model.is_some() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            model_loaded: model.is_some(),
            model_name: model.map(|m| m.name().to_string()),
            rule_detector_loaded: true,
        }
    }
}

/// One-time metrics registration (descriptions show up in the host's exporter).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "spam_guard_classifications_total",
            "Classifications by arbitration outcome and label."
        );
        describe_counter!(
            "spam_guard_model_reloads_total",
            "Model artifacts swapped in by hot reload."
        );
    });
}

/// Confidence must stay in `[0,1]`. Debug builds panic; release logs and clamps.
fn checked(v: Verdict, stage: &'static str) -> Verdict {
    if v.is_well_formed() {
        return v;
    }
    debug_assert!(
        false,
        "{stage} verdict confidence outside [0,1]: {}",
        v.confidence
    );
    error!(stage, confidence = v.confidence, "verdict confidence outside [0,1]; clamping");
    Verdict {
        is_spam: v.is_spam,
        confidence: clamp01(v.confidence),
    }
}

/// Short anonymized id for logs: first 6 bytes of SHA-256, hex. Raw text is never logged.
pub(crate) fn anon_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
