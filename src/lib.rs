// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod analyze;
pub mod arbitration;
pub mod config;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod model;
pub mod verdict;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{FeatureSet, Lexicon, Normalizer, RuleScorer};
pub use crate::arbitration::{arbitrate, Arbitration, Outcome};
pub use crate::config::GuardConfig;
pub use crate::engine::{Capability, Classification, Health, HealthStatus, SpamClassifier};
pub use crate::error::{ModelError, ModelResult};
pub use crate::handoff::{HandoffMux, LogSink, SpamEvent, SpamSink};
pub use crate::model::{
    start_model_reload_thread, ArtifactLoader, ModelArtifact, ModelHandle, ModelWatcher,
    SharedModel, SpamModel,
};
pub use crate::verdict::{Label, Verdict};
