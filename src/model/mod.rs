// src/model/mod.rs
//! Statistical classifier adapter: model trait, swappable handle, hot reload.

pub mod artifact;
pub mod classifier;
pub mod tfidf;

use std::fmt;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ModelResult;
use crate::verdict::{in_unit_range, Verdict};

pub use artifact::{ArtifactLoader, Fingerprint, LoadedArtifact, ModelArtifact};
pub use classifier::Classifier;
pub use tfidf::{Norm, TfidfVectorizer};

/// Anything that turns normalized text into `[p_not_spam, p_spam]`.
///
/// Implemented by `ModelArtifact`; tests swap in fakes.
pub trait SpamModel: Send + Sync {
    fn predict_proba(&self, normalized: &str) -> ModelResult<[f64; 2]>;
    /// Name for diagnostics / health output.
    fn name(&self) -> &str;
}

pub type SharedModel = Arc<dyn SpamModel>;

/* ----------------------------
Thread-safe handle + atomic swap
---------------------------- */

/// Process-wide, read-mostly reference to the current model (or none).
///
/// Readers clone the inner `Arc` and drop the lock before scoring, so a swap
/// never exposes a half-loaded model to an in-flight classification.
#[derive(Clone, Default)]
pub struct ModelHandle {
    inner: Arc<RwLock<Option<SharedModel>>>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.current().map(|m| m.name().to_string()))
            .finish()
    }
}

impl ModelHandle {
    pub fn new(model: Option<SharedModel>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SharedModel> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn!("model handle lock poisoned; recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Replace the model, returning the previous one.
    pub fn swap(&self, model: Option<SharedModel>) -> Option<SharedModel> {
        match self.inner.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, model),
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                std::mem::replace(&mut *guard, model)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

/* ----------------------------
Adapter
---------------------------- */

/// Wraps the model handle and turns probabilities into a `Verdict`.
///
/// `predict` returns `None` ("unavailable") when no model is loaded or scoring
/// fails; it never propagates an error.
#[derive(Debug, Clone, Default)]
pub struct StatisticalAdapter {
    handle: ModelHandle,
}

impl StatisticalAdapter {
    pub fn new(handle: ModelHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn predict(&self, normalized: &str) -> Option<Verdict> {
        let model = self.handle.current()?;
        match model.predict_proba(normalized) {
            Ok([p_ham, p_spam]) if in_unit_range(p_ham) && in_unit_range(p_spam) => {
                // ties go to "not spam"
                let is_spam = p_spam > p_ham;
                Some(Verdict::new(is_spam, p_ham.max(p_spam)))
            }
            Ok(proba) => {
                warn!(model = model.name(), ?proba, "model returned invalid probabilities");
                None
            }
            Err(e) => {
                warn!(model = model.name(), error = %e, "model scoring failed");
                None
            }
        }
    }
}

/* ----------------------------
Hot reload
---------------------------- */

/// Polls the artifact candidates and swaps in a fresh model when they change.
#[derive(Debug)]
pub struct ModelWatcher {
    loader: ArtifactLoader,
    handle: ModelHandle,
    last_seen: Fingerprint,
}

impl ModelWatcher {
    /// Starts from the current on-disk state, so the first `poll` is a no-op
    /// unless something changed after construction.
    pub fn new(loader: ArtifactLoader, handle: ModelHandle) -> Self {
        let last_seen = loader.fingerprint();
        Self {
            loader,
            handle,
            last_seen,
        }
    }

    /// Returns `true` when a new model was swapped in.
    ///
    /// A change that does not produce a loadable artifact keeps the current model.
    pub fn poll(&mut self) -> bool {
        let seen = self.loader.fingerprint();
        if seen == self.last_seen {
            return false;
        }
        self.last_seen.clone_from(&seen);

        if seen.iter().all(|(_, mtime)| mtime.is_none()) {
            warn!("model artifact files disappeared; keeping current model");
            return false;
        }

        match self.loader.load() {
            Some(loaded) => {
                info!(path = %loaded.path.display(), "model artifact hot-reloaded");
                crate::engine::ensure_metrics_described();
                metrics::counter!("spam_guard_model_reloads_total").increment(1);
                let model: SharedModel = loaded.artifact;
                self.handle.swap(Some(model));
                true
            }
            None => false,
        }
    }
}

/// Spawn a polling watcher that hot-reloads into `handle` every `every`.
pub fn start_model_reload_thread(
    loader: ArtifactLoader,
    handle: ModelHandle,
    every: Duration,
) -> thread::JoinHandle<()> {
    let mut watcher = ModelWatcher::new(loader, handle);
    thread::spawn(move || loop {
        thread::sleep(every);
        watcher.poll();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    struct Fixed([f64; 2]);

    impl SpamModel for Fixed {
        fn predict_proba(&self, _: &str) -> ModelResult<[f64; 2]> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Broken;

    impl SpamModel for Broken {
        fn predict_proba(&self, _: &str) -> ModelResult<[f64; 2]> {
            Err(ModelError::Scoring("boom".into()))
        }
        fn name(&self) -> &str {
            "broken"
        }
    }

    fn adapter(m: impl SpamModel + 'static) -> StatisticalAdapter {
        StatisticalAdapter::new(ModelHandle::new(Some(Arc::new(m))))
    }

    #[test]
    fn confidence_is_mass_of_predicted_class() {
        let v = adapter(Fixed([0.1, 0.9])).predict("x").unwrap();
        assert!(v.is_spam);
        assert!((v.confidence - 0.9).abs() < 1e-12);

        let v = adapter(Fixed([0.7, 0.3])).predict("x").unwrap();
        assert!(!v.is_spam);
        assert!((v.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn tie_is_not_spam() {
        let v = adapter(Fixed([0.5, 0.5])).predict("x").unwrap();
        assert!(!v.is_spam);
    }

    #[test]
    fn missing_or_failing_model_is_unavailable() {
        assert!(StatisticalAdapter::default().predict("x").is_none());
        assert!(adapter(Broken).predict("x").is_none());
        assert!(adapter(Fixed([f64::NAN, 0.2])).predict("x").is_none());
        assert!(adapter(Fixed([-0.1, 1.1])).predict("x").is_none());
    }

    #[test]
    fn swap_replaces_for_subsequent_reads_only() {
        let handle = ModelHandle::new(Some(Arc::new(Fixed([0.9, 0.1]))));
        let before = handle.current().unwrap();
        let prev = handle.swap(Some(Arc::new(Fixed([0.1, 0.9]))));
        assert_eq!(prev.unwrap().name(), "fixed");
        // a reader holding the old Arc keeps scoring against it
        assert_eq!(before.predict_proba("x").unwrap(), [0.9, 0.1]);
        assert_eq!(handle.current().unwrap().predict_proba("x").unwrap(), [0.1, 0.9]);
        handle.swap(None);
        assert!(!handle.is_loaded());
    }

    #[test]
    fn poisoned_lock_still_serves_the_model() {
        let handle = ModelHandle::new(Some(Arc::new(Fixed([0.1, 0.9]))));
        let inner = Arc::clone(&handle.inner);
        let _ = thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(handle.inner.is_poisoned());
        assert_eq!(handle.current().unwrap().name(), "fixed");
        assert!(adapter_over(&handle).predict("x").unwrap().is_spam);
    }

    fn adapter_over(handle: &ModelHandle) -> StatisticalAdapter {
        StatisticalAdapter::new(handle.clone())
    }
}
