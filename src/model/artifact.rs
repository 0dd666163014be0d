//! # Model Artifact
//!
//! A trained vectorizer + classifier pair, serialized as JSON:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "name": "robust",
//!   "vectorizer": { "vocabulary": {"free": 0, "free cash": 1}, "idf": [1.2, 2.3], "ngram_range": [1, 2] },
//!   "classifier": { "kind": "logistic_regression", "coef": [1.9, 2.4], "intercept": -0.7 }
//! }
//! ```
//!
//! Loading validates the whole bundle up front, so a loaded artifact can only fail
//! at scoring time on numeric overflow. `ArtifactLoader` walks a priority list
//! of candidate paths and returns the first one that loads.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};
use tracing::{info, warn};

use super::classifier::Classifier;
use super::tfidf::TfidfVectorizer;
use super::SpamModel;
use crate::error::{ModelError, ModelResult};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

fn default_name() -> String {
    "unnamed".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    pub vectorizer: TfidfVectorizer,
    pub classifier: Classifier,
}

impl ModelArtifact {
    pub fn from_json_str(s: &str) -> ModelResult<Self> {
        let artifact: ModelArtifact = serde_json::from_str(s)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::Incompatible(format!(
                "format_version {} (supported: {ARTIFACT_FORMAT_VERSION})",
                self.format_version
            )));
        }
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.dim())
    }
}

impl SpamModel for ModelArtifact {
    fn predict_proba(&self, normalized: &str) -> ModelResult<[f64; 2]> {
        let x = self.vectorizer.transform(normalized)?;
        self.classifier.predict_proba(&x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub type Fingerprint = Vec<(PathBuf, Option<SystemTime>)>;

/// An artifact together with the path it came from.
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub path: PathBuf,
    pub artifact: Arc<ModelArtifact>,
}

/// Tries candidate artifact paths in priority order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactLoader {
    paths: Vec<PathBuf>,
}

impl ArtifactLoader {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// First candidate that loads and validates; `None` means rule-only mode.
    pub fn load(&self) -> Option<LoadedArtifact> {
        for path in &self.paths {
            match ModelArtifact::load_from_file(path) {
                Ok(artifact) => {
                    info!(
                        path = %path.display(),
                        name = %artifact.name,
                        classifier = artifact.classifier.kind(),
                        dim = artifact.vectorizer.dim(),
                        "model artifact loaded"
                    );
                    return Some(LoadedArtifact {
                        path: path.clone(),
                        artifact: Arc::new(artifact),
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "model artifact candidate skipped");
                }
            }
        }
        if self.paths.is_empty() {
            warn!("no model artifact paths configured; running rule-only");
        } else {
            warn!(
                candidates = self.paths.len(),
                "no usable model artifact; running rule-only"
            );
        }
        None
    }

    /// Mtime of every candidate (`None` when missing), in priority order.
    /// Any difference between two fingerprints means a reload is due.
    pub fn fingerprint(&self) -> Fingerprint {
        self.paths
            .iter()
            .map(|p| {
                let mtime = fs::metadata(p).and_then(|m| m.modified()).ok();
                (p.clone(), mtime)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r#"{
        "format_version": 1,
        "name": "tiny",
        "vectorizer": { "vocabulary": {"free": 0, "lunch": 1}, "idf": [1.0, 1.0] },
        "classifier": { "kind": "logistic_regression", "coef": [4.0, -4.0], "intercept": 0.0 }
    }"#;

    #[test]
    fn parses_with_defaults() {
        let a = ModelArtifact::from_json_str(TINY).unwrap();
        assert_eq!(a.name, "tiny");
        assert_eq!(a.vectorizer.ngram_range, [1, 1]);
        let p = a.predict_proba("free").unwrap();
        assert!(p[1] > 0.95);
        let p = a.predict_proba("lunch").unwrap();
        assert!(p[0] > 0.95);
    }

    #[test]
    fn rejects_unknown_version() {
        let json = TINY.replace("\"format_version\": 1", "\"format_version\": 7");
        assert!(matches!(
            ModelArtifact::from_json_str(&json),
            Err(ModelError::Incompatible(_))
        ));
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let json = TINY.replace("[4.0, -4.0]", "[4.0]");
        assert!(matches!(
            ModelArtifact::from_json_str(&json),
            Err(ModelError::Incompatible(_))
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = ModelArtifact::load_from_file("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn loader_without_candidates_yields_none() {
        assert!(ArtifactLoader::default().load().is_none());
        assert!(ArtifactLoader::default().fingerprint().is_empty());
    }
}
