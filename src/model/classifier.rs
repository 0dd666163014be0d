//! Binary probabilistic classifiers over a sparse TF-IDF vector.
//!
//! Class order is fixed: index 0 = not spam, index 1 = spam.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// P(spam) = sigmoid(coef · x + intercept)
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
    /// Joint log-likelihood per class, normalized with log-sum-exp.
    MultinomialNb {
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression { .. } => "logistic_regression",
            Classifier::MultinomialNb { .. } => "multinomial_nb",
        }
    }

    /// Checks the classifier against the vectorizer dimension.
    pub fn validate(&self, dim: usize) -> ModelResult<()> {
        let finite = |xs: &[f64]| xs.iter().all(|x| x.is_finite());
        match self {
            Classifier::LogisticRegression { coef, intercept } => {
                if coef.len() != dim {
                    return Err(ModelError::Incompatible(format!(
                        "logistic regression has {} coefficients, vectorizer dimension is {dim}",
                        coef.len()
                    )));
                }
                if !finite(coef) || !intercept.is_finite() {
                    return Err(ModelError::Incompatible("non-finite coefficient".into()));
                }
            }
            Classifier::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => {
                for (class, row) in feature_log_prob.iter().enumerate() {
                    if row.len() != dim {
                        return Err(ModelError::Incompatible(format!(
                            "naive Bayes class {class} has {} features, vectorizer dimension is {dim}",
                            row.len()
                        )));
                    }
                    if !finite(row) {
                        return Err(ModelError::Incompatible("non-finite log probability".into()));
                    }
                }
                if !finite(class_log_prior) {
                    return Err(ModelError::Incompatible("non-finite class prior".into()));
                }
            }
        }
        Ok(())
    }

    /// `[p_not_spam, p_spam]`.
    pub fn predict_proba(&self, x: &[(usize, f64)]) -> ModelResult<[f64; 2]> {
        let proba = match self {
            Classifier::LogisticRegression { coef, intercept } => {
                let z = intercept + dot(coef, x)?;
                let p = sigmoid(z);
                [1.0 - p, p]
            }
            Classifier::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => {
                let jll = [
                    class_log_prior[0] + dot(&feature_log_prob[0], x)?,
                    class_log_prior[1] + dot(&feature_log_prob[1], x)?,
                ];
                let max = jll[0].max(jll[1]);
                let log_norm = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
                [(jll[0] - log_norm).exp(), (jll[1] - log_norm).exp()]
            }
        };

        if proba.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p)) {
            Ok(proba)
        } else {
            Err(ModelError::Scoring(format!(
                "{} produced invalid probabilities {proba:?}",
                self.kind()
            )))
        }
    }
}

fn dot(weights: &[f64], x: &[(usize, f64)]) -> ModelResult<f64> {
    x.iter().try_fold(0.0, |acc, &(col, v)| {
        weights
            .get(col)
            .map(|w| acc + w * v)
            .ok_or_else(|| ModelError::Scoring(format!("feature column {col} out of range")))
    })
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
