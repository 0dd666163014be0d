//! TF-IDF vectorizer over normalized text.
//!
//! Input is the normalizer's output (tokens separated by single spaces), so
//! tokenization here is a plain whitespace split. N-grams are the tokens joined
//! by a single space, which is also how multi-word vocabulary keys are written.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

fn default_ngram_range() -> [usize; 2] {
    [1, 1]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term (or space-joined n-gram) -> column index
    pub vocabulary: HashMap<String, usize>,
    /// one weight per column
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: [usize; 2],
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

impl TfidfVectorizer {
    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn validate(&self) -> ModelResult<()> {
        let [lo, hi] = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ModelError::Incompatible(format!(
                "invalid ngram_range [{lo}, {hi}]"
            )));
        }
        if let Some((term, &idx)) = self.vocabulary.iter().find(|(_, i)| **i >= self.dim()) {
            return Err(ModelError::Incompatible(format!(
                "vocabulary term `{term}` maps to column {idx}, dimension is {}",
                self.dim()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Incompatible("non-finite idf weight".into()));
        }
        Ok(())
    }

    /// Sparse feature vector, sorted by column. Fails only on a vocabulary
    /// that points past `idf` (an artifact that skipped `validate`).
    pub fn transform(&self, normalized: &str) -> ModelResult<Vec<(usize, f64)>> {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let [lo, hi] = self.ngram_range;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for n in lo.max(1)..=hi {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&col) = self.vocabulary.get(&gram) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut vec: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let idf = self.idf.get(col).ok_or_else(|| {
                    ModelError::Scoring(format!("vocabulary column {col} has no idf weight"))
                })?;
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                Ok((col, tf * idf))
            })
            .collect::<ModelResult<_>>()?;

        let denom = match self.norm {
            Norm::L2 => vec.iter().map(|(_, x)| x * x).sum::<f64>().sqrt(),
            Norm::L1 => vec.iter().map(|(_, x)| x.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if denom > 0.0 && self.norm != Norm::None {
            for (_, x) in vec.iter_mut() {
                *x /= denom;
            }
        }
        Ok(vec)
    }
}
