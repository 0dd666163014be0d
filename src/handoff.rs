// src/handoff.rs
//! Spam handoff: messages classified as spam are forwarded to downstream
//! sinks (translation, reporting). Sinks run detached; a failing sink is
//! logged and never affects the classification result.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::arbitration::Outcome;
use crate::engine::{anon_id, Classification};

#[derive(Debug, Clone, Serialize)]
pub struct SpamEvent {
    /// Anonymized message id (hash prefix).
    pub id: String,
    pub text: String,
    pub confidence: f64,
    pub outcome: Outcome,
    /// Requested translation targets.
    pub languages: Vec<String>,
    pub ts: DateTime<Utc>,
}

impl SpamEvent {
    pub fn new(text: &str, result: &Classification, languages: &[String]) -> Self {
        Self {
            id: anon_id(text),
            text: text.to_string(),
            confidence: result.verdict.confidence,
            outcome: result.outcome,
            languages: languages.to_vec(),
            ts: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
pub trait SpamSink: Send + Sync {
    async fn spam_detected(&self, ev: &SpamEvent) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Writes a log line per event. Only the anonymized id is logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait::async_trait]
impl SpamSink for LogSink {
    async fn spam_detected(&self, ev: &SpamEvent) -> Result<()> {
        info!(
            id = %ev.id,
            confidence = ev.confidence,
            outcome = ev.outcome.as_str(),
            languages = ?ev.languages,
            "spam handed off"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Fans one event out to every registered sink.
#[derive(Clone, Default)]
pub struct HandoffMux {
    sinks: Vec<Arc<dyn SpamSink>>,
}

impl std::fmt::Debug for HandoffMux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("HandoffMux").field("sinks", &names).finish()
    }
}

impl HandoffMux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn SpamSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Spawn one task per sink. Must be called inside a tokio runtime.
    pub fn dispatch(&self, ev: SpamEvent) -> Vec<JoinHandle<()>> {
        let ev = Arc::new(ev);
        self.sinks
            .iter()
            .cloned()
            .map(|sink| {
                let ev = Arc::clone(&ev);
                tokio::spawn(async move {
                    if let Err(e) = sink.spam_detected(&ev).await {
                        warn!(sink = sink.name(), id = %ev.id, error = %e, "spam handoff failed");
                    }
                })
            })
            .collect()
    }

    /// Dispatch only when `result` is spam. Returns `None` for non-spam.
    pub fn handoff(
        &self,
        text: &str,
        result: &Classification,
        languages: &[String],
    ) -> Option<Vec<JoinHandle<()>>> {
        if !result.verdict.is_spam {
            return None;
        }
        Some(self.dispatch(SpamEvent::new(text, result, languages)))
    }
}
