// tests/handoff.rs
// Spam events reach every sink; failing sinks never break the others.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use sms_spam_guard::{HandoffMux, LogSink, SpamClassifier, SpamEvent, SpamSink};

#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<SpamEvent>>,
}

#[async_trait::async_trait]
impl SpamSink for Recording {
    async fn spam_detected(&self, ev: &SpamEvent) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(ev.clone());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

struct Failing;

#[async_trait::async_trait]
impl SpamSink for Failing {
    async fn spam_detected(&self, _ev: &SpamEvent) -> anyhow::Result<()> {
        Err(anyhow!("downstream unavailable"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

const SCAM: &str = "WINNER!! You have won a cash prize. Click the link for details";

#[tokio::test]
async fn spam_is_forwarded_with_languages() {
    let rec = Arc::new(Recording::default());
    let mux = HandoffMux::new()
        .with_sink(Arc::new(Failing))
        .with_sink(rec.clone())
        .with_sink(Arc::new(LogSink));

    let result = SpamClassifier::rule_only().classify_detailed(SCAM);
    let langs = vec!["hindi".to_string(), "tamil".to_string()];
    let handles = mux.handoff(SCAM, &result, &langs).expect("spam is handed off");
    assert_eq!(handles.len(), 3);
    for h in handles {
        h.await.unwrap();
    }

    let seen = rec.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let ev = &seen[0];
    assert_eq!(ev.text, SCAM);
    assert_eq!(ev.languages, langs);
    assert_eq!(ev.confidence, result.verdict.confidence);
    assert_eq!(ev.outcome, result.outcome);
    assert_eq!(ev.id.len(), 12);
}

#[tokio::test]
async fn not_spam_is_not_forwarded() {
    let rec = Arc::new(Recording::default());
    let mux = HandoffMux::new().with_sink(rec.clone());

    let text = "Hey, are we still meeting for lunch tomorrow?";
    let result = SpamClassifier::rule_only().classify_detailed(text);
    assert!(mux.handoff(text, &result, &[]).is_none());
    assert!(rec.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_mux_dispatches_nothing() {
    let mux = HandoffMux::new();
    assert!(mux.is_empty());
    let result = SpamClassifier::rule_only().classify_detailed(SCAM);
    assert_eq!(mux.handoff(SCAM, &result, &[]).map(|h| h.len()), Some(0));
}
