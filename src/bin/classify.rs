//! Classify SMS messages from the command line.
//!
//! ```text
//! classify [--health] [TEXT...]
//! ```
//! With no TEXT, reads one message per line from stdin. Prints one JSON
//! object per message on stdout; logs go to stderr.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sms_spam_guard::{
    start_model_reload_thread, ArtifactLoader, Classification, GuardConfig, HandoffMux, LogSink,
    SpamClassifier,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs to stderr. `SPAM_GUARD_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sms_spam_guard=info,warn"));
    let json = std::env::var("SPAM_GUARD_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

/// Classify the clipped text; spam is handed off with the original text.
fn classify_line(
    classifier: &SpamClassifier,
    mux: &HandoffMux,
    cfg: &GuardConfig,
    line: usize,
    raw: &str,
) -> (Classification, Vec<JoinHandle<()>>) {
    let (text, clipped) = cfg.limits.clip(raw);
    if clipped {
        warn!(
            line,
            limit = cfg.limits.max_message_length,
            "message over length limit; clipped"
        );
    }
    let result = classifier.classify_detailed(text);
    let handles = mux
        .handoff(raw, &result, &cfg.handoff.languages)
        .unwrap_or_default();
    (result, handles)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = GuardConfig::load().context("loading spam guard config")?;
    let classifier = SpamClassifier::from_config(&cfg);

    if cfg.model.hot_reload {
        let loader = ArtifactLoader::new(cfg.model.paths.iter().cloned());
        let _ = start_model_reload_thread(
            loader,
            classifier.model_handle().clone(),
            Duration::from_secs(cfg.model.poll_secs),
        );
        info!(every_secs = cfg.model.poll_secs, "model hot reload enabled");
    }

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(pos) = args.iter().position(|a| a == "--health") {
        args.remove(pos);
        serde_json::to_writer(&mut out, &classifier.health())?;
        writeln!(out)?;
        if args.is_empty() {
            return Ok(());
        }
    }

    let messages: Vec<String> = if args.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<_, _>>()
            .context("reading messages from stdin")?
    } else {
        args
    };

    let mux = if cfg.handoff.enabled {
        HandoffMux::new().with_sink(Arc::new(LogSink))
    } else {
        HandoffMux::new()
    };

    let mut pending = Vec::new();
    for (line, raw) in messages.iter().enumerate() {
        let (result, handles) = classify_line(&classifier, &mux, &cfg, line, raw);
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
        pending.extend(handles);
    }
    out.flush()?;

    for h in pending {
        if let Err(e) = h.await {
            warn!(error = %e, "handoff task panicked");
        }
    }
    Ok(())
}
