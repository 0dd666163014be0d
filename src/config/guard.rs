// src/config/guard.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/spam_guard.toml";
pub const ENV_CONFIG_PATH: &str = "SPAM_GUARD_CONFIG";
/// Comma-separated artifact paths, highest priority first.
pub const ENV_MODEL_PATHS: &str = "SPAM_GUARD_MODEL_PATHS";
/// "1" enables artifact hot reload.
pub const ENV_HOT_RELOAD: &str = "SPAM_GUARD_HOT_RELOAD";

const DEFAULT_POLL_SECS: u64 = 2;
const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub model: ModelConfig,
    pub rules: RulesConfig,
    pub limits: LimitsConfig,
    pub handoff: HandoffConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact candidates in priority order.
    pub paths: Vec<PathBuf>,
    pub hot_reload: bool,
    pub poll_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("models/robust.json"),
                PathBuf::from("models/improved.json"),
                PathBuf::from("models/original.json"),
            ],
            hot_reload: false,
            poll_secs: DEFAULT_POLL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Custom lexicon JSON; built-in when absent.
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Soft limit in characters, enforced by the caller (CLI), not the core.
    pub max_message_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl LimitsConfig {
    /// Cut `text` to at most `max_message_length` chars. Returns `(text, clipped)`.
    pub fn clip<'a>(&self, text: &'a str) -> (&'a str, bool) {
        match text.char_indices().nth(self.max_message_length) {
            Some((byte_idx, _)) => (&text[..byte_idx], true),
            None => (text, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub enabled: bool,
    /// Translation targets forwarded with every spam event.
    pub languages: Vec<String>,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            languages: Vec::new(),
        }
    }
}

impl GuardConfig {
    /// Resolve the config path (`SPAM_GUARD_CONFIG` or default), load it, then
    /// apply env overrides. A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let mut cfg: GuardConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(raw) = env::var(ENV_MODEL_PATHS) {
            self.model.paths = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
        }
        if let Ok(v) = env::var(ENV_HOT_RELOAD) {
            self.model.hot_reload = v.trim() == "1";
        }
    }

    fn sanitize(&mut self) {
        self.model.paths.retain(|p| !p.as_os_str().is_empty());
        if self.model.poll_secs == 0 {
            self.model.poll_secs = DEFAULT_POLL_SECS;
        }
        if self.limits.max_message_length == 0 {
            self.limits.max_message_length = DEFAULT_MAX_MESSAGE_LENGTH;
        }
        self.handoff.languages.retain(|l| !l.trim().is_empty());
    }
}
