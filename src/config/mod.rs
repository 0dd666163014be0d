// src/config/mod.rs
pub mod guard;

pub use guard::{
    GuardConfig, HandoffConfig, LimitsConfig, ModelConfig, RulesConfig, DEFAULT_CONFIG_PATH,
    ENV_CONFIG_PATH, ENV_HOT_RELOAD, ENV_MODEL_PATHS,
};
